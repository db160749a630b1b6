use thiserror::Error;

use crate::lead::LeadStatus;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("search field `{0}` must not be empty")]
    EmptySearchField(&'static str),

    #[error("lead status `{status}` does not match its enrichment data")]
    InconsistentLead { status: LeadStatus },
}

/// A lead status change that would move the lifecycle backwards or skip a step.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("illegal lead status transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: LeadStatus,
    pub to: LeadStatus,
}
