//! Shared domain types, configuration, and collaborator contracts for the
//! prospecting workspace.

pub mod analysis;
pub mod app_config;
pub mod config;
pub mod contract;
pub mod error;
pub mod lead;

pub use analysis::{classify_priority, AiAnalysisResult, PriorityStatus, SiteAssessment};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use contract::{DiscoveryError, LeadAnalyzer, LeadDiscovery};
pub use error::{ConfigError, CoreError, TransitionError};
pub use lead::{Lead, LeadStatus, SearchParams};
