//! Lead store, batch orchestrator, and CSV export.
//!
//! The orchestrator drives one discovery call, then analyses the discovered
//! leads in fixed-size concurrent groups, recording every status change in a
//! [`LeadStore`] that presentation layers subscribe to.

pub mod export;
pub mod orchestrator;
pub mod store;

pub use export::{export_filename, exportable_leads, leads_to_csv};
pub use orchestrator::{batches, run_prospecting, RunOptions, RunOutcome, DEFAULT_BATCH_SIZE};
pub use store::{LeadBoard, LeadPatch, LeadStore, Progress, RunPhase, StoreError};
