pub mod cli;
pub mod config;
pub mod correct;
pub mod dates;
pub mod entry;
pub mod error;
pub mod media;
pub mod pairing;
pub mod report;
pub mod scan;
pub mod sidecar;

pub use cli::{Cli, Commands, MatchArgs, OutputFormat};
pub use config::MatchConfig;
pub use correct::{
    BatchSummary, CorrectionRequest, FsTimestampWriter, TimestampWriter, apply_batch, apply_one,
};
pub use dates::{LocalZone, same_local_day};
pub use entry::{FileEntry, SidecarFields};
pub use error::{PhototimeError, Result};
pub use media::{Classified, EntryKind, MediaKind, classify};
pub use pairing::{Pair, PairStatus, ReconcileResult, reconcile, reconcile_entries};
pub use scan::{scan_and_reconcile, scan_directory};
pub use sidecar::{MatchRule, SidecarCandidate, sidecar_candidates_for};
