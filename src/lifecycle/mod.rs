//! Run lifecycle: identity, status machine, summaries, and recovery.

pub mod id;
pub mod record;
pub mod recovery;
pub mod status;
pub mod summary;

pub use id::{share_token, RunId};
pub use record::RunRecord;
pub use recovery::{recover_stale_runs, RecoveryReport, RECOVERY_MESSAGE};
pub use status::RunStatus;
pub use summary::{RunSummary, StatusCounts};
