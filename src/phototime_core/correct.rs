use crate::phototime_core::dates::from_epoch_millis;
use crate::phototime_core::error::{PhototimeError, Result};
use crossbeam_channel::Sender;
use filetime::FileTime;
use serde::Serialize;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Set one file's timestamps to a capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrectionRequest {
    pub path: PathBuf,
    pub target_epoch_millis: i64,
}

impl CorrectionRequest {
    pub fn new(path: impl Into<PathBuf>, target_epoch_millis: i64) -> Self {
        CorrectionRequest {
            path: path.into(),
            target_epoch_millis,
        }
    }
}

/// Counts for a finished batch. Per-item failures are only logged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.completed - self.failed
    }
}

/// Writes birth and modification time of a file.
pub trait TimestampWriter {
    fn set_times(&self, path: &Path, target: OffsetDateTime) -> Result<()>;
}

/// Writes timestamps on the local filesystem.
///
/// Modification and access time are set everywhere. Birth time is set on
/// macOS and Windows; other platforms have no call for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsTimestampWriter;

impl TimestampWriter for FsTimestampWriter {
    fn set_times(&self, path: &Path, target: OffsetDateTime) -> Result<()> {
        if !path.exists() {
            return Err(PhototimeError::PathNotFound(path.to_path_buf()));
        }

        set_birth_time(path, target)?;

        let file_time = FileTime::from_unix_time(target.unix_timestamp(), target.nanosecond());
        filetime::set_file_times(path, file_time, file_time).map_err(|source| {
            PhototimeError::Correction {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

#[cfg(any(target_os = "macos", windows))]
fn set_birth_time(path: &Path, target: OffsetDateTime) -> Result<()> {
    use std::fs::{FileTimes, OpenOptions};
    #[cfg(target_os = "macos")]
    use std::os::macos::fs::FileTimesExt;
    #[cfg(windows)]
    use std::os::windows::fs::FileTimesExt;

    let to_error = |source| PhototimeError::Correction {
        path: path.to_path_buf(),
        source,
    };
    let file = OpenOptions::new().write(true).open(path).map_err(to_error)?;
    file.set_times(FileTimes::new().set_created(target.into()))
        .map_err(to_error)
}

#[cfg(not(any(target_os = "macos", windows)))]
fn set_birth_time(path: &Path, _target: OffsetDateTime) -> Result<()> {
    log::debug!("Birth time left unchanged for {} (not settable on this platform)", path.display());
    Ok(())
}

/// Apply a single correction.
pub fn apply_one<W: TimestampWriter + ?Sized>(writer: &W, request: &CorrectionRequest) -> Result<()> {
    let target = from_epoch_millis(request.target_epoch_millis)?;
    writer.set_times(&request.path, target)?;
    log::debug!("Set timestamps of {} to {}", request.path.display(), target);
    Ok(())
}

/// Apply corrections one after another, in order.
///
/// After each item, successful or not, the number of items done so far is sent
/// on `progress`. A failure is logged and the batch moves on. Nobody listening on
/// `progress` is fine.
pub fn apply_batch<W: TimestampWriter + ?Sized>(
    writer: &W,
    requests: &[CorrectionRequest],
    progress: &Sender<usize>,
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    log::info!("Applying {} timestamp corrections", requests.len());

    for request in requests {
        if let Err(e) = apply_one(writer, request) {
            log::error!("Failed to correct {}: {}", request.path.display(), e);
            summary.failed += 1;
        }
        summary.completed += 1;
        let _ = progress.send(summary.completed);
    }

    log::info!(
        "Corrections finished: {} succeeded, {} failed",
        summary.succeeded(),
        summary.failed
    );
    summary
}
