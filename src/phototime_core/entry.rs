use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use time::OffsetDateTime;

/// One filesystem item discovered by a scan.
///
/// Entries are rebuilt from scratch on every scan and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub created_at: OffsetDateTime,
    pub modified_at: OffsetDateTime,
    /// Decoded sidecar content. Only present for `.json` files that decoded.
    pub sidecar: Option<SidecarFields>,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>, created_at: OffsetDateTime, modified_at: OffsetDateTime) -> Self {
        FileEntry {
            path: path.into(),
            created_at,
            modified_at,
            sidecar: None,
        }
    }

    pub fn with_sidecar(mut self, fields: SidecarFields) -> Self {
        self.sidecar = Some(fields);
        self
    }

    /// The timestamp compared against the sidecar's capture time: the birth time.
    #[cfg(any(target_os = "macos", windows))]
    pub fn recorded_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// The timestamp compared against the sidecar's capture time.
    ///
    /// Birth time cannot be set here, so a corrected file only carries the new
    /// time in its modification time. The earlier of the two is used.
    #[cfg(not(any(target_os = "macos", windows)))]
    pub fn recorded_at(&self) -> OffsetDateTime {
        self.created_at.min(self.modified_at)
    }

    /// Capture time declared by this entry's sidecar, in epoch seconds.
    pub fn captured_at_epoch_seconds(&self) -> Option<i64> {
        self.sidecar
            .as_ref()
            .and_then(SidecarFields::captured_at_epoch_seconds)
    }
}

/// The subset of an export sidecar this tool reads. All other keys are ignored.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SidecarFields {
    #[serde(default)]
    pub photo_taken_time: Option<TakenTime>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TakenTime {
    #[serde(default)]
    pub timestamp: Option<EpochSeconds>,
}

/// Exporters write the timestamp as either a JSON string or a number.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum EpochSeconds {
    Number(i64),
    Text(String),
}

impl SidecarFields {
    pub fn from_epoch_seconds(seconds: i64) -> Self {
        SidecarFields {
            photo_taken_time: Some(TakenTime {
                timestamp: Some(EpochSeconds::Number(seconds)),
            }),
        }
    }

    pub fn captured_at_epoch_seconds(&self) -> Option<i64> {
        match self.photo_taken_time.as_ref()?.timestamp.as_ref()? {
            EpochSeconds::Number(n) => Some(*n),
            EpochSeconds::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }
}
