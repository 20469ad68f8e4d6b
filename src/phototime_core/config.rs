use crate::phototime_core::cli::MatchArgs;
use crate::phototime_core::dates::{LocalZone, parse_utc_offset};
use crate::phototime_core::error::Result;
use crate::phototime_core::sidecar::DEFAULT_EDITED_MARKER;

/// Run-time settings for matching media to sidecars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    /// File name marker the exporter appends to edited copies.
    pub edited_marker: String,
    /// Zone used to decide whether two instants fall on the same day.
    pub zone: LocalZone,
}

impl MatchConfig {
    /// Build a configuration from command-line options.
    pub fn from_args(args: &MatchArgs) -> Result<Self> {
        let mut config = MatchConfig::default();
        if let Some(marker) = &args.edited_marker {
            config = config.with_edited_marker(marker.as_str());
        }
        if let Some(offset) = &args.utc_offset {
            config = config.with_zone(LocalZone::Fixed(parse_utc_offset(offset)?));
        }
        Ok(config)
    }

    pub fn with_edited_marker(mut self, marker: impl Into<String>) -> Self {
        self.edited_marker = marker.into();
        self
    }

    pub fn with_zone(mut self, zone: LocalZone) -> Self {
        self.zone = zone;
        self
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            edited_marker: DEFAULT_EDITED_MARKER.to_string(),
            zone: LocalZone::System,
        }
    }
}
