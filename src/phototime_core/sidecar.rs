use crate::phototime_core::config::MatchConfig;
use crate::phototime_core::entry::SidecarFields;
use crate::phototime_core::error::{PhototimeError, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of the metadata file written next to each exported asset.
pub const SIDECAR_EXTENSION: &str = "json";

/// Marker the exporter puts into the names of edited copies.
pub const DEFAULT_EDITED_MARKER: &str = "-edytowane";

/// Screenshots are often described by a sidecar named after a jpg rendition.
pub const SCREENSHOT_MARKER: &str = "Screenshot";

/// The naming rule that paired a media file with its sidecar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchRule {
    Exact,
    EditedCopy,
    Screenshot,
}

impl MatchRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchRule::Exact => "exact",
            MatchRule::EditedCopy => "edited-copy",
            MatchRule::Screenshot => "screenshot",
        }
    }
}

impl std::fmt::Display for MatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A sidecar path worth probing for one media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarCandidate {
    pub rule: MatchRule,
    /// Path looked up in the sidecar index.
    pub lookup_path: PathBuf,
    /// Path the match is recorded under. Differs from `lookup_path` for edited copies.
    pub logical_path: PathBuf,
}

/// Append `.json` to a path: "photo.jpg" -> "photo.jpg.json".
pub fn sidecar_path_for(media_path: &Path) -> PathBuf {
    let mut s: OsString = media_path.as_os_str().to_owned();
    s.push(".");
    s.push(SIDECAR_EXTENSION);
    PathBuf::from(s)
}

/// Candidate sidecar paths for a media file, most likely first.
///
/// Pure path manipulation; callers check the candidates against the sidecar index.
pub fn sidecar_candidates_for(media_path: &Path, config: &MatchConfig) -> Vec<SidecarCandidate> {
    let exact = sidecar_path_for(media_path);
    let mut candidates = vec![SidecarCandidate {
        rule: MatchRule::Exact,
        lookup_path: exact.clone(),
        logical_path: exact,
    }];

    let Some(name) = media_path.file_name().and_then(|n| n.to_str()) else {
        return candidates;
    };

    if let Some(original_name) = strip_edited_marker(name, &config.edited_marker) {
        let original_sidecar = sidecar_path_for(&media_path.with_file_name(&original_name));
        let logical = media_path.with_file_name(format!(
            "{}{}.{}",
            original_name, config.edited_marker, SIDECAR_EXTENSION
        ));
        push_unique(
            &mut candidates,
            SidecarCandidate {
                rule: MatchRule::EditedCopy,
                lookup_path: original_sidecar,
                logical_path: logical,
            },
        );
    }

    if name.contains(SCREENSHOT_MARKER) {
        let jpg_sidecar = sidecar_path_for(&media_path.with_extension("jpg"));
        push_unique(
            &mut candidates,
            SidecarCandidate {
                rule: MatchRule::Screenshot,
                lookup_path: jpg_sidecar.clone(),
                logical_path: jpg_sidecar,
            },
        );
    }

    candidates
}

fn push_unique(candidates: &mut Vec<SidecarCandidate>, candidate: SidecarCandidate) {
    if !candidates.iter().any(|c| c.logical_path == candidate.logical_path) {
        candidates.push(candidate);
    }
}

/// Remove the edited marker and everything after it up to the extension.
///
/// Example: "IMG_0001-edytowane(1).jpg" -> "IMG_0001.jpg"
fn strip_edited_marker(name: &str, marker: &str) -> Option<String> {
    if marker.is_empty() {
        return None;
    }
    let start = name.find(marker)?;
    let ext_start = name
        .rfind('.')
        .filter(|&dot| dot >= start + marker.len())
        .unwrap_or(name.len());
    Some(format!("{}{}", &name[..start], &name[ext_start..]))
}

/// Whether a media file is an edited copy or a screenshot.
///
/// These are expected to drift from their sidecar names, so a failed match
/// is not reported to the user.
pub fn is_special_case(media_path: &Path, config: &MatchConfig) -> bool {
    let Some(name) = media_path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.contains(SCREENSHOT_MARKER)
        || (!config.edited_marker.is_empty() && name.contains(&config.edited_marker))
}

/// Decode sidecar content.
pub fn decode_sidecar(path: &Path, bytes: &[u8]) -> Result<SidecarFields> {
    serde_json::from_slice(bytes).map_err(|e| PhototimeError::SidecarDecode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Read and decode a sidecar file.
pub fn read_sidecar(path: &Path) -> Result<SidecarFields> {
    let bytes = fs::read(path)?;
    decode_sidecar(path, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(candidates: &[SidecarCandidate]) -> Vec<(MatchRule, String, String)> {
        candidates
            .iter()
            .map(|c| {
                (
                    c.rule,
                    c.lookup_path.display().to_string(),
                    c.logical_path.display().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_sidecar_path_for() {
        assert_eq!(sidecar_path_for(Path::new("/t/A.jpg")), PathBuf::from("/t/A.jpg.json"));
        assert_eq!(sidecar_path_for(Path::new("/t/NOEXT")), PathBuf::from("/t/NOEXT.json"));
    }

    #[test]
    fn test_plain_file_has_only_exact_candidate() {
        let candidates = sidecar_candidates_for(Path::new("/t/IMG_1.jpg"), &MatchConfig::default());
        assert_eq!(
            paths(&candidates),
            vec![(MatchRule::Exact, "/t/IMG_1.jpg.json".to_string(), "/t/IMG_1.jpg.json".to_string())]
        );
    }

    #[test]
    fn test_edited_copy_candidate() {
        let candidates =
            sidecar_candidates_for(Path::new("/t/IMG_0001-edytowane.jpg"), &MatchConfig::default());
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].rule, MatchRule::EditedCopy);
        assert_eq!(candidates[1].lookup_path, PathBuf::from("/t/IMG_0001.jpg.json"));
        assert_eq!(candidates[1].logical_path, PathBuf::from("/t/IMG_0001.jpg-edytowane.json"));
    }

    #[test]
    fn test_edited_copy_drops_suffix_after_marker() {
        assert_eq!(
            strip_edited_marker("IMG_0001-edytowane(1).jpg", "-edytowane"),
            Some("IMG_0001.jpg".to_string())
        );
        assert_eq!(strip_edited_marker("IMG_0001-edytowane", "-edytowane"), Some("IMG_0001".to_string()));
        assert_eq!(strip_edited_marker("IMG_0001.jpg", "-edytowane"), None);
        assert_eq!(strip_edited_marker("IMG_0001.jpg", ""), None);
    }

    #[test]
    fn test_custom_edited_marker() {
        let config = MatchConfig::default().with_edited_marker("-edited");
        let candidates = sidecar_candidates_for(Path::new("/t/IMG_7-edited.heic"), &config);
        assert_eq!(candidates[1].lookup_path, PathBuf::from("/t/IMG_7.heic.json"));
        assert_eq!(candidates[1].logical_path, PathBuf::from("/t/IMG_7.heic-edited.json"));
    }

    #[test]
    fn test_screenshot_candidate() {
        let candidates = sidecar_candidates_for(Path::new("/t/Screenshot_2023.png"), &MatchConfig::default());
        assert_eq!(
            paths(&candidates),
            vec![
                (MatchRule::Exact, "/t/Screenshot_2023.png.json".to_string(), "/t/Screenshot_2023.png.json".to_string()),
                (MatchRule::Screenshot, "/t/Screenshot_2023.jpg.json".to_string(), "/t/Screenshot_2023.jpg.json".to_string()),
            ]
        );
    }

    #[test]
    fn test_screenshot_jpg_is_not_duplicated() {
        let candidates = sidecar_candidates_for(Path::new("/t/Screenshot_1.jpg"), &MatchConfig::default());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].rule, MatchRule::Exact);
    }

    #[test]
    fn test_special_cases() {
        let config = MatchConfig::default();
        assert!(is_special_case(Path::new("/t/Screenshot_1.png"), &config));
        assert!(is_special_case(Path::new("/t/IMG_1-edytowane.jpg"), &config));
        assert!(!is_special_case(Path::new("/t/IMG_1.jpg"), &config));
    }

    #[test]
    fn test_decode_sidecar_errors() {
        let err = decode_sidecar(Path::new("bad.json"), b"{ not json").unwrap_err();
        assert!(matches!(err, PhototimeError::SidecarDecode { .. }));

        let ok = decode_sidecar(Path::new("ok.json"), br#"{"photoTakenTime":{"timestamp":"5"}}"#).unwrap();
        assert_eq!(ok.captured_at_epoch_seconds(), Some(5));
    }
}
