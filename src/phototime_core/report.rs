use crate::phototime_core::cli::OutputFormat;
use crate::phototime_core::dates::{DAY_FORMAT, LocalZone, display_in};
use crate::phototime_core::pairing::{Pair, ReconcileResult};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ReportJson<'a> {
    correct: &'a [Pair],
    incorrect: &'a [Pair],
    unmatched: Vec<&'a Path>,
    skipped: Vec<&'a Path>,
    missing_data: Vec<&'a Path>,
}

/// Render a reconcile result.
///
/// `Paths` lists the media that need attention: incorrect first, then unmatched.
pub fn format_report(result: &ReconcileResult, format: &OutputFormat, zone: LocalZone) -> String {
    match format {
        OutputFormat::Paths => result
            .incorrect
            .iter()
            .map(|p| p.media_path.as_path())
            .chain(result.unmatched.iter().map(|e| e.path.as_path()))
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => {
            let report = ReportJson {
                correct: &result.correct,
                incorrect: &result.incorrect,
                unmatched: result.unmatched.iter().map(|e| e.path.as_path()).collect(),
                skipped: result.suppressed.iter().map(|e| e.path.as_path()).collect(),
                missing_data: result.missing_data.iter().map(|e| e.path.as_path()).collect(),
            };
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Table => {
            let mut output = format_summary(result);

            if !result.incorrect.is_empty() {
                output.push_str(&format!(
                    "\n\n{:<40} {:>10} {:>10} {:>12}\n",
                    "Incorrect", "Current", "Taken", "Rule"
                ));
                output.push_str(&format!("{}\n", "─".repeat(75)));
                for pair in &result.incorrect {
                    output.push_str(&format!(
                        "{:<40} {:>10} {:>10} {:>12}\n",
                        truncate_str(&file_name(&pair.media_path), 40),
                        display_in(pair.media_recorded_at, zone, DAY_FORMAT),
                        display_in(pair.sidecar_captured_at, zone, DAY_FORMAT),
                        pair.rule
                    ));
                }
            }

            if !result.unmatched.is_empty() {
                output.push_str("\nNo sidecar found:\n");
                for entry in &result.unmatched {
                    output.push_str(&format!("  - {}\n", entry.path.display()));
                }
            }

            output
        }
    }
}

/// Bucket counts, one per line.
pub fn format_summary(result: &ReconcileResult) -> String {
    let mut output = String::new();
    output.push_str("─────────────────────────────────\n");
    output.push_str(&format!("Correct:       {:>8}\n", result.correct.len()));
    output.push_str(&format!("Incorrect:     {:>8}\n", result.incorrect.len()));
    output.push_str(&format!("Unmatched:     {:>8}\n", result.unmatched.len()));
    output.push_str(&format!("Skipped:       {:>8}\n", result.suppressed.len()));
    output.push_str(&format!("Missing data:  {:>8}\n", result.missing_data.len()));
    output.push_str("─────────────────────────────────");
    output
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phototime_core::config::MatchConfig;
    use crate::phototime_core::entry::{FileEntry, SidecarFields};
    use crate::phototime_core::pairing::reconcile_entries;
    use time::UtcOffset;
    use time::macros::datetime;

    fn sample() -> ReconcileResult {
        let created = datetime!(2023-01-01 10:00 UTC);
        let entries = vec![
            FileEntry::new("/t/A.jpg", created, created),
            FileEntry::new("/t/A.jpg.json", created, created)
                .with_sidecar(SidecarFields::from_epoch_seconds(1_686_823_200)),
            FileEntry::new("/t/lonely.png", created, created),
        ];
        let config = MatchConfig::default().with_zone(LocalZone::Fixed(UtcOffset::UTC));
        reconcile_entries(entries, &config)
    }

    #[test]
    fn test_paths_format() {
        let out = format_report(&sample(), &OutputFormat::Paths, LocalZone::Fixed(UtcOffset::UTC));
        assert_eq!(out, "/t/A.jpg\n/t/lonely.png");
    }

    #[test]
    fn test_json_format() {
        let out = format_report(&sample(), &OutputFormat::Json, LocalZone::Fixed(UtcOffset::UTC));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["incorrect"][0]["media_path"], "/t/A.jpg");
        assert_eq!(value["incorrect"][0]["status"], "incorrect");
        assert_eq!(value["incorrect"][0]["rule"], "exact");
        assert_eq!(value["incorrect"][0]["sidecar_captured_at"], "2023-06-15T10:00:00Z");
        assert_eq!(value["unmatched"][0], "/t/lonely.png");
    }

    #[test]
    fn test_table_format() {
        let out = format_report(&sample(), &OutputFormat::Table, LocalZone::Fixed(UtcOffset::UTC));
        assert!(out.contains("Incorrect:            1"));
        assert!(out.contains("2023-01-01"));
        assert!(out.contains("2023-06-15"));
        assert!(out.contains("/t/lonely.png"));
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short.jpg", 40), "short.jpg");
        assert_eq!(truncate_str("abcdefghij", 8), "abcde...");
        assert_eq!(truncate_str("abcdefghij", 2), "...");
        assert_eq!(truncate_str("abcdefghij", 0), "...");
    }
}
