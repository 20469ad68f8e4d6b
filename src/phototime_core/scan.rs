use crate::phototime_core::config::MatchConfig;
use crate::phototime_core::entry::FileEntry;
use crate::phototime_core::error::{PhototimeError, Result};
use crate::phototime_core::media::extension_of;
use crate::phototime_core::pairing::{ReconcileResult, reconcile_entries};
use crate::phototime_core::sidecar::{SIDECAR_EXTENSION, read_sidecar};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use walkdir::WalkDir;

/// Walk a directory tree and read timestamps and sidecar content for every file.
///
/// Any error while walking aborts the scan; there are no partial results.
/// Sidecars that fail to decode are logged and kept as plain files.
pub fn scan_directory(root: &Path) -> Result<Vec<FileEntry>> {
    if !root.exists() {
        return Err(PhototimeError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(PhototimeError::NotADirectory(root.to_path_buf()));
    }

    log::info!("Scanning directory {}", root.display());

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_file() {
            paths.push(entry.into_path());
        }
    }

    let bar_style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let bar = ProgressBar::new(paths.len() as u64).with_style(bar_style);
    bar.set_message("Reading metadata");

    let entries = paths
        .into_par_iter()
        .progress_with(bar.clone())
        .map(read_entry)
        .collect::<Result<Vec<FileEntry>>>()?;

    bar.finish_with_message("Scan complete");
    log::info!("Scan found {} files under {}", entries.len(), root.display());

    Ok(entries)
}

fn read_entry(path: PathBuf) -> Result<FileEntry> {
    let metadata = fs::metadata(&path)?;
    let modified_at = OffsetDateTime::from(metadata.modified()?);
    let created_at = metadata
        .created()
        .map(OffsetDateTime::from)
        .unwrap_or_else(|e| {
            log::debug!(
                "No birth time for {} ({}), using modification time",
                path.display(),
                e
            );
            modified_at
        });

    let mut entry = FileEntry::new(path, created_at, modified_at);

    if extension_of(&entry.path).as_deref() == Some(SIDECAR_EXTENSION) {
        match read_sidecar(&entry.path) {
            Ok(fields) => entry.sidecar = Some(fields),
            Err(e) => log::warn!("Ignoring sidecar: {}", e),
        }
    }

    Ok(entry)
}

/// Scan a directory and reconcile what was found.
pub fn scan_and_reconcile(root: &Path, config: &MatchConfig) -> Result<ReconcileResult> {
    let entries = scan_directory(root)?;
    Ok(reconcile_entries(entries, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_scan_reads_nested_files_and_sidecars() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        temp_dir.child("A.jpg").write_binary(b"jpeg").unwrap();
        temp_dir
            .child("A.jpg.json")
            .write_str(r#"{"title": "A.jpg", "photoTakenTime": {"timestamp": "1686823200"}}"#)
            .unwrap();
        temp_dir.child("album/B.mp4").write_binary(b"mp4").unwrap();
        temp_dir.child("album/broken.json").write_str("{ nope").unwrap();

        let mut entries = scan_directory(temp_dir.path()).unwrap();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(entries.len(), 4);

        let sidecar = entries.iter().find(|e| e.path.ends_with("A.jpg.json")).unwrap();
        assert_eq!(sidecar.captured_at_epoch_seconds(), Some(1_686_823_200));

        let broken = entries.iter().find(|e| e.path.ends_with("broken.json")).unwrap();
        assert!(broken.sidecar.is_none());

        let media = entries.iter().find(|e| e.path.ends_with("B.mp4")).unwrap();
        assert!(media.sidecar.is_none());
    }

    #[test]
    fn test_scan_missing_root() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let err = scan_directory(&temp_dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, PhototimeError::PathNotFound(_)));
    }

    #[test]
    fn test_scan_file_root() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let file = temp_dir.child("A.jpg");
        file.write_binary(b"jpeg").unwrap();
        let err = scan_directory(file.path()).unwrap_err();
        assert!(matches!(err, PhototimeError::NotADirectory(_)));
    }

    #[test]
    fn test_scan_and_reconcile() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        temp_dir.child("A.jpg").write_binary(b"jpeg").unwrap();
        temp_dir
            .child("A.jpg.json")
            .write_str(r#"{"photoTakenTime": {"timestamp": "1686823200"}}"#)
            .unwrap();
        temp_dir.child("lonely.png").write_binary(b"png").unwrap();

        let result = scan_and_reconcile(temp_dir.path(), &MatchConfig::default()).unwrap();
        // Freshly written files carry today's date, not 2023-06-15.
        assert_eq!(result.incorrect.len(), 1);
        assert_eq!(result.unmatched.len(), 1);
    }
}
