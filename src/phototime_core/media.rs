use crate::phototime_core::entry::FileEntry;
use crate::phototime_core::sidecar::SIDECAR_EXTENSION;
use std::path::Path;

/// Recognized media formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Mp4,
    Mov,
    Jpg,
    Jpeg,
    Mkv,
    Png,
    Raw,
    Hevc,
    Heif,
    Webp,
    Heic,
    Gif,
    Dng,
}

/// Media file extensions (lowercase).
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "jpg", "jpeg", "mkv", "png", "raw", "hevc", "heif", "webp", "heic", "gif", "dng",
];

impl MediaKind {
    /// Look up a media kind by extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<MediaKind> {
        let kind = match ext.to_lowercase().as_str() {
            "mp4" => MediaKind::Mp4,
            "mov" => MediaKind::Mov,
            "jpg" => MediaKind::Jpg,
            "jpeg" => MediaKind::Jpeg,
            "mkv" => MediaKind::Mkv,
            "png" => MediaKind::Png,
            "raw" => MediaKind::Raw,
            "hevc" => MediaKind::Hevc,
            "heif" => MediaKind::Heif,
            "webp" => MediaKind::Webp,
            "heic" => MediaKind::Heic,
            "gif" => MediaKind::Gif,
            "dng" => MediaKind::Dng,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Mp4 => "mp4",
            MediaKind::Mov => "mov",
            MediaKind::Jpg => "jpg",
            MediaKind::Jpeg => "jpeg",
            MediaKind::Mkv => "mkv",
            MediaKind::Png => "png",
            MediaKind::Raw => "raw",
            MediaKind::Hevc => "hevc",
            MediaKind::Heif => "heif",
            MediaKind::Webp => "webp",
            MediaKind::Heic => "heic",
            MediaKind::Gif => "gif",
            MediaKind::Dng => "dng",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a scanned entry takes part in reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Media(MediaKind),
    Sidecar,
    Ignored,
}

/// Media and sidecar entries split out of a scan. Ignored entries are dropped.
#[derive(Debug, Default)]
pub struct Classified {
    pub media: Vec<FileEntry>,
    pub sidecars: Vec<FileEntry>,
}

/// Lower-cased text after the last `.` of the file name.
pub fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Classify one path. A sidecar only counts when its content decoded.
pub fn classify_path(path: &Path, has_sidecar_fields: bool) -> EntryKind {
    let Some(ext) = extension_of(path) else {
        return EntryKind::Ignored;
    };

    if ext == SIDECAR_EXTENSION {
        return if has_sidecar_fields {
            EntryKind::Sidecar
        } else {
            EntryKind::Ignored
        };
    }

    if !MEDIA_EXTENSIONS.contains(&ext.as_str()) {
        return EntryKind::Ignored;
    }

    MediaKind::from_extension(&ext)
        .map(EntryKind::Media)
        .unwrap_or(EntryKind::Ignored)
}

/// Split a scan into media and sidecar entries.
pub fn classify(entries: Vec<FileEntry>) -> Classified {
    let mut classified = Classified::default();

    for entry in entries {
        match classify_path(&entry.path, entry.sidecar.is_some()) {
            EntryKind::Media(kind) => {
                log::debug!("Found {} media {}", kind, entry.path.display());
                classified.media.push(entry);
            }
            EntryKind::Sidecar => classified.sidecars.push(entry),
            EntryKind::Ignored => {
                log::debug!("Ignoring {}", entry.path.display());
            }
        }
    }

    log::debug!(
        "Classified {} media files and {} sidecars",
        classified.media.len(),
        classified.sidecars.len()
    );
    classified
}
