use crate::phototime_core::config::MatchConfig;
use crate::phototime_core::correct::CorrectionRequest;
use crate::phototime_core::dates::{epoch_millis, from_epoch_seconds, same_local_day};
use crate::phototime_core::entry::FileEntry;
use crate::phototime_core::media::classify;
use crate::phototime_core::sidecar::{
    MatchRule, SIDECAR_EXTENSION, is_special_case, sidecar_candidates_for, sidecar_path_for,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Whether a media file's timestamp already agrees with its sidecar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PairStatus {
    Correct,
    Incorrect,
}

/// A media file matched to the sidecar describing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pair {
    pub media_path: PathBuf,
    /// The sidecar file that was read.
    pub sidecar_path: PathBuf,
    /// The sidecar identity this pair claims. For edited copies this carries the marker.
    pub sidecar_logical_path: PathBuf,
    pub rule: MatchRule,
    #[serde(with = "time::serde::rfc3339")]
    pub sidecar_captured_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub media_recorded_at: OffsetDateTime,
    pub status: PairStatus,
}

impl Pair {
    /// The correction that would bring this media file in line with its sidecar.
    /// Only incorrect pairs produce one.
    pub fn correction(&self) -> Option<CorrectionRequest> {
        match self.status {
            PairStatus::Correct => None,
            PairStatus::Incorrect => Some(CorrectionRequest {
                path: self.media_path.clone(),
                target_epoch_millis: epoch_millis(self.sidecar_captured_at),
            }),
        }
    }
}

/// Outcome of matching one scan's media against its sidecars.
///
/// Every bucket is sorted by media path.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileResult {
    pub correct: Vec<Pair>,
    pub incorrect: Vec<Pair>,
    /// Media with no sidecar under any naming rule. Shown to the user.
    pub unmatched: Vec<FileEntry>,
    /// Edited copies and screenshots with no sidecar. Expected, not reported.
    pub suppressed: Vec<FileEntry>,
    /// Media whose sidecar has no usable capture time.
    pub missing_data: Vec<FileEntry>,
}

impl ReconcileResult {
    /// One correction per incorrect pair, in media path order.
    pub fn corrections(&self) -> Vec<CorrectionRequest> {
        self.incorrect.iter().filter_map(Pair::correction).collect()
    }

    /// Nothing to fix and nothing to look at.
    pub fn is_clean(&self) -> bool {
        self.incorrect.is_empty() && self.unmatched.is_empty()
    }
}

/// Sidecars keyed by path, built once per reconcile and never modified.
pub struct SidecarIndex<'a> {
    by_path: HashMap<PathBuf, &'a FileEntry>,
}

impl<'a> SidecarIndex<'a> {
    pub fn build(sidecars: &'a [FileEntry]) -> Self {
        let mut by_path: HashMap<PathBuf, &'a FileEntry> = HashMap::with_capacity(sidecars.len());
        for sidecar in sidecars {
            by_path
                .entry(index_key(&sidecar.path))
                .and_modify(|existing| {
                    // Same name up to extension case; keep the smallest path so the
                    // choice does not depend on scan order.
                    if sidecar.path < existing.path {
                        *existing = sidecar;
                    }
                })
                .or_insert(sidecar);
        }
        SidecarIndex { by_path }
    }

    pub fn get(&self, path: &Path) -> Option<&'a FileEntry> {
        self.by_path.get(&index_key(path)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

/// Sidecar paths compare with a lower-case extension.
fn index_key(path: &Path) -> PathBuf {
    path.with_extension(SIDECAR_EXTENSION)
}

struct Match<'a> {
    media: &'a FileEntry,
    sidecar: &'a FileEntry,
    rule: MatchRule,
    logical_path: PathBuf,
}

/// Classify a scan and reconcile it.
pub fn reconcile_entries(entries: Vec<FileEntry>, config: &MatchConfig) -> ReconcileResult {
    let classified = classify(entries);
    reconcile(&classified.media, &classified.sidecars, config)
}

/// Pair media with sidecars and sort the pairs by timestamp agreement.
///
/// Exact names are matched first for every media file; the naming-drift rules
/// only run for what is left, in media path order, and a sidecar identity is
/// never handed out twice.
pub fn reconcile(media: &[FileEntry], sidecars: &[FileEntry], config: &MatchConfig) -> ReconcileResult {
    let index = SidecarIndex::build(sidecars);

    let mut ordered: Vec<&FileEntry> = media.iter().collect();
    ordered.sort_by(|a, b| a.path.cmp(&b.path));
    ordered.dedup_by(|a, b| a.path == b.path);

    let mut result = ReconcileResult::default();
    let mut consumed: HashSet<PathBuf> = HashSet::new();
    let mut matches: Vec<Match> = Vec::new();
    let mut pending: Vec<&FileEntry> = Vec::new();

    for entry in ordered {
        let exact = sidecar_path_for(&entry.path);
        match index.get(&exact) {
            Some(sidecar) => {
                consumed.insert(index_key(&exact));
                matches.push(Match {
                    media: entry,
                    sidecar,
                    rule: MatchRule::Exact,
                    logical_path: exact,
                });
            }
            None => pending.push(entry),
        }
    }

    log::debug!(
        "{} of {} media files matched by exact name, {} sidecars indexed",
        matches.len(),
        matches.len() + pending.len(),
        index.len()
    );

    for entry in pending {
        let hit = sidecar_candidates_for(&entry.path, config)
            .into_iter()
            .filter(|candidate| !consumed.contains(&index_key(&candidate.logical_path)))
            .find_map(|candidate| index.get(&candidate.lookup_path).map(|s| (candidate, s)));

        match hit {
            Some((candidate, sidecar)) => {
                log::debug!(
                    "Matched {} to {} by {} rule",
                    entry.path.display(),
                    sidecar.path.display(),
                    candidate.rule
                );
                consumed.insert(index_key(&candidate.logical_path));
                matches.push(Match {
                    media: entry,
                    sidecar,
                    rule: candidate.rule,
                    logical_path: candidate.logical_path,
                });
            }
            None if is_special_case(&entry.path, config) => {
                log::debug!("No sidecar for {}, skipping (edited copy or screenshot)", entry.path.display());
                result.suppressed.push(entry.clone());
            }
            None => {
                log::debug!("No sidecar for {}", entry.path.display());
                result.unmatched.push(entry.clone());
            }
        }
    }

    for m in matches {
        let captured = match m.sidecar.captured_at_epoch_seconds() {
            Some(seconds) => from_epoch_seconds(seconds),
            None => {
                log::warn!(
                    "Sidecar {} for {} has no usable photoTakenTime",
                    m.sidecar.path.display(),
                    m.media.path.display()
                );
                result.missing_data.push(m.media.clone());
                continue;
            }
        };
        let captured = match captured {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Sidecar {}: {}", m.sidecar.path.display(), e);
                result.missing_data.push(m.media.clone());
                continue;
            }
        };

        let recorded = m.media.recorded_at();
        let status = if same_local_day(recorded, captured, config.zone) {
            PairStatus::Correct
        } else {
            PairStatus::Incorrect
        };

        let pair = Pair {
            media_path: m.media.path.clone(),
            sidecar_path: m.sidecar.path.clone(),
            sidecar_logical_path: m.logical_path,
            rule: m.rule,
            sidecar_captured_at: captured,
            media_recorded_at: recorded,
            status,
        };
        match status {
            PairStatus::Correct => result.correct.push(pair),
            PairStatus::Incorrect => result.incorrect.push(pair),
        }
    }

    result.correct.sort_by(|a, b| a.media_path.cmp(&b.media_path));
    result.incorrect.sort_by(|a, b| a.media_path.cmp(&b.media_path));
    result.missing_data.sort_by(|a, b| a.path.cmp(&b.path));

    log::info!(
        "Reconciled: {} correct, {} incorrect, {} unmatched, {} skipped, {} missing data",
        result.correct.len(),
        result.incorrect.len(),
        result.unmatched.len(),
        result.suppressed.len(),
        result.missing_data.len()
    );

    result
}
