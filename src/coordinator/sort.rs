use std::sync::Arc;

use crate::catalog::Track;

use super::state::SortMode;

/// Return `tracks` reordered for `mode`.
///
/// Sorting is stable, so applying the same mode twice is a no-op.
/// `SortMode::None` keeps the input order.
pub fn ordered(tracks: &[Arc<Track>], mode: SortMode) -> Vec<Arc<Track>> {
    let mut out = tracks.to_vec();
    match mode {
        SortMode::None => {}
        SortMode::ByName => out.sort_by(|a, b| a.title.cmp(&b.title)),
        SortMode::ByDuration => out.sort_by_key(|t| t.duration_secs),
    }
    out
}
