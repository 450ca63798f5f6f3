use tracing::debug;

use crate::catalog::CatalogClient;
use crate::config;
use crate::connectivity::ConnectivityProbe;
use crate::coordinator::{Coordinator, SortMode};
use crate::engine::MediaEngine;

/// Apply the configured initial sort, then kick off the first catalog fetch.
pub fn apply_startup_defaults<E, C, P>(
    coordinator: &mut Coordinator<E, C, P>,
    settings: &config::Settings,
) where
    E: MediaEngine,
    C: CatalogClient,
    P: ConnectivityProbe,
{
    let mode = SortMode::from(settings.ui.initial_sort);
    if mode != SortMode::None {
        debug!(?mode, "initial sort");
        coordinator.sort_tracks(mode);
    }
    coordinator.fetch_catalog();
}
