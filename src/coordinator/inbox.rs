use crate::catalog::{CatalogError, Track};
use crate::engine::EngineEvent;

/// Messages delivered to the coordinator's single execution context.
#[derive(Debug)]
pub enum Inbound {
    /// Notification from the media engine about load `load`.
    Engine { load: u64, event: EngineEvent },
    /// A catalog fetch finished; `request` is the token it was started with.
    CatalogLoaded {
        request: u64,
        result: Result<Vec<Track>, CatalogError>,
    },
    /// Position-polling tick from the poller started as `generation`.
    PositionTick { generation: u64 },
}
