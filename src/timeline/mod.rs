//! Scheduling engine: the date × segment grid, drag sessions, connectors and
//! undo history. Nothing in here draws; `ui::timeline_view` does.

pub mod date_axis;
pub mod drag;
pub mod geometry;
pub mod history;
pub mod router;
pub mod stacking;
pub mod state;
pub mod store;

pub use date_axis::DateAxis;
pub use drag::{CaptureRegistry, DragMode, DragSession, PointerCapture};
pub use geometry::{GridCell, GridGeometry, GridSpan};
pub use history::{HistoryLog, Snapshot, DEFAULT_HISTORY_LIMIT};
pub use router::{
    AnchorClick, ConnectionRouter, ConnectorPath, PendingConnection, RouteCache, RouteViewport,
    RoutedConnection,
};
pub use state::{Action, CardLayout, Outcome, Selection, Timeline, TimelineInput};
pub use store::{FunnelStore, MemoryStore};
