//! Level marker storage and the queries the simulation runs against it.

mod marker_store;
mod query;

pub use marker_store::MarkerStore;
pub use query::{
    find_marker_position_by_prop, find_marker_positions_by_prop, find_markers_by_prop,
    marker_vetoes_operation, remove_markers_and_listeners_at,
};
