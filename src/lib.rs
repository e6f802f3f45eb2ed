//! # dungeon-markers
//!
//! Typed annotations attached to level cells: feature overrides, terrain
//! timers, monster bookkeeping, debug property bags and script-driven
//! triggers.
//!
//! ## Design Principles
//!
//! 1. **Closed Set of Kinds**: Every marker kind is a case of [`Marker`].
//!    Adding a kind is a compile error until every operation handles it.
//!
//! 2. **Stable Save Format**: Each kind has a persisted `u16` tag. Markers
//!    are written as tag, position, fields; readers dispatch on the tag
//!    through a registry built once per process.
//!
//! 3. **Scripting as a Capability**: Scripted markers never own a runtime.
//!    They are handed a [`ScriptHost`] for every operation that may touch
//!    scripts, and bind their table lazily.
//!
//! 4. **Listeners by Position**: Event registrations name the listening
//!    cell, not the marker. Removing markers means removing their
//!    registrations too.
//!
//! ## Modules
//!
//! - `core`: Coordinates, features, monster dispositions, configuration
//! - `codec`: Binary marker stream reader/writer
//! - `markers`: Marker kinds, the [`Marker`] handle, the registry
//! - `script`: Script host trait, Lua host, script values
//! - `events`: Level events and listener dispatch
//! - `store`: Per-level marker storage and queries
//! - `error`: Error types

#[macro_use]
mod macros;

pub mod codec;
pub mod core;
pub mod error;
pub mod events;
pub mod markers;
pub mod script;
pub mod store;

// Re-export commonly used types
pub use crate::core::{Attitude, Behaviour, Coord, Deity, Feature, ScriptConfig, TerrainChangeKind};

pub use crate::codec::{FormatVersion, MarkerReader, MarkerWriter};

pub use crate::error::{MarkerError, ParseError, ParseErrorKind};

pub use crate::markers::{
    parse_marker, read_marker, Binding, Marker, MarkerRecord, MarkerRegistry, MarkerType,
    ScriptedMarker,
};

pub use crate::script::{
    LuaHost, NoScripting, ScriptError, ScriptHandle, ScriptHost, ScriptValue, TableLease,
};

pub use crate::events::{DungeonEvent, DungeonEventKind, EventDispatcher, EventListener, EventMask};

pub use crate::store::{
    find_marker_position_by_prop, find_marker_positions_by_prop, find_markers_by_prop,
    marker_vetoes_operation, remove_markers_and_listeners_at, MarkerStore,
};
