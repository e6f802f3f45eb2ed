//! Level event notification.
//!
//! Scripted markers can react to things happening on the level: turns
//! passing, monsters moving, the player arriving. The simulation fires a
//! [`DungeonEvent`]; the [`EventDispatcher`] works out which markers asked
//! to hear about it and calls their [`EventListener::notify`] until one of
//! them consumes it.
//!
//! ## Example Usage
//!
//! ```
//! use dungeon_markers::core::Coord;
//! use dungeon_markers::events::{DungeonEvent, DungeonEventKind, EventDispatcher, EventMask};
//! use dungeon_markers::script::NoScripting;
//! use dungeon_markers::store::MarkerStore;
//!
//! let mut events = EventDispatcher::new();
//! events.register_global(Coord::new(4, 4), EventMask::of(DungeonEventKind::TurnElapsed));
//!
//! // Nothing lives at (4, 4), so nobody consumes the event.
//! let store = MarkerStore::new();
//! let event = DungeonEvent::new(DungeonEventKind::TurnElapsed, Coord::ORIGIN);
//! assert!(!events.fire_event(&event, &store, &NoScripting));
//! ```

mod dispatcher;
mod event;

pub use dispatcher::{EventDispatcher, EventListener, ListenerRequest, Registration};
pub use event::{DungeonEvent, DungeonEventKind, EventMask};
