//! Listener registrations and event delivery.
//!
//! The dispatcher never owns listeners. A registration records the cell of
//! the listening marker and what it wants to hear; delivery looks the
//! markers up in the [`MarkerStore`] at fire time. Removing a marker
//! therefore needs an explicit [`EventDispatcher::remove_listeners_at`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::Coord;
use crate::script::ScriptHost;
use crate::store::MarkerStore;

use super::event::{DungeonEvent, EventMask};

/// Something that can be told about level events.
pub trait EventListener {
    /// Handle `event`. Returns `true` if the event was consumed, which stops
    /// delivery to further listeners.
    fn notify(&self, event: &DungeonEvent, host: &dyn ScriptHost) -> bool;
}

/// A subscription requested by a script during activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerRequest {
    pub mask: EventMask,
    /// Cell to watch. `None` subscribes to events anywhere on the level.
    pub watch: Option<Coord>,
}

/// One registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Cell of the listening marker(s).
    pub listener: Coord,
    pub mask: EventMask,
}

/// Event delivery table for one level.
#[derive(Clone, Debug, Default)]
pub struct EventDispatcher {
    global: Vec<Registration>,
    positional: FxHashMap<Coord, Vec<Registration>>,
}

impl EventDispatcher {
    /// Create an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe the markers at `listener` to `mask` events anywhere.
    pub fn register_global(&mut self, listener: Coord, mask: EventMask) {
        self.global.push(Registration { listener, mask });
    }

    /// Subscribe the markers at `listener` to `mask` events at `watch`.
    pub fn register_at(&mut self, watch: Coord, listener: Coord, mask: EventMask) {
        self.positional
            .entry(watch)
            .or_default()
            .push(Registration { listener, mask });
    }

    /// Apply a script's subscription request on behalf of `listener`.
    pub fn register(&mut self, listener: Coord, request: ListenerRequest) {
        if request.mask.is_empty() {
            return;
        }
        match request.watch {
            Some(watch) => self.register_at(watch, listener, request.mask),
            None => self.register_global(listener, request.mask),
        }
    }

    /// Drop every registration made by markers at `pos`, and every
    /// positional registration watching `pos`.
    pub fn remove_listeners_at(&mut self, pos: Coord) {
        self.global.retain(|r| r.listener != pos);
        self.positional.remove(&pos);
        self.positional.retain(|_, regs| {
            regs.retain(|r| r.listener != pos);
            !regs.is_empty()
        });
    }

    /// Check whether markers at `listener` have any registration.
    #[must_use]
    pub fn is_listening(&self, listener: Coord) -> bool {
        self.global.iter().any(|r| r.listener == listener)
            || self
                .positional
                .values()
                .any(|regs| regs.iter().any(|r| r.listener == listener))
    }

    /// Total number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.global.len() + self.positional.values().map(Vec::len).sum::<usize>()
    }

    /// Check if there are no registrations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Listener cells interested in `event`: global registrations first,
    /// then those watching the event's cell. Each cell appears once.
    #[must_use]
    pub fn listeners_for(&self, event: &DungeonEvent) -> Vec<Coord> {
        let positional = self
            .positional
            .get(&event.place)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut cells: Vec<Coord> = Vec::new();
        for reg in self.global.iter().chain(positional) {
            if reg.mask.contains(event.kind) && !cells.contains(&reg.listener) {
                cells.push(reg.listener);
            }
        }
        cells
    }

    /// Deliver `event` to every interested marker in `store`.
    ///
    /// Stops at the first listener that consumes the event and returns
    /// `true`; returns `false` if nobody did.
    pub fn fire_event(
        &self,
        event: &DungeonEvent,
        store: &MarkerStore,
        host: &dyn ScriptHost,
    ) -> bool {
        for cell in self.listeners_for(event) {
            for marker in store.markers_at(cell) {
                if marker.notify(event, host) {
                    tracing::trace!(kind = %event.kind, listener = %cell, "event consumed");
                    return true;
                }
            }
        }
        false
    }
}
