//! Scripted marker: behaviour supplied by a script table.
//!
//! The marker stores the script source and, once bound, a handle to the
//! table the source evaluated to. Binding is lazy: nothing is evaluated
//! until a hook first needs the table, and a failed bind is retried on the
//! next hook call. The table's functions are called method-style with the
//! marker position as the first argument after `self`:
//!
//! | hook           | arguments               | result                     |
//! |----------------|-------------------------|----------------------------|
//! | `activate`     | `pos, verbose`          | ignored                    |
//! | `describe`     | `pos`                   | description string         |
//! | `property`     | `pos, name`             | value string               |
//! | `set_property` | `pos, name, value`      | previous value string      |
//! | `write`        | `pos`                   | opaque state string        |
//! | `read`         | `pos, state`            | ignored                    |
//! | `on_<event>`   | `pos, event`            | truthy if consumed         |
//! | `event`        | `pos, event`            | fallback for `on_<event>`  |
//!
//! A missing function gives the hook's default. A failing one is logged and
//! also gives the default.
//!
//! The marker owns its table through a [`TableLease`]: dropping the marker
//! releases the table, and [`ScriptedMarker::release`] does so eagerly.

use std::cell::RefCell;

use crate::codec::{MarkerReader, MarkerWriter};
use crate::core::Coord;
use crate::error::{MarkerError, ParseErrorKind};
use crate::events::DungeonEvent;
use crate::script::{LuaHost, ScriptHandle, ScriptHost, ScriptValue, TableLease};

use super::Marker;

/// Whether a scripted marker currently owns a script table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Binding {
    #[default]
    Unbound,
    Bound(ScriptHandle),
}

impl From<Option<&TableLease>> for Binding {
    fn from(lease: Option<&TableLease>) -> Self {
        lease.map_or(Binding::Unbound, |lease| Binding::Bound(lease.handle()))
    }
}

/// A marker whose behaviour lives in a script.
///
/// Equality compares position, source and unrestored state; the binding
/// and the context label are runtime details and are ignored.
#[derive(Debug, Default)]
pub struct ScriptedMarker {
    pub pos: Coord,
    source: String,
    context: String,
    lease: RefCell<Option<TableLease>>,
    /// State read from a save (or snapshotted by `duplicate`) that has not
    /// yet been handed to the table's `read` function.
    pending_state: RefCell<Option<String>>,
}

impl ScriptedMarker {
    /// An uninitialised marker with no script.
    #[must_use]
    pub fn new(pos: Coord) -> Self {
        Self {
            pos,
            ..Self::default()
        }
    }

    /// A marker running `source`. `context` labels the source in errors.
    #[must_use]
    pub fn from_source(pos: Coord, source: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            pos,
            source: source.into(),
            context: context.into(),
            ..Self::default()
        }
    }

    /// Parse the body of `lua:<expression>`.
    ///
    /// The expression must compile; it is not evaluated until the marker
    /// binds.
    pub(crate) fn parse(body: &str, context: &str) -> Result<Marker, ParseErrorKind> {
        let expression = body.trim();
        if expression.is_empty() {
            return Err(ParseErrorKind::EmptyScript);
        }
        let source = format!("return {expression}");
        LuaHost::check_syntax(&source, context)
            .map_err(|err| ParseErrorKind::InvalidScript(err.to_string()))?;
        Ok(Marker::Scripted(Self::from_source(Coord::ORIGIN, source, context)))
    }

    /// The script source, `return <expression>` for parsed markers.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Label used for the source in script errors. Not persisted.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Current binding state.
    pub fn binding(&self) -> Binding {
        Binding::from(self.lease.borrow().as_ref())
    }

    /// Whether the marker currently owns a script table.
    pub fn is_bound(&self) -> bool {
        self.lease.borrow().is_some()
    }

    fn bound_handle(&self) -> Option<ScriptHandle> {
        self.lease.borrow().as_ref().map(TableLease::handle)
    }

    /// Whether the marker has a script at all.
    pub fn is_initialised(&self) -> bool {
        !self.source.is_empty()
    }

    /// State waiting to be restored into the table on the next bind.
    pub fn pending_state(&self) -> Option<String> {
        self.pending_state.borrow().clone()
    }

    /// Replace the script. Any bound table is released and pending state is
    /// discarded; the new source binds lazily.
    pub fn set_source(
        &mut self,
        host: &dyn ScriptHost,
        source: impl Into<String>,
        context: impl Into<String>,
    ) {
        self.release(host);
        self.source = source.into();
        self.context = context.into();
        self.pending_state.replace(None);
    }

    /// Bind the script table if not bound yet and return its handle.
    ///
    /// On a fresh bind any pending state is passed to the table's `read`
    /// function. Returns `None` for an uninitialised marker or when binding
    /// fails; the failure is logged and binding is retried next time.
    pub fn check_register_table(&self, host: &dyn ScriptHost) -> Option<ScriptHandle> {
        if let Some(handle) = self.bound_handle() {
            return Some(handle);
        }
        if self.source.is_empty() {
            return None;
        }

        let lease = match host.bind(&self.source, &self.context) {
            Ok(lease) => lease,
            Err(err) => {
                tracing::warn!(pos = %self.pos, context = %self.context, error = %err, "scripted marker failed to bind");
                return None;
            }
        };
        let handle = lease.handle();
        self.lease.replace(Some(lease));
        tracing::debug!(pos = %self.pos, %handle, "scripted marker bound");

        let state = self.pending_state.borrow_mut().take();
        if let Some(state) = state {
            if host.has_function(handle, "read") {
                let args = [ScriptValue::Coord(self.pos), ScriptValue::Str(state)];
                if let Err(err) = host.call(handle, "read", &args) {
                    tracing::warn!(pos = %self.pos, error = %err, "script failed to restore state");
                }
            }
        }
        Some(handle)
    }

    /// Call hook `name` with the position prepended to `args`.
    ///
    /// `None` if the marker cannot bind, the function is missing, or it
    /// failed.
    fn call_hook(&self, host: &dyn ScriptHost, name: &str, args: &[ScriptValue]) -> Option<ScriptValue> {
        let handle = self.check_register_table(host)?;
        if !host.has_function(handle, name) {
            return None;
        }
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(ScriptValue::Coord(self.pos));
        full.extend_from_slice(args);
        match host.call(handle, name, &full) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(pos = %self.pos, function = name, error = %err, "script hook failed");
                None
            }
        }
    }

    /// Run the script's `activate` function, binding first if needed.
    pub fn activate(&self, host: &dyn ScriptHost, verbose: bool) {
        self.call_hook(host, "activate", &[ScriptValue::Bool(verbose)]);
    }

    /// The script's description, or a summary of the source.
    pub fn describe(&self, host: &dyn ScriptHost) -> String {
        if let Some(text) = self
            .call_hook(host, "describe", &[])
            .and_then(|v| v.to_text())
        {
            return text;
        }
        if self.source.is_empty() {
            return "scripted marker (empty)".to_string();
        }
        let state = if self.is_bound() { "bound" } else { "unbound" };
        let first_line = self.source.lines().next().unwrap_or_default();
        format!("scripted marker ({state}): {first_line}")
    }

    /// Ask the script for property `name`.
    pub fn property(&self, host: &dyn ScriptHost, name: &str) -> Option<String> {
        self.call_hook(host, "property", &[ScriptValue::from(name)])
            .and_then(|v| v.to_text())
    }

    /// Forward to the script's `set_property`; returns what it reports as
    /// the previous value.
    pub fn set_property(&self, host: &dyn ScriptHost, name: &str, value: &str) -> Option<String> {
        self.call_hook(
            host,
            "set_property",
            &[ScriptValue::from(name), ScriptValue::from(value)],
        )
        .and_then(|v| v.to_text())
    }

    /// Deliver an event. Uses `on_<kind>` when the table defines it,
    /// otherwise the generic `event` handler.
    pub fn notify(&self, event: &DungeonEvent, host: &dyn ScriptHost) -> bool {
        let Some(handle) = self.check_register_table(host) else {
            return false;
        };
        let specific = format!("on_{}", event.kind.name());
        let handler = if host.has_function(handle, &specific) {
            specific.as_str()
        } else {
            "event"
        };
        self.call_hook(host, handler, &[event.to_script_value()])
            .is_some_and(|v| v.is_truthy())
    }

    /// Current script state: the live table's `write` result when bound,
    /// the unrestored state otherwise.
    fn snapshot_state(&self, host: &dyn ScriptHost) -> Option<String> {
        match self.binding() {
            Binding::Bound(handle) => {
                if !host.has_function(handle, "write") {
                    return None;
                }
                match host.call(handle, "write", &[ScriptValue::Coord(self.pos)]) {
                    Ok(value) => value.to_text(),
                    Err(err) => {
                        tracing::warn!(pos = %self.pos, error = %err, "script failed to save state");
                        None
                    }
                }
            }
            Binding::Unbound => self.pending_state(),
        }
    }

    /// Write the marker's fields. An unbound marker is not bound by this;
    /// its pending state is written as is.
    pub fn write_fields(&self, w: &mut MarkerWriter<'_>, host: &dyn ScriptHost) -> Result<(), MarkerError> {
        w.write_bool(self.is_initialised())?;
        if !self.is_initialised() {
            return Ok(());
        }
        w.write_str(&self.source)?;
        match self.snapshot_state(host) {
            Some(state) => {
                w.write_bool(true)?;
                w.write_str(&state)
            }
            None => w.write_bool(false),
        }
    }

    /// Read a marker written by `write_fields`. The result is unbound.
    pub(crate) fn read(r: &mut MarkerReader<'_>, pos: Coord) -> Result<Self, MarkerError> {
        let mut marker = Self::new(pos);
        if r.read_bool()? {
            marker.source = r.read_string()?;
            if r.read_bool()? {
                marker.pending_state.replace(Some(r.read_string()?));
            }
        }
        Ok(marker)
    }

    /// Release the bound table, if any. The marker keeps its source and can
    /// bind again.
    pub fn release(&mut self, host: &dyn ScriptHost) {
        if let Some(lease) = self.lease.get_mut().take() {
            host.release(lease.handle());
        }
    }

    /// Copy the marker, carrying the live script state into the copy.
    ///
    /// Unlike `clone`, which only copies state that was never restored.
    #[must_use]
    pub fn duplicate(&self, host: &dyn ScriptHost) -> Self {
        let copy = self.clone();
        if self.is_bound() {
            copy.pending_state.replace(self.snapshot_state(host));
        }
        copy
    }
}

impl Clone for ScriptedMarker {
    /// The copy is unbound; it binds its own table when first used.
    fn clone(&self) -> Self {
        Self {
            pos: self.pos,
            source: self.source.clone(),
            context: self.context.clone(),
            lease: RefCell::new(None),
            pending_state: RefCell::new(self.pending_state()),
        }
    }
}

impl PartialEq for ScriptedMarker {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
            && self.source == other.source
            && *self.pending_state.borrow() == *other.pending_state.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::NoScripting;

    #[test]
    fn test_parse_wraps_expression() {
        let Marker::Scripted(marker) = ScriptedMarker::parse(" { x = 1 } ", "vault").unwrap() else {
            panic!("expected a scripted marker");
        };
        assert_eq!(marker.source(), "return { x = 1 }");
        assert_eq!(marker.context(), "vault");
        assert!(!marker.is_bound());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(ScriptedMarker::parse("   ", ""), Err(ParseErrorKind::EmptyScript));
    }

    #[test]
    fn test_parse_rejects_uncompilable_expression() {
        assert!(matches!(
            ScriptedMarker::parse("{ this is not lua", "vault"),
            Err(ParseErrorKind::InvalidScript(_))
        ));
    }

    #[test]
    fn test_uninitialised_marker_is_inert() {
        let marker = ScriptedMarker::new(Coord::new(2, 2));
        marker.activate(&NoScripting, true);
        assert_eq!(marker.check_register_table(&NoScripting), None);
        assert_eq!(marker.describe(&NoScripting), "scripted marker (empty)");
        assert_eq!(marker.property(&NoScripting, "anything"), None);
    }

    #[test]
    fn test_failed_bind_stays_unbound() {
        let marker = ScriptedMarker::from_source(Coord::ORIGIN, "return {}\nline two", "");
        assert_eq!(marker.check_register_table(&NoScripting), None);
        assert_eq!(marker.binding(), Binding::Unbound);
        assert_eq!(marker.describe(&NoScripting), "scripted marker (unbound): return {}");
    }

    #[test]
    fn test_clone_keeps_pending_state() {
        let marker = ScriptedMarker::from_source(Coord::new(1, 1), "return {}", "");
        marker.pending_state.replace(Some("saved".into()));
        let copy = marker.clone();
        assert_eq!(copy, marker);
        assert_eq!(copy.pending_state().as_deref(), Some("saved"));
    }
}
