use crate::events::ListenerRequest;

use super::{ScriptError, ScriptHandle, ScriptValue, TableLease};

/// The scripting capability handed to markers.
///
/// A host evaluates marker sources into tables and calls functions on them.
/// Every table function is called method-style: the table itself is passed
/// first, followed by `args`.
pub trait ScriptHost {
    /// Evaluate `source` and keep the resulting table alive until the
    /// returned lease is dropped or the handle is released.
    ///
    /// `context` names the source in error messages.
    fn bind(&self, source: &str, context: &str) -> Result<TableLease, ScriptError>;

    /// Check whether the bound table has a function called `name`.
    fn has_function(&self, handle: ScriptHandle, name: &str) -> bool;

    /// Call `name` on the bound table.
    fn call(
        &self,
        handle: ScriptHandle,
        name: &str,
        args: &[ScriptValue],
    ) -> Result<ScriptValue, ScriptError>;

    /// Drop the table behind `handle` now. Unknown handles are ignored.
    fn release(&self, handle: ScriptHandle);

    /// Drain listener registrations requested by scripts since the last call.
    fn take_listener_requests(&self) -> Vec<ListenerRequest> {
        Vec::new()
    }
}

/// A host for builds or levels without scripting.
///
/// Binding always fails, so scripted markers stay unbound and every hook
/// returns its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoScripting;

impl ScriptHost for NoScripting {
    fn bind(&self, _source: &str, _context: &str) -> Result<TableLease, ScriptError> {
        Err(ScriptError::Unavailable)
    }

    fn has_function(&self, _handle: ScriptHandle, _name: &str) -> bool {
        false
    }

    fn call(
        &self,
        handle: ScriptHandle,
        _name: &str,
        _args: &[ScriptValue],
    ) -> Result<ScriptValue, ScriptError> {
        Err(ScriptError::UnknownHandle(handle))
    }

    fn release(&self, _handle: ScriptHandle) {}
}
