//! Values passed across the script boundary.

use serde::{Deserialize, Serialize};

use crate::core::Coord;

/// Opaque handle to a script table owned by a host.
///
/// Hosts never reuse a handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScriptHandle(pub u64);

impl std::fmt::Display for ScriptHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Script({})", self.0)
    }
}

/// Ownership of one bound script table.
///
/// Returned by [`ScriptHost::bind`](super::ScriptHost::bind). Dropping the
/// lease releases the table, so a marker that owns a lease frees its table
/// however it is destroyed. Releasing through the host first is harmless.
pub struct TableLease {
    handle: ScriptHandle,
    on_release: Option<Box<dyn FnOnce(ScriptHandle)>>,
}

impl TableLease {
    /// A lease that runs `on_release` when dropped.
    pub fn new(handle: ScriptHandle, on_release: impl FnOnce(ScriptHandle) + 'static) -> Self {
        Self {
            handle,
            on_release: Some(Box::new(on_release)),
        }
    }

    /// A lease with nothing to release, for hosts that do not track tables.
    #[must_use]
    pub fn untracked(handle: ScriptHandle) -> Self {
        Self {
            handle,
            on_release: None,
        }
    }

    /// The handle this lease owns.
    #[must_use]
    pub fn handle(&self) -> ScriptHandle {
        self.handle
    }
}

impl Drop for TableLease {
    fn drop(&mut self) {
        if let Some(on_release) = self.on_release.take() {
            on_release(self.handle);
        }
    }
}

impl std::fmt::Debug for TableLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TableLease").field(&self.handle).finish()
    }
}

/// A script-side value, independent of the scripting runtime.
///
/// Tables are kept as ordered key/value pairs; hosts converting from a
/// runtime table sort the keys so results are deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ScriptValue {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Number(f64),
    Str(String),
    Coord(Coord),
    Table(Vec<(String, ScriptValue)>),
}

impl ScriptValue {
    /// Script truthiness: everything but `nil` and `false` is true.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, ScriptValue::Nil | ScriptValue::Bool(false))
    }

    /// Text form of a scalar return value. Empty strings and non-scalars
    /// give `None`.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            ScriptValue::Str(s) if !s.is_empty() => Some(s.clone()),
            ScriptValue::Int(n) => Some(n.to_string()),
            ScriptValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Look up a field of a table value.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&ScriptValue> {
        match self {
            ScriptValue::Table(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<&str> for ScriptValue {
    fn from(s: &str) -> Self {
        ScriptValue::Str(s.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(s: String) -> Self {
        ScriptValue::Str(s)
    }
}

impl From<bool> for ScriptValue {
    fn from(b: bool) -> Self {
        ScriptValue::Bool(b)
    }
}

impl From<i64> for ScriptValue {
    fn from(n: i64) -> Self {
        ScriptValue::Int(n)
    }
}

impl From<Coord> for ScriptValue {
    fn from(c: Coord) -> Self {
        ScriptValue::Coord(c)
    }
}
