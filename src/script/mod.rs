//! Scripting capability for scripted markers.
//!
//! Markers never talk to a script runtime directly. They get a
//! [`ScriptHost`] and work with opaque [`ScriptHandle`]s and runtime-neutral
//! [`ScriptValue`]s. Binding a table yields a [`TableLease`] that releases
//! the table when dropped. [`LuaHost`] is the real runtime; [`NoScripting`] is a
//! host for contexts where scripts must not run.

mod error;
mod host;
mod lua;
mod value;

pub use error::ScriptError;
pub use host::{NoScripting, ScriptHost};
pub use lua::LuaHost;
pub use value::{ScriptHandle, ScriptValue, TableLease};
