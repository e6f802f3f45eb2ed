use thiserror::Error;

use super::ScriptHandle;

/// Failures reported by a [`ScriptHost`](super::ScriptHost).
///
/// Marker hooks never return these; the scripted marker logs them and falls
/// back to the hook's default.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("scripting is not available")]
    Unavailable,

    #[error("script host setup failed: {message}")]
    Setup { message: String },

    #[error("script {context:?} failed to load: {message}")]
    Compile { context: String, message: String },

    #[error("script {context:?} evaluated to {found}, expected a table")]
    NotATable { context: String, found: String },

    #[error("script table has no function {name:?}")]
    MissingFunction { name: String },

    #[error("script function {function:?} failed: {message}")]
    Runtime { function: String, message: String },

    #[error("unknown script handle {0}")]
    UnknownHandle(ScriptHandle),
}
