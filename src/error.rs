//! Error types for marker I/O and marker text parsing.
//!
//! The two taxonomies are kept apart on purpose:
//!
//! - [`MarkerError`]: structural problems with persisted data (unknown tag,
//!   truncated stream, out-of-range byte). Fatal for the load that hit them.
//! - [`ParseError`]: problems with authored text. Recoverable; always carries
//!   the offending text and the caller's context string.

use std::io;

use thiserror::Error;

use crate::markers::MarkerType;

/// Errors raised while encoding or decoding markers.
#[derive(Debug, Error)]
pub enum MarkerError {
    /// The stream names a marker type this build does not know.
    #[error("unknown marker type tag {tag}")]
    UnknownTag {
        /// The unrecognised tag.
        tag: u16,
    },

    /// A field decoded to a value outside its domain.
    #[error("corrupt marker data: {detail}")]
    Corrupt {
        /// Human-readable description of what went wrong.
        detail: String,
    },

    /// The underlying encoder failed (truncated stream, size limit, ...).
    #[error("marker stream error: {0}")]
    Codec(#[from] bincode::Error),

    /// An I/O error outside the encoder.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// `set_property` on a marker kind without writable properties.
    #[error("{kind} markers have no writable properties")]
    ReadOnlyProperties {
        /// The marker kind that rejected the write.
        kind: MarkerType,
    },
}

impl MarkerError {
    /// Shorthand for a [`MarkerError::Corrupt`] error.
    pub fn corrupt(detail: impl Into<String>) -> Self {
        Self::Corrupt {
            detail: detail.into(),
        }
    }
}

/// What was wrong with a marker's text form.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// No leading `<kind>:` token.
    #[error("missing marker kind")]
    MissingKind,

    /// The leading token names no marker kind.
    #[error("unknown marker kind '{0}'")]
    UnknownKind(String),

    /// The kind exists but has no text form.
    #[error("{0} markers cannot be written as text")]
    NoTextForm(MarkerType),

    /// `feat:` named a feature that does not exist.
    #[error("unknown feature '{0}'")]
    UnknownFeature(String),

    /// `lua:` with nothing after it.
    #[error("empty script")]
    EmptyScript,

    /// `lua:` with an expression that does not compile.
    #[error("invalid script: {0}")]
    InvalidScript(String),

    /// A `wiz:` segment that is not `key=value`.
    #[error("malformed property '{0}'")]
    MalformedProperty(String),
}

/// A marker text form that could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("bad marker \"{text}\"{}: {kind}", context_suffix(.context))]
pub struct ParseError {
    /// The full text that was being parsed.
    pub text: String,

    /// Where the text came from (map name, file and line, ...).
    pub context: String,

    /// What was wrong with it.
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(text: impl Into<String>, context: impl Into<String>, kind: ParseErrorKind) -> Self {
        Self {
            text: text.into(),
            context: context.into(),
            kind,
        }
    }
}

fn context_suffix(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!(" in {context}")
    }
}
