//! Error type shared by every codec in this crate.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every way a codec operation in this crate can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Structural corruption in a binary GFF or ERF file: bad magic, a truncated
    /// section, or an offset that points outside the file.
    #[error("malformed binary data at offset {offset}: {message}")]
    MalformedBinary {
        /// Byte offset into the source file where the problem was detected.
        offset: u64,
        /// Human-readable description of what was expected.
        message: String,
    },

    /// A DSL or JSON document failed to parse.
    #[error("malformed text at {location}: {message}")]
    MalformedText {
        /// `line N` for the DSL codec, or a JSON-pointer-style path for the JSON codec.
        location: String,
        /// Human-readable cause.
        message: String,
    },

    /// A type tag was not found in the field type registry.
    #[error("unknown field type tag: {0}")]
    UnknownType(String),

    /// A field's declared type and its payload shape disagree, e.g. a `"list"`
    /// field whose JSON value is not an array.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// What the declared type required.
        expected: String,
        /// What was actually present.
        found: String,
    },

    /// A backslash appeared in a literal-string-typed value, or a label/resref
    /// contained a non-ASCII byte.
    #[error("invalid character: {0}")]
    InvalidCharacter(String),

    /// A DSL `end()` token closed a scope that was never opened, or a node was
    /// left open at end of input.
    #[error("unbalanced scope: {0}")]
    UnbalancedScope(String),

    /// The underlying byte stream failed.
    #[error("I/O failure: {0}")]
    IoFailure(#[from] std::io::Error),

    /// A `serde_json` value could not be parsed or did not have the expected shape.
    #[error("JSON failure: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Builds a [`Error::MalformedBinary`] at the given offset.
    pub fn malformed_binary(offset: u64, message: impl Into<String>) -> Self {
        Error::MalformedBinary { offset, message: message.into() }
    }

    /// Builds a [`Error::MalformedText`] for the DSL codec, identified by line number.
    pub fn malformed_line(line: usize, message: impl Into<String>) -> Self {
        Error::MalformedText { location: format!("line {line}"), message: message.into() }
    }

    /// Builds a [`Error::MalformedText`] for the JSON codec, identified by a path.
    pub fn malformed_json_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::MalformedText { location: path.into(), message: message.into() }
    }
}
