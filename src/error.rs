//! Contains the error-related types for the crate.
//!
//! There is a single [`Error`]/[`ErrorKind`] pair for the whole crate: value-model
//! errors (malformed [`crate::oid::ObjectId`] hex, non-representable
//! [`crate::decimal128::Decimal128`] coercions) and codec-layer errors (type
//! mismatches, missing fields, derivation failures) share the same shape so that a
//! record reader can attach field-path context to a nested failure regardless of
//! where it originated.

use thiserror::Error;

/// The result type for all fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur in this crate.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,

    /// An optional message giving more detail than the kind's static description.
    pub message: Option<String>,

    /// The document key associated with the error, if any.
    pub key: Option<String>,

    /// The array index associated with the error, if any.
    pub index: Option<usize>,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BSON error")?;

        if let Some(key) = self.key.as_deref() {
            write!(f, " at key \"{key}\"")?;
        } else if let Some(index) = self.index {
            write!(f, " at array index {index}")?;
        }

        write!(f, ". Kind: {}", self.kind)?;
        if let Some(ref message) = self.message {
            write!(f, ". Message: {message}")?;
        }

        write!(f, ".")
    }
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Error {
            kind,
            message: None,
            key: None,
            index: None,
        }
    }

    pub(crate) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach a document key to this error, unless one is already set.
    ///
    /// Used by record derivation to annotate a nested field failure with the
    /// name under which it was being read, without overwriting context attached
    /// by a deeper nesting level.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        if self.key.is_none() && self.index.is_none() {
            self.key = Some(key.into());
        }
        self
    }

    /// Attach an array index to this error, unless context is already set.
    pub fn with_index(mut self, index: usize) -> Self {
        if self.key.is_none() && self.index.is_none() {
            self.index = Some(index);
        }
        self
    }

    pub(crate) fn type_mismatch(expected: &'static str, actual: &'static str) -> Self {
        Error::new(ErrorKind::TypeMismatch { expected, actual })
    }

    pub(crate) fn value_not_found() -> Self {
        Error::new(ErrorKind::ValueNotFound {})
    }

    pub(crate) fn decode_failure(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::DecodeFailure {}).with_message(message)
    }

    pub(crate) fn derivation(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::DerivationError {}).with_message(message)
    }
}

/// The kinds of errors that can occur in this crate.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An error related to the [`crate::binary::Binary`] type occurred.
    #[error("A Binary-related error occurred")]
    #[non_exhaustive]
    Binary {},

    /// An error related to the [`crate::datetime::DateTime`] type occurred.
    #[error("A DateTime-related error occurred")]
    #[non_exhaustive]
    DateTime {},

    /// An error related to the [`crate::decimal128::Decimal128`] type occurred.
    #[error("A Decimal128-related error occurred")]
    #[non_exhaustive]
    Decimal128 {},

    /// An error related to the [`crate::oid::ObjectId`] type occurred.
    #[error("An ObjectId-related error occurred")]
    #[non_exhaustive]
    ObjectId {},

    /// Attempted to access a [`crate::document::Document`] or [`crate::bson::Array`]
    /// value with the wrong expected type.
    #[error("Expected a value of type {expected}, found {actual}")]
    #[non_exhaustive]
    TypeMismatch {
        /// The expected BSON type or Rust target type.
        expected: &'static str,
        /// The actual BSON variant encountered.
        actual: &'static str,
    },

    /// A required key was absent from a document, or an index was out of range
    /// in an array.
    #[error("The requested value was not found")]
    #[non_exhaustive]
    ValueNotFound {},

    /// Decoding succeeded structurally but the value violated a semantic
    /// constraint (e.g. a `Double` that is not a whole number when reading an
    /// integral field, or an invalid ObjectId hex string).
    #[error("Decoding failed")]
    #[non_exhaustive]
    DecodeFailure {},

    /// Raised only at codec construction time, never at encode/decode time: a
    /// shape the derivation layer cannot handle (`@Flatten` on a recursive or
    /// non-record field, ambiguous sum-type discriminators, ...).
    #[error("Derivation failed")]
    #[non_exhaustive]
    DerivationError {},
}
