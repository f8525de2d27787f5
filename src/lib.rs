//! An in-memory BSON value model and a generic reader/writer/handler codec
//! layer for mapping it onto Rust records and sum types.
//!
//! This crate models the BSON value algebra ([`Bson`], [`Document`],
//! [`ObjectId`], [`Decimal128`], and friends), the numeric/boolean coercion
//! lattice over it, and a combinator-based [`codec`] layer used to read and
//! write typed Rust values against it. It deliberately stops at the value
//! tree: turning a [`Bson`] value into wire bytes (or back) is the job of an
//! external serializer, not this crate.
//!
//! ```
//! use bson_values::{
//!     bson::Bson,
//!     codec::{primitive::Int32Handler, Reader, Writer},
//!     document::Document,
//! };
//!
//! let doc = Document::new().append("answer", 42i32);
//! let answer: i32 = Int32Handler.read_try(doc.get("answer").unwrap()).unwrap();
//! assert_eq!(answer, 42);
//! assert_eq!(Int32Handler.write_try(&answer).unwrap(), Bson::Int32(42));
//! ```

pub mod binary;
pub mod bson;
pub mod codec;
pub mod datetime;
pub mod decimal128;
pub mod derive;
pub mod document;
pub mod error;
pub mod oid;
pub mod spec;
pub mod timestamp;

pub use crate::{
    binary::Binary,
    bson::{Array, Bson, Regex},
    datetime::DateTime,
    decimal128::Decimal128,
    document::{BsonElement, Document},
    error::{Error, ErrorKind, Result},
    oid::ObjectId,
    spec::{BinarySubtype, ElementType},
    timestamp::Timestamp,
};
