//! BSON binary data (`0x05`).

use crate::spec::BinarySubtype;

/// Binary data: a subtype byte plus an opaque byte string.
///
/// UUIDs are modeled as `Binary` with [`BinarySubtype::Uuid`] (see
/// [`crate::codec::primitive`]'s `uuid::Uuid` handler).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Binary {
    /// The binary subtype.
    pub subtype: BinarySubtype,
    /// The raw payload bytes.
    pub bytes: Vec<u8>,
}

impl Binary {
    /// Constructs a new `Binary` value.
    pub fn new(subtype: BinarySubtype, bytes: impl Into<Vec<u8>>) -> Self {
        Binary {
            subtype,
            bytes: bytes.into(),
        }
    }

    /// The serialized byte size: 4-byte length + 1 subtype byte + payload.
    pub fn byte_size(&self) -> i32 {
        4 + 1 + self.bytes.len() as i32
    }
}
