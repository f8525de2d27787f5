//! BSON type tags, as defined by the [BSON specification](http://bsonspec.org/spec.html).

/// The 1-byte type tag that precedes every BSON element's value on the wire.
///
/// This crate does not serialize to bytes itself (see the crate-level docs),
/// but every [`crate::bson::Bson`] variant carries its tag so that
/// [`crate::bson::Bson::byte_size`] and an external wire serializer agree on
/// what gets written.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ElementType {
    /// `0x01` IEEE-754 64-bit floating point.
    Double = 0x01,
    /// `0x02` UTF-8 string.
    String = 0x02,
    /// `0x03` embedded document.
    Document = 0x03,
    /// `0x04` array.
    Array = 0x04,
    /// `0x05` binary data.
    Binary = 0x05,
    /// `0x06` undefined (deprecated).
    Undefined = 0x06,
    /// `0x07` ObjectId.
    ObjectId = 0x07,
    /// `0x08` boolean.
    Boolean = 0x08,
    /// `0x09` UTC datetime.
    DateTime = 0x09,
    /// `0x0A` null.
    Null = 0x0A,
    /// `0x0B` regular expression.
    RegularExpression = 0x0B,
    /// `0x0D` JavaScript code.
    JavaScriptCode = 0x0D,
    /// `0x0E` symbol (deprecated).
    Symbol = 0x0E,
    /// `0x0F` JavaScript code with scope.
    JavaScriptCodeWithScope = 0x0F,
    /// `0x10` 32-bit integer.
    Int32 = 0x10,
    /// `0x11` replication timestamp.
    Timestamp = 0x11,
    /// `0x12` 64-bit integer.
    Int64 = 0x12,
    /// `0x13` 128-bit decimal floating point.
    Decimal128 = 0x13,
    /// `0xFF` min key.
    MinKey = 0xFF,
    /// `0x7F` max key.
    MaxKey = 0x7F,
}

impl ElementType {
    /// Look up the variant for a raw type tag, if it is recognized.
    pub fn from_tag(tag: u8) -> Option<ElementType> {
        use ElementType::*;
        Some(match tag {
            0x01 => Double,
            0x02 => String,
            0x03 => Document,
            0x04 => Array,
            0x05 => Binary,
            0x06 => Undefined,
            0x07 => ObjectId,
            0x08 => Boolean,
            0x09 => DateTime,
            0x0A => Null,
            0x0B => RegularExpression,
            0x0D => JavaScriptCode,
            0x0E => Symbol,
            0x0F => JavaScriptCodeWithScope,
            0x10 => Int32,
            0x11 => Timestamp,
            0x12 => Int64,
            0x13 => Decimal128,
            0xFF => MinKey,
            0x7F => MaxKey,
            _ => return None,
        })
    }

    /// The raw type tag for this variant.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// A short human-readable name, used in [`crate::error::ErrorKind::TypeMismatch`]
    /// messages.
    pub fn name(self) -> &'static str {
        use ElementType::*;
        match self {
            Double => "double",
            String => "string",
            Document => "document",
            Array => "array",
            Binary => "binary",
            Undefined => "undefined",
            ObjectId => "objectId",
            Boolean => "bool",
            DateTime => "date",
            Null => "null",
            RegularExpression => "regex",
            JavaScriptCode => "javascript",
            Symbol => "symbol",
            JavaScriptCodeWithScope => "javascriptWithScope",
            Int32 => "int",
            Timestamp => "timestamp",
            Int64 => "long",
            Decimal128 => "decimal",
            MinKey => "minKey",
            MaxKey => "maxKey",
        }
    }
}

/// The subtype byte of a [`crate::binary::Binary`] value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum BinarySubtype {
    /// `0x00` generic binary data.
    Generic,
    /// `0x01` function.
    Function,
    /// `0x02` binary (old, deprecated).
    BinaryOld,
    /// `0x03` UUID (old, deprecated).
    UuidOld,
    /// `0x04` UUID.
    Uuid,
    /// `0x05` MD5 hash.
    Md5,
    /// `0x06` encrypted BSON value.
    Encrypted,
    /// A user-defined subtype in the `0x80..=0xFF` range.
    UserDefined(u8),
}

impl From<BinarySubtype> for u8 {
    fn from(t: BinarySubtype) -> u8 {
        match t {
            BinarySubtype::Generic => 0x00,
            BinarySubtype::Function => 0x01,
            BinarySubtype::BinaryOld => 0x02,
            BinarySubtype::UuidOld => 0x03,
            BinarySubtype::Uuid => 0x04,
            BinarySubtype::Md5 => 0x05,
            BinarySubtype::Encrypted => 0x06,
            BinarySubtype::UserDefined(x) => x,
        }
    }
}

impl From<u8> for BinarySubtype {
    fn from(t: u8) -> BinarySubtype {
        match t {
            0x00 => BinarySubtype::Generic,
            0x01 => BinarySubtype::Function,
            0x02 => BinarySubtype::BinaryOld,
            0x03 => BinarySubtype::UuidOld,
            0x04 => BinarySubtype::Uuid,
            0x05 => BinarySubtype::Md5,
            0x06 => BinarySubtype::Encrypted,
            other => BinarySubtype::UserDefined(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trips() {
        for tag in [
            0x01u8, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0D, 0x0E, 0x0F,
            0x10, 0x11, 0x12, 0x13, 0xFF, 0x7F,
        ] {
            let ty = ElementType::from_tag(tag).unwrap();
            assert_eq!(ty.tag(), tag);
        }
    }

    #[test]
    fn unknown_tag_is_none() {
        assert!(ElementType::from_tag(0xAB).is_none());
    }

    #[test]
    fn binary_subtype_round_trips() {
        for subtype in [
            BinarySubtype::Generic,
            BinarySubtype::Function,
            BinarySubtype::BinaryOld,
            BinarySubtype::UuidOld,
            BinarySubtype::Uuid,
            BinarySubtype::Md5,
            BinarySubtype::Encrypted,
            BinarySubtype::UserDefined(0x80),
        ] {
            let byte: u8 = subtype.into();
            assert_eq!(BinarySubtype::from(byte), subtype);
        }
    }
}
