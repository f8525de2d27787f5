//! The [`Bson`] value type: the tagged union of every BSON value variant.

use std::fmt;

use crate::{
    binary::Binary,
    datetime::DateTime,
    decimal128::Decimal128,
    document::Document,
    oid::ObjectId,
    spec::ElementType,
    timestamp::Timestamp,
};

/// An ordered sequence of [`Bson`] values, encoded on the wire as a document
/// whose keys are the stringified decimal indices `"0"`, `"1"`, ...
pub type Array = Vec<Bson>;

/// A regular expression value: a pattern and a flags string, each encoded as
/// a BSON cstring (no length prefix).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Regex {
    /// The regex pattern.
    pub pattern: String,
    /// The regex flags, conventionally kept sorted alphabetically.
    pub options: String,
}

impl Regex {
    /// Constructs a new `Regex` value.
    pub fn new(pattern: impl Into<String>, options: impl Into<String>) -> Self {
        Regex {
            pattern: pattern.into(),
            options: options.into(),
        }
    }
}

/// JavaScript source code paired with a captured variable scope.
#[derive(Clone, PartialEq, Debug)]
pub struct JavaScriptCodeWithScope {
    /// The JavaScript source text.
    pub code: String,
    /// The variable bindings captured alongside the code.
    pub scope: Document,
}

/// Possible BSON value types.
///
/// Every variant is immutable once constructed; `Document`- and `Array`-typed
/// payloads are themselves immutable, so all mutating operations on them
/// return a new value rather than mutating in place.
#[derive(Clone, PartialEq, Debug)]
#[non_exhaustive]
pub enum Bson {
    /// A 64-bit floating point value.
    Double(f64),
    /// A UTF-8 string.
    String(String),
    /// An embedded document.
    Document(Document),
    /// An ordered array of values.
    Array(Array),
    /// Binary data.
    Binary(Binary),
    /// The deprecated `undefined` value.
    Undefined,
    /// A 12-byte ObjectId.
    ObjectId(ObjectId),
    /// A boolean.
    Boolean(bool),
    /// A UTC datetime, in milliseconds since the Unix epoch.
    DateTime(DateTime),
    /// The null value.
    Null,
    /// A regular expression.
    RegularExpression(Regex),
    /// JavaScript source code without an associated scope.
    JavaScriptCode(String),
    /// The deprecated `Symbol` type.
    Symbol(String),
    /// JavaScript source code with an associated scope document.
    JavaScriptCodeWithScope(JavaScriptCodeWithScope),
    /// A signed 32-bit integer.
    Int32(i32),
    /// An internal replication timestamp.
    Timestamp(Timestamp),
    /// A signed 64-bit integer.
    Int64(i64),
    /// A 128-bit IEEE-754 decimal floating point value.
    Decimal128(Decimal128),
    /// The minimum BSON value, always sorts lowest.
    MinKey,
    /// The maximum BSON value, always sorts highest.
    MaxKey,
}

impl Bson {
    /// The BSON type tag for this value.
    pub fn element_type(&self) -> ElementType {
        match self {
            Bson::Double(..) => ElementType::Double,
            Bson::String(..) => ElementType::String,
            Bson::Document(..) => ElementType::Document,
            Bson::Array(..) => ElementType::Array,
            Bson::Binary(..) => ElementType::Binary,
            Bson::Undefined => ElementType::Undefined,
            Bson::ObjectId(..) => ElementType::ObjectId,
            Bson::Boolean(..) => ElementType::Boolean,
            Bson::DateTime(..) => ElementType::DateTime,
            Bson::Null => ElementType::Null,
            Bson::RegularExpression(..) => ElementType::RegularExpression,
            Bson::JavaScriptCode(..) => ElementType::JavaScriptCode,
            Bson::Symbol(..) => ElementType::Symbol,
            Bson::JavaScriptCodeWithScope(..) => ElementType::JavaScriptCodeWithScope,
            Bson::Int32(..) => ElementType::Int32,
            Bson::Timestamp(..) => ElementType::Timestamp,
            Bson::Int64(..) => ElementType::Int64,
            Bson::Decimal128(..) => ElementType::Decimal128,
            Bson::MinKey => ElementType::MinKey,
            Bson::MaxKey => ElementType::MaxKey,
        }
    }

    /// A short name for this value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        self.element_type().name()
    }

    /// The number of bytes this value would occupy when serialized, matching
    /// what a standard BSON wire serializer would emit for it (as an element
    /// payload; a top-level type tag and name are not included).
    pub fn byte_size(&self) -> i32 {
        match self {
            Bson::Double(_) => 8,
            Bson::String(s) => string_byte_size(s),
            Bson::Document(doc) => doc.byte_size(),
            Bson::Array(arr) => array_byte_size(arr),
            Bson::Binary(bin) => bin.byte_size(),
            Bson::Undefined => 0,
            Bson::ObjectId(_) => 12,
            Bson::Boolean(_) => 1,
            Bson::DateTime(_) => 8,
            Bson::Null => 0,
            Bson::RegularExpression(re) => cstring_len(&re.pattern) + cstring_len(&re.options),
            Bson::JavaScriptCode(s) => string_byte_size(s),
            Bson::Symbol(s) => string_byte_size(s),
            Bson::JavaScriptCodeWithScope(js) => {
                4 + string_byte_size(&js.code) + js.scope.byte_size()
            }
            Bson::Int32(_) => 4,
            Bson::Timestamp(_) => 8,
            Bson::Int64(_) => 8,
            Bson::Decimal128(_) => 16,
            Bson::MinKey => 0,
            Bson::MaxKey => 0,
        }
    }

    /// `true` for [`Bson::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Bson::Null)
    }

    /// Renders this value using MongoDB-shell-like debug notation
    /// (`ObjectId('..')`, `NumberLong(..)`, `ISODate('..')`, single-quoted
    /// strings). This is a debug helper, not part of the byte contract.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        write_pretty(self, &mut out);
        out
    }
}

fn string_byte_size(s: &str) -> i32 {
    5 + s.len() as i32
}

fn cstring_len(s: &str) -> i32 {
    s.len() as i32 + 1
}

fn array_byte_size(arr: &[Bson]) -> i32 {
    let elements: i32 = arr
        .iter()
        .enumerate()
        .map(|(i, v)| 1 + cstring_len(&i.to_string()) + v.byte_size())
        .sum();
    5 + elements
}

fn escape_single_quotes(s: &str) -> String {
    s.replace('\'', "\\'")
}

fn write_pretty(bson: &Bson, out: &mut String) {
    use std::fmt::Write;
    match bson {
        Bson::Double(v) => {
            let _ = write!(out, "{v}");
        }
        Bson::String(s) => {
            let _ = write!(out, "'{}'", escape_single_quotes(s));
        }
        Bson::Document(doc) => out.push_str(&doc.pretty()),
        Bson::Array(arr) => {
            out.push('[');
            for (i, v) in arr.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_pretty(v, out);
            }
            out.push(']');
        }
        Bson::Binary(bin) => {
            let _ = write!(
                out,
                "BinData({}, '{}')",
                u8::from(bin.subtype),
                hex::encode(&bin.bytes)
            );
        }
        Bson::Undefined => out.push_str("undefined"),
        Bson::ObjectId(oid) => {
            let _ = write!(out, "ObjectId('{oid}')");
        }
        Bson::Boolean(b) => {
            let _ = write!(out, "{b}");
        }
        Bson::DateTime(dt) => {
            let _ = write!(out, "{dt}");
        }
        Bson::Null => out.push_str("null"),
        Bson::RegularExpression(re) => {
            let _ = write!(out, "/{}/{}", re.pattern, re.options);
        }
        Bson::JavaScriptCode(code) => {
            let _ = write!(out, "{code}");
        }
        Bson::Symbol(s) => {
            let _ = write!(out, "Symbol('{}')", escape_single_quotes(s));
        }
        Bson::JavaScriptCodeWithScope(js) => {
            let _ = write!(out, "{}", js.code);
        }
        Bson::Int32(v) => {
            let _ = write!(out, "{v}");
        }
        Bson::Timestamp(ts) => {
            let _ = write!(out, "{ts}");
        }
        Bson::Int64(v) => {
            let _ = write!(out, "NumberLong({v})");
        }
        Bson::Decimal128(d) => {
            let _ = write!(out, "NumberDecimal('{d}')");
        }
        Bson::MinKey => out.push_str("MinKey"),
        Bson::MaxKey => out.push_str("MaxKey"),
    }
}

impl fmt::Display for Bson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

macro_rules! impl_from_for_bson {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Bson {
            fn from(value: $ty) -> Self {
                Bson::$variant(value.into())
            }
        }
    };
}

impl_from_for_bson!(Double, f64);
impl_from_for_bson!(String, String);
impl_from_for_bson!(Document, Document);
impl_from_for_bson!(Array, Vec<Bson>);
impl_from_for_bson!(Binary, Binary);
impl_from_for_bson!(ObjectId, ObjectId);
impl_from_for_bson!(Boolean, bool);
impl_from_for_bson!(DateTime, DateTime);
impl_from_for_bson!(RegularExpression, Regex);
impl_from_for_bson!(Int32, i32);
impl_from_for_bson!(Timestamp, Timestamp);
impl_from_for_bson!(Int64, i64);
impl_from_for_bson!(Decimal128, Decimal128);

impl From<&str> for Bson {
    fn from(value: &str) -> Self {
        Bson::String(value.to_owned())
    }
}

impl<T: Into<Bson>> From<Option<T>> for Bson {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Bson::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_byte_sizes_match_table() {
        assert_eq!(Bson::Double(1.0).byte_size(), 8);
        assert_eq!(Bson::Boolean(true).byte_size(), 1);
        assert_eq!(Bson::Int32(1).byte_size(), 4);
        assert_eq!(Bson::Int64(1).byte_size(), 8);
        assert_eq!(Bson::Null.byte_size(), 0);
        assert_eq!(Bson::Undefined.byte_size(), 0);
        assert_eq!(Bson::MinKey.byte_size(), 0);
        assert_eq!(Bson::MaxKey.byte_size(), 0);
        assert_eq!(Bson::ObjectId(ObjectId::from_bytes([0; 12])).byte_size(), 12);
        assert_eq!(Bson::Decimal128(Decimal128::ZERO).byte_size(), 16);
    }

    #[test]
    fn string_byte_size_is_len_plus_five() {
        assert_eq!(Bson::String("hai".to_owned()).byte_size(), 5 + 3);
        assert_eq!(Bson::String(String::new()).byte_size(), 5);
    }

    #[test]
    fn array_byte_size_accounts_for_index_names() {
        let arr = vec![Bson::Int32(1), Bson::Int32(2)];
        // 5 (len + trailing nul) + 2 * (1 tag + 2 cstring ("0"/"1") + 4 value)
        assert_eq!(Bson::Array(arr).byte_size(), 5 + 2 * (1 + 2 + 4));
    }

    #[test]
    fn regex_byte_size_is_two_cstrings() {
        let re = Regex::new("a", "i");
        assert_eq!(Bson::RegularExpression(re).byte_size(), 2 + 1 + 1);
    }

    #[test]
    fn pretty_print_escapes_single_quotes() {
        let s = Bson::String("it's".to_owned());
        assert_eq!(s.pretty(), "'it\\'s'");
    }

    #[test]
    fn pretty_print_renders_int64_as_number_long() {
        assert_eq!(Bson::Int64(42).pretty(), "NumberLong(42)");
    }
}
