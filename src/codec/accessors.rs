//! Typed accessors on [`Document`] and on `[Bson]` arrays, built generically
//! over any [`Reader`].

use crate::{
    bson::Bson,
    codec::Reader,
    document::Document,
    error::{Error, Result},
};

/// A keyed collection that can be probed with a [`Reader`] at a given key.
///
/// Implemented for [`Document`] (keyed by `&str`) and `[Bson]` (keyed by
/// `usize`), giving both the same typed-access vocabulary.
pub trait TypedAccess<K> {
    /// Looks up the raw value at `key`, if present.
    fn raw_get(&self, key: K) -> Option<&Bson>;

    /// Decodes the value at `key` with `reader`, returning `None` if the key
    /// is absent or the reader rejects it.
    fn get_as_opt<T, R: Reader<T>>(&self, key: K, reader: &R) -> Option<T>
    where
        K: Copy,
    {
        self.raw_get(key).and_then(|v| reader.read_opt(v))
    }

    /// Decodes the value at `key` with `reader`, failing with
    /// [`crate::error::ErrorKind::ValueNotFound`] if the key is absent or the
    /// value is `Bson::Null`; a reader failure on a present, non-null value
    /// propagates as-is.
    fn get_as_try<T, R: Reader<T>>(&self, key: K, reader: &R) -> Result<T>
    where
        K: Copy + KeyContext,
    {
        match self.raw_get(key) {
            None | Some(Bson::Null) => Err(key.annotate(Error::value_not_found())),
            Some(raw) => reader.read_try(raw).map_err(|e| key.annotate(e)),
        }
    }

    /// Decodes the value at `key`: `Ok(None)` if the key is absent or the
    /// value is `Bson::Null`, `Ok(Some(v))` on a successful read; a reader
    /// failure on a present, non-null value propagates.
    fn get_as_unflattened_try<T, R: Reader<T>>(&self, key: K, reader: &R) -> Result<Option<T>>
    where
        K: Copy + KeyContext,
    {
        match self.raw_get(key) {
            None | Some(Bson::Null) => Ok(None),
            Some(raw) => reader.read_try(raw).map(Some).map_err(|e| key.annotate(e)),
        }
    }

    /// Decodes the value at `key`, substituting `default` if the key is
    /// absent or decoding fails.
    fn get_or_else<T, R: Reader<T>>(&self, key: K, reader: &R, default: T) -> T
    where
        K: Copy,
    {
        self.get_as_opt(key, reader).unwrap_or(default)
    }
}

/// Attaches a [`TypedAccess`] key as positional context on an error.
pub trait KeyContext {
    /// Annotates `error` with this key's position, unless context is already
    /// present.
    fn annotate(self, error: Error) -> Error;
}

impl KeyContext for &str {
    fn annotate(self, error: Error) -> Error {
        error.with_key(self.to_owned())
    }
}

impl KeyContext for usize {
    fn annotate(self, error: Error) -> Error {
        error.with_index(self)
    }
}

impl<'k> TypedAccess<&'k str> for Document {
    fn raw_get(&self, key: &'k str) -> Option<&Bson> {
        Document::get(self, key)
    }
}

impl TypedAccess<usize> for [Bson] {
    fn raw_get(&self, key: usize) -> Option<&Bson> {
        self.get(key)
    }
}

impl TypedAccess<usize> for Vec<Bson> {
    fn raw_get(&self, key: usize) -> Option<&Bson> {
        self.as_slice().get(key)
    }
}

/// Decodes a document field that was stored flattened: rather than living at
/// a single key, its components are read directly off `doc` by `reader`, a
/// [`crate::codec::DocumentReader`]. This is the read-side counterpart to the
/// derivation layer's `@Flatten` support for types without their own nested
/// document.
pub fn read_flattened_try<T, R: crate::codec::DocumentReader<T>>(
    doc: &Document,
    reader: &R,
) -> Result<T> {
    reader.read_document(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::primitive::{Int32Handler, StringHandler};

    #[test]
    fn get_as_opt_returns_none_for_missing_key() {
        let doc = Document::new().append("a", 1i32);
        assert_eq!(doc.get_as_opt::<i32, _>("missing", &Int32Handler), None);
        assert_eq!(doc.get_as_opt::<i32, _>("a", &Int32Handler), Some(1));
    }

    #[test]
    fn get_as_try_fails_with_key_context_on_missing_key() {
        let doc = Document::new();
        let err: Error = doc.get_as_try::<i32, _>("missing", &Int32Handler).unwrap_err();
        assert_eq!(err.key.as_deref(), Some("missing"));
    }

    #[test]
    fn get_as_try_fails_with_key_context_on_type_mismatch() {
        let doc = Document::new().append("a", "not an int");
        let err: Error = doc.get_as_try::<i32, _>("a", &Int32Handler).unwrap_err();
        assert_eq!(err.key.as_deref(), Some("a"));
    }

    #[test]
    fn get_as_try_treats_null_as_value_not_found() {
        let doc = Document::new().append("a", Bson::Null);
        let err: Error = doc.get_as_try::<i32, _>("a", &Int32Handler).unwrap_err();
        assert_eq!(err.key.as_deref(), Some("a"));
        assert!(matches!(err.kind, crate::error::ErrorKind::ValueNotFound {}));
    }

    #[test]
    fn get_as_unflattened_try_maps_absent_and_null_to_none() {
        let doc = Document::new().append("a", Bson::Null);
        assert_eq!(doc.get_as_unflattened_try::<i32, _>("missing", &Int32Handler).unwrap(), None);
        assert_eq!(doc.get_as_unflattened_try::<i32, _>("a", &Int32Handler).unwrap(), None);
    }

    #[test]
    fn get_as_unflattened_try_propagates_reader_failure_on_present_value() {
        let doc = Document::new().append("a", "not an int");
        let err: Error = doc.get_as_unflattened_try::<i32, _>("a", &Int32Handler).unwrap_err();
        assert_eq!(err.key.as_deref(), Some("a"));
    }

    #[test]
    fn get_as_unflattened_try_decodes_present_value() {
        let doc = Document::new().append("a", 1i32);
        assert_eq!(doc.get_as_unflattened_try::<i32, _>("a", &Int32Handler).unwrap(), Some(1));
    }

    #[test]
    fn get_or_else_falls_back_on_missing_key() {
        let doc = Document::new();
        assert_eq!(doc.get_or_else("missing", &StringHandler, "fallback".to_owned()), "fallback");
    }

    #[test]
    fn array_accessor_indexes_by_position() {
        let arr: Vec<Bson> = vec![Bson::Int32(10), Bson::Int32(20)];
        let slice: &[Bson] = arr.as_slice();
        assert_eq!(slice.get_as_opt::<i32, _>(1, &Int32Handler), Some(20));
        let err: Error = slice.get_as_try::<i32, _>(5, &Int32Handler).unwrap_err();
        assert_eq!(err.index, Some(5));
    }
}
