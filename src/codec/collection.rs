//! [`Handler`] implementations for the container shapes built on top of a
//! primitive or derived element handler: optional values, sequences, sets,
//! and string-keyed maps.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use indexmap::IndexMap;

use crate::{
    bson::Bson,
    codec::{Handler, Reader, SafeWriter, Writer},
    document::Document,
    error::{Error, Result},
};

/// Decodes an optional value: `Bson::Null` and a missing key both decode to
/// `None` at the document-accessor level; here, `Null` decodes to `None` and
/// anything else is delegated to the inner reader.
#[derive(Clone, Copy, Debug)]
pub struct OptionReader<R> {
    inner: R,
}

impl<R> OptionReader<R> {
    /// Wraps `inner` so that `Bson::Null` decodes as `None`.
    pub fn new(inner: R) -> Self {
        OptionReader { inner }
    }
}

impl<T, R: Reader<T>> Reader<Option<T>> for OptionReader<R> {
    fn read_try(&self, value: &Bson) -> Result<Option<T>> {
        if value.is_null() {
            Ok(None)
        } else {
            self.inner.read_try(value).map(Some)
        }
    }
}

/// Encodes `None` as `Bson::Null`, matching [`OptionReader`]'s symmetry.
#[derive(Clone, Copy, Debug)]
pub struct OptionWriter<W> {
    inner: W,
}

impl<W> OptionWriter<W> {
    /// Wraps `inner` so that `None` encodes as `Bson::Null`.
    pub fn new(inner: W) -> Self {
        OptionWriter { inner }
    }
}

impl<T, W: Writer<T>> Writer<Option<T>> for OptionWriter<W> {
    fn write_try(&self, value: &Option<T>) -> Result<Bson> {
        match value {
            Some(v) => self.inner.write_try(v),
            None => Ok(Bson::Null),
        }
    }
}

impl<T, W: SafeWriter<T>> SafeWriter<Option<T>> for OptionWriter<W> {
    fn safe_write(&self, value: &Option<T>) -> Bson {
        match value {
            Some(v) => self.inner.safe_write(v),
            None => Bson::Null,
        }
    }
}

/// Builds a combined reader/writer for `Option<T>` out of a handler for `T`.
#[derive(Clone, Copy, Debug)]
pub struct OptionHandler<H> {
    inner: H,
}

impl<H> OptionHandler<H> {
    /// Wraps a handler for `T` as a handler for `Option<T>`.
    pub fn new(inner: H) -> Self {
        OptionHandler { inner }
    }
}

impl<T, H: Handler<T>> Reader<Option<T>> for OptionHandler<H> {
    fn read_try(&self, value: &Bson) -> Result<Option<T>> {
        if value.is_null() {
            Ok(None)
        } else {
            self.inner.read_try(value).map(Some)
        }
    }
}

impl<T, H: Handler<T>> Writer<Option<T>> for OptionHandler<H> {
    fn write_try(&self, value: &Option<T>) -> Result<Bson> {
        match value {
            Some(v) => self.inner.write_try(v),
            None => Ok(Bson::Null),
        }
    }
}

/// Decodes a [`Bson::Array`] into a `Vec<T>` using an element handler,
/// failing on the first element that the inner reader rejects.
#[derive(Clone, Copy, Debug)]
pub struct VecHandler<H> {
    element: H,
}

impl<H> VecHandler<H> {
    /// Builds a `Vec<T>` handler from an element handler for `T`.
    pub fn new(element: H) -> Self {
        VecHandler { element }
    }
}

impl<T, H: Reader<T>> Reader<Vec<T>> for VecHandler<H> {
    fn read_try(&self, value: &Bson) -> Result<Vec<T>> {
        match value {
            Bson::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.element.read_try(item).map_err(|e| e.with_index(i)))
                .collect(),
            other => Err(Error::type_mismatch("array", other.type_name())),
        }
    }
}

impl<T, H: Writer<T>> Writer<Vec<T>> for VecHandler<H> {
    fn write_try(&self, value: &Vec<T>) -> Result<Bson> {
        let items = value
            .iter()
            .map(|item| self.element.write_try(item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Bson::Array(items))
    }
}

impl<T, H: SafeWriter<T>> SafeWriter<Vec<T>> for VecHandler<H> {
    fn safe_write(&self, value: &Vec<T>) -> Bson {
        Bson::Array(value.iter().map(|item| self.element.safe_write(item)).collect())
    }
}

/// Decodes a [`Bson::Array`] into an unordered [`HashSet`].
#[derive(Clone, Copy, Debug)]
pub struct HashSetHandler<H> {
    element: H,
}

impl<H> HashSetHandler<H> {
    /// Builds a `HashSet<T>` handler from an element handler for `T`.
    pub fn new(element: H) -> Self {
        HashSetHandler { element }
    }
}

impl<T, H> Reader<HashSet<T>> for HashSetHandler<H>
where
    T: Eq + Hash,
    H: Reader<T>,
{
    fn read_try(&self, value: &Bson) -> Result<HashSet<T>> {
        VecHandler::new(&self.element)
            .read_try(value)
            .map(|v| v.into_iter().collect())
    }
}

impl<T, H> Writer<HashSet<T>> for HashSetHandler<H>
where
    H: Writer<T>,
{
    fn write_try(&self, value: &HashSet<T>) -> Result<Bson> {
        let items = value
            .iter()
            .map(|item| self.element.write_try(item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Bson::Array(items))
    }
}

/// Decodes a [`Bson::Array`] into a [`BTreeSet`], imposing a canonical order
/// on write via `T`'s `Ord` impl.
#[derive(Clone, Copy, Debug)]
pub struct BTreeSetHandler<H> {
    element: H,
}

impl<H> BTreeSetHandler<H> {
    /// Builds a `BTreeSet<T>` handler from an element handler for `T`.
    pub fn new(element: H) -> Self {
        BTreeSetHandler { element }
    }
}

impl<T, H> Reader<BTreeSet<T>> for BTreeSetHandler<H>
where
    T: Ord,
    H: Reader<T>,
{
    fn read_try(&self, value: &Bson) -> Result<BTreeSet<T>> {
        VecHandler::new(&self.element)
            .read_try(value)
            .map(|v| v.into_iter().collect())
    }
}

impl<T, H> Writer<BTreeSet<T>> for BTreeSetHandler<H>
where
    H: Writer<T>,
{
    fn write_try(&self, value: &BTreeSet<T>) -> Result<Bson> {
        let items = value
            .iter()
            .map(|item| self.element.write_try(item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Bson::Array(items))
    }
}

impl<R: Reader<T>, T> Reader<T> for &R {
    fn read_try(&self, value: &Bson) -> Result<T> {
        (**self).read_try(value)
    }
}

impl<W: Writer<T>, T> Writer<T> for &W {
    fn write_try(&self, value: &T) -> Result<Bson> {
        (**self).write_try(value)
    }
}

/// Decodes a [`Bson::Document`] into a string-keyed [`IndexMap`], preserving
/// element order. The element handler is applied to every value.
#[derive(Clone, Copy, Debug)]
pub struct IndexMapHandler<H> {
    value: H,
}

impl<H> IndexMapHandler<H> {
    /// Builds a string-keyed map handler from a value handler for `T`.
    pub fn new(value: H) -> Self {
        IndexMapHandler { value }
    }
}

impl<T, H: Reader<T>> Reader<IndexMap<String, T>> for IndexMapHandler<H> {
    fn read_try(&self, value: &Bson) -> Result<IndexMap<String, T>> {
        let doc = crate::codec::expect_document(value)?;
        doc.elements()
            .iter()
            .map(|element| {
                self.value
                    .read_try(&element.value)
                    .map(|decoded| (element.name.clone(), decoded))
                    .map_err(|e| e.with_key(element.name.clone()))
            })
            .collect()
    }
}

impl<T, H: Writer<T>> Writer<IndexMap<String, T>> for IndexMapHandler<H> {
    fn write_try(&self, value: &IndexMap<String, T>) -> Result<Bson> {
        let mut doc = Document::new();
        for (key, v) in value {
            doc = doc.append(key.clone(), self.value.write_try(v)?);
        }
        Ok(Bson::Document(doc))
    }
}

impl<T, H: SafeWriter<T>> SafeWriter<IndexMap<String, T>> for IndexMapHandler<H> {
    fn safe_write(&self, value: &IndexMap<String, T>) -> Bson {
        let mut doc = Document::new();
        for (key, v) in value {
            doc = doc.append(key.clone(), self.value.safe_write(v));
        }
        Bson::Document(doc)
    }
}

/// Decodes a [`Bson::Document`] into a [`HashMap`], discarding key order.
#[derive(Clone, Copy, Debug)]
pub struct HashMapHandler<H> {
    value: H,
}

impl<H> HashMapHandler<H> {
    /// Builds a string-keyed map handler from a value handler for `T`.
    pub fn new(value: H) -> Self {
        HashMapHandler { value }
    }
}

impl<T, H: Reader<T>> Reader<HashMap<String, T>> for HashMapHandler<H> {
    fn read_try(&self, value: &Bson) -> Result<HashMap<String, T>> {
        IndexMapHandler::new(&self.value)
            .read_try(value)
            .map(|m| m.into_iter().collect())
    }
}

impl<T, H: Writer<T>> Writer<HashMap<String, T>> for HashMapHandler<H> {
    fn write_try(&self, value: &HashMap<String, T>) -> Result<Bson> {
        let mut doc = Document::new();
        for (key, v) in value {
            doc = doc.append(key.clone(), self.value.write_try(v)?);
        }
        Ok(Bson::Document(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::primitive::Int32Handler;

    #[test]
    fn option_reader_treats_null_as_none() {
        let handler = OptionHandler::new(Int32Handler);
        let none: Option<i32> = handler.read_try(&Bson::Null).unwrap();
        assert_eq!(none, None);
        assert_eq!(handler.read_try(&Bson::Int32(4)).unwrap(), Some(4));
    }

    #[test]
    fn option_writer_encodes_none_as_null() {
        let handler = OptionHandler::new(Int32Handler);
        let none: Option<i32> = None;
        assert_eq!(handler.write_try(&none).unwrap(), Bson::Null);
        assert_eq!(handler.write_try(&Some(4)).unwrap(), Bson::Int32(4));
    }

    #[test]
    fn vec_handler_round_trips_and_reports_index() {
        let handler = VecHandler::new(Int32Handler);
        let values: Vec<i32> = vec![1, 2, 3];
        let encoded = handler.write_try(&values).unwrap();
        assert_eq!(handler.read_try(&encoded).unwrap(), values);

        let bad = Bson::Array(vec![Bson::Int32(1), Bson::String("x".into())]);
        let err: Error = handler.read_try(&bad).unwrap_err();
        assert_eq!(err.index, Some(1));
    }

    #[test]
    fn vec_handler_rejects_non_array() {
        let handler = VecHandler::new(Int32Handler);
        let result: Result<Vec<i32>> = handler.read_try(&Bson::Int32(1));
        assert!(result.is_err());
    }

    #[test]
    fn index_map_handler_round_trips_preserving_order() {
        let handler = IndexMapHandler::new(Int32Handler);
        let mut map: IndexMap<String, i32> = IndexMap::new();
        map.insert("b".to_owned(), 2);
        map.insert("a".to_owned(), 1);
        let encoded = handler.write_try(&map).unwrap();
        let decoded: IndexMap<String, i32> = handler.read_try(&encoded).unwrap();
        assert_eq!(decoded.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn hash_set_handler_round_trips() {
        let handler = HashSetHandler::new(Int32Handler);
        let mut set = HashSet::new();
        set.insert(1);
        set.insert(2);
        let encoded = handler.write_try(&set).unwrap();
        assert_eq!(handler.read_try(&encoded).unwrap(), set);
    }
}
