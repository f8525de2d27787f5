//! Record (product-type) handler derivation.
//!
//! A record handler is assembled from one [`DocumentReader`]/[`DocumentWriter`]
//! pair per field — built with [`keyed_field`]/[`keyed_field_writer`],
//! [`flattened_field`]/[`flattened_field_writer`], or
//! [`ignored_field`]/[`ignored_field_writer`] — combined into a tuple and
//! finished with [`build_reader`]/[`build_writer`]. Tuples up to arity 8
//! implement [`DocumentReader`]/[`DocumentWriter`] directly, so no procedural
//! macro is needed to assemble a record from its fields.

use std::marker::PhantomData;

use crate::{
    bson::Bson,
    codec::{DocumentReader, DocumentWriter, Reader, Writer},
    document::Document,
    error::{Error, Result},
};

/// Reads one keyed, non-flattened field out of a document.
pub struct KeyedField<T, R> {
    key: String,
    reader: R,
    _marker: PhantomData<T>,
}

impl<T, R: Reader<T>> DocumentReader<T> for KeyedField<T, R> {
    fn read_document(&self, doc: &Document) -> Result<T> {
        let raw = doc
            .get(&self.key)
            .ok_or_else(Error::value_not_found)
            .map_err(|e| e.with_key(self.key.clone()))?;
        self.reader.read_try(raw).map_err(|e| e.with_key(self.key.clone()))
    }
}

/// Builds a [`DocumentReader`] for one field, stored under `key` and decoded
/// with `reader`.
pub fn keyed_field<T, R: Reader<T>>(key: impl Into<String>, reader: R) -> KeyedField<T, R> {
    KeyedField {
        key: key.into(),
        reader,
        _marker: PhantomData,
    }
}

/// Reads a field whose own representation is a sub-document merged directly
/// into the parent, per the record's `@Flatten` support.
pub struct FlattenedField<T, D> {
    reader: D,
    _marker: PhantomData<T>,
}

impl<T, D: DocumentReader<T>> DocumentReader<T> for FlattenedField<T, D> {
    fn read_document(&self, doc: &Document) -> Result<T> {
        self.reader.read_document(doc)
    }
}

/// Builds a [`DocumentReader`] for a flattened field: `reader` reads directly
/// off the parent document rather than a nested key.
pub fn flattened_field<T, D: DocumentReader<T>>(reader: D) -> FlattenedField<T, D> {
    FlattenedField {
        reader,
        _marker: PhantomData,
    }
}

/// Reads an optional, keyed field: an absent key or a `Bson::Null` decode to
/// `None`; any other present value is decoded with `reader` and wrapped in
/// `Some`.
pub struct OptionalKeyedField<T, R> {
    key: String,
    reader: R,
    _marker: PhantomData<T>,
}

impl<T, R: Reader<T>> DocumentReader<Option<T>> for OptionalKeyedField<T, R> {
    fn read_document(&self, doc: &Document) -> Result<Option<T>> {
        match doc.get(&self.key) {
            None | Some(Bson::Null) => Ok(None),
            Some(raw) => self
                .reader
                .read_try(raw)
                .map(Some)
                .map_err(|e| e.with_key(self.key.clone())),
        }
    }
}

/// Builds a [`DocumentReader`] for an optional field stored under `key`.
pub fn optional_field<T, R: Reader<T>>(key: impl Into<String>, reader: R) -> OptionalKeyedField<T, R> {
    OptionalKeyedField {
        key: key.into(),
        reader,
        _marker: PhantomData,
    }
}

/// Writes an optional, keyed field, extracting `Option<U>` from `&T` with
/// `get`. The default policy omits the key entirely on `None`; when built
/// with `none_as_null: true` (the `@NoneAsNull` configuration) it emits an
/// explicit `Bson::Null` instead.
pub struct OptionalKeyedFieldWriter<T, U, W, G> {
    key: String,
    writer: W,
    get: G,
    none_as_null: bool,
    _marker: PhantomData<(T, U)>,
}

impl<T, U, W: Writer<U>, G: Fn(&T) -> Option<U>> DocumentWriter<T> for OptionalKeyedFieldWriter<T, U, W, G> {
    fn write_document(&self, value: &T) -> Result<Document> {
        match (self.get)(value) {
            Some(field_value) => {
                let encoded = self
                    .writer
                    .write_try(&field_value)
                    .map_err(|e| e.with_key(self.key.clone()))?;
                Ok(Document::new().append(self.key.clone(), encoded))
            }
            None if self.none_as_null => Ok(Document::new().append(self.key.clone(), Bson::Null)),
            None => Ok(Document::new()),
        }
    }
}

/// Builds a [`DocumentWriter`] for an optional field: `none_as_null` selects
/// between key omission (the default policy) and an explicit `Bson::Null`.
pub fn optional_field_writer<T, U, W: Writer<U>>(
    key: impl Into<String>,
    writer: W,
    get: impl Fn(&T) -> Option<U>,
    none_as_null: bool,
) -> OptionalKeyedFieldWriter<T, U, W, impl Fn(&T) -> Option<U>> {
    OptionalKeyedFieldWriter {
        key: key.into(),
        writer,
        get,
        none_as_null,
        _marker: PhantomData,
    }
}

/// A field that is never read from the wire: every decode produces a clone
/// of `default`, per the record's `@Ignore` support.
pub struct IgnoredField<T> {
    default: T,
}

impl<T: Clone> DocumentReader<T> for IgnoredField<T> {
    fn read_document(&self, _doc: &Document) -> Result<T> {
        Ok(self.default.clone())
    }
}

/// Builds a [`DocumentReader`] for an ignored field: `default` is returned
/// unconditionally.
pub fn ignored_field<T: Clone>(default: T) -> IgnoredField<T> {
    IgnoredField { default }
}

/// Writes one keyed, non-flattened field, extracting its value from `&T`
/// with `get`.
pub struct KeyedFieldWriter<T, U, W, G> {
    key: String,
    writer: W,
    get: G,
    _marker: PhantomData<(T, U)>,
}

impl<T, U, W: Writer<U>, G: Fn(&T) -> U> DocumentWriter<T> for KeyedFieldWriter<T, U, W, G> {
    fn write_document(&self, value: &T) -> Result<Document> {
        let field_value = (self.get)(value);
        let encoded = self
            .writer
            .write_try(&field_value)
            .map_err(|e| e.with_key(self.key.clone()))?;
        Ok(Document::new().append(self.key.clone(), encoded))
    }
}

/// Builds a [`DocumentWriter`] for one field: extracted from `&T` with `get`,
/// encoded with `writer`, stored under `key`.
pub fn keyed_field_writer<T, U, W: Writer<U>>(
    key: impl Into<String>,
    writer: W,
    get: impl Fn(&T) -> U,
) -> KeyedFieldWriter<T, U, W, impl Fn(&T) -> U> {
    KeyedFieldWriter {
        key: key.into(),
        writer,
        get,
        _marker: PhantomData,
    }
}

/// Writes a flattened field's sub-document directly into the parent.
pub struct FlattenedFieldWriter<T, U, D, G> {
    writer: D,
    get: G,
    _marker: PhantomData<(T, U)>,
}

impl<T, U, D: DocumentWriter<U>, G: Fn(&T) -> U> DocumentWriter<T>
    for FlattenedFieldWriter<T, U, D, G>
{
    fn write_document(&self, value: &T) -> Result<Document> {
        self.writer.write_document(&(self.get)(value))
    }
}

/// Builds a [`DocumentWriter`] for a flattened field.
pub fn flattened_field_writer<T, U, D: DocumentWriter<U>>(
    writer: D,
    get: impl Fn(&T) -> U,
) -> FlattenedFieldWriter<T, U, D, impl Fn(&T) -> U> {
    FlattenedFieldWriter {
        writer,
        get,
        _marker: PhantomData,
    }
}

/// Writes nothing: the dual of [`ignored_field`].
pub struct IgnoredFieldWriter<T> {
    _marker: PhantomData<T>,
}

impl<T> DocumentWriter<T> for IgnoredFieldWriter<T> {
    fn write_document(&self, _value: &T) -> Result<Document> {
        Ok(Document::new())
    }
}

/// Builds a [`DocumentWriter`] for an ignored field: it contributes no
/// elements to the encoded document.
pub fn ignored_field_writer<T>() -> IgnoredFieldWriter<T> {
    IgnoredFieldWriter {
        _marker: PhantomData,
    }
}

/// Finishes a tuple of per-field [`DocumentReader`]s into a
/// [`DocumentReader`] for the assembled record type `U`, via a constructor
/// `ctor`.
pub struct RecordReader<D, F> {
    fields: D,
    ctor: F,
}

impl<T, U, D: DocumentReader<T>, F: Fn(T) -> U> DocumentReader<U> for RecordReader<D, F> {
    fn read_document(&self, doc: &Document) -> Result<U> {
        self.fields.read_document(doc).map(&self.ctor)
    }
}

/// Builds a record reader from a tuple of field readers and a constructor
/// that assembles the decoded tuple into the target type.
pub fn build_reader<T, U, D: DocumentReader<T>, F: Fn(T) -> U>(
    fields: D,
    ctor: F,
) -> RecordReader<D, F> {
    RecordReader { fields, ctor }
}

/// Finishes a tuple of per-field [`DocumentWriter`]s into a single
/// [`DocumentWriter`], concatenating every field's contribution.
pub struct RecordWriter<D> {
    fields: D,
}

impl<T, D: DocumentWriter<T>> DocumentWriter<T> for RecordWriter<D> {
    fn write_document(&self, value: &T) -> Result<Document> {
        self.fields.write_document(value)
    }
}

/// Builds a record writer from a tuple of field writers.
pub fn build_writer<T, D: DocumentWriter<T>>(fields: D) -> RecordWriter<D> {
    RecordWriter { fields }
}

macro_rules! impl_tuple_document_reader {
    ($($T:ident : $R:ident : $idx:tt),+) => {
        impl<$($T, $R: DocumentReader<$T>),+> DocumentReader<($($T,)+)> for ($($R,)+) {
            fn read_document(&self, doc: &Document) -> Result<($($T,)+)> {
                Ok(($(self.$idx.read_document(doc)?,)+))
            }
        }
    };
}

macro_rules! impl_tuple_document_writer {
    ($($R:ident : $idx:tt),+) => {
        impl<T, $($R: DocumentWriter<T>),+> DocumentWriter<T> for ($($R,)+) {
            fn write_document(&self, value: &T) -> Result<Document> {
                let mut doc = Document::new();
                $(doc = doc.concat(&self.$idx.write_document(value)?);)+
                Ok(doc)
            }
        }
    };
}

impl_tuple_document_reader!(T0: R0: 0);
impl_tuple_document_reader!(T0: R0: 0, T1: R1: 1);
impl_tuple_document_reader!(T0: R0: 0, T1: R1: 1, T2: R2: 2);
impl_tuple_document_reader!(T0: R0: 0, T1: R1: 1, T2: R2: 2, T3: R3: 3);
impl_tuple_document_reader!(T0: R0: 0, T1: R1: 1, T2: R2: 2, T3: R3: 3, T4: R4: 4);
impl_tuple_document_reader!(T0: R0: 0, T1: R1: 1, T2: R2: 2, T3: R3: 3, T4: R4: 4, T5: R5: 5);
impl_tuple_document_reader!(T0: R0: 0, T1: R1: 1, T2: R2: 2, T3: R3: 3, T4: R4: 4, T5: R5: 5, T6: R6: 6);
impl_tuple_document_reader!(T0: R0: 0, T1: R1: 1, T2: R2: 2, T3: R3: 3, T4: R4: 4, T5: R5: 5, T6: R6: 6, T7: R7: 7);

impl_tuple_document_writer!(R0: 0);
impl_tuple_document_writer!(R0: 0, R1: 1);
impl_tuple_document_writer!(R0: 0, R1: 1, R2: 2);
impl_tuple_document_writer!(R0: 0, R1: 1, R2: 2, R3: 3);
impl_tuple_document_writer!(R0: 0, R1: 1, R2: 2, R3: 3, R4: 4);
impl_tuple_document_writer!(R0: 0, R1: 1, R2: 2, R3: 3, R4: 4, R5: 5);
impl_tuple_document_writer!(R0: 0, R1: 1, R2: 2, R3: 3, R4: 4, R5: 5, R6: 6);
impl_tuple_document_writer!(R0: 0, R1: 1, R2: 2, R3: 3, R4: 4, R5: 5, R6: 6, R7: 7);
