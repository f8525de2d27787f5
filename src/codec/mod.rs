//! The generic codec layer: [`Reader`], [`Writer`], and [`Handler`] type
//! classes over [`Bson`] values, their document-specialized refinements, and
//! combinators for composing them.

pub mod accessors;
pub mod collection;
pub mod numeric;
pub mod primitive;

use std::marker::PhantomData;

use crate::{bson::Bson, document::Document, error::Result};

/// Decodes a `T` from a [`Bson`] value.
///
/// `read_opt` must agree with `read_try(..).ok()`; `read_or_else` must return
/// the supplied default on any failure rather than propagating it.
pub trait Reader<T> {
    /// Attempts to decode `value` as a `T`.
    fn read_try(&self, value: &Bson) -> Result<T>;

    /// Decodes `value`, discarding any error.
    fn read_opt(&self, value: &Bson) -> Option<T> {
        self.read_try(value).ok()
    }

    /// Decodes `value`, substituting `default` on any failure.
    fn read_or_else(&self, value: &Bson, default: T) -> T {
        self.read_try(value).unwrap_or(default)
    }

    /// Transforms a successfully-decoded value with `f`.
    fn map<U, F>(self, f: F) -> MapReader<Self, F>
    where
        Self: Sized,
        F: Fn(T) -> U,
    {
        MapReader { inner: self, f }
    }

    /// Runs `f` over a successfully-decoded value, allowing it to fail.
    fn after_read<U, F>(self, f: F) -> AfterReadReader<Self, F>
    where
        Self: Sized,
        F: Fn(T) -> Result<U>,
    {
        AfterReadReader { inner: self, f }
    }

    /// Like [`Reader::map`], but `f` may reject the value, failing the read
    /// with [`crate::error::ErrorKind::DecodeFailure`].
    fn collect<U, F>(self, f: F) -> CollectReader<Self, F>
    where
        Self: Sized,
        F: Fn(T) -> Option<U>,
    {
        CollectReader { inner: self, f }
    }

    /// Rewrites the raw [`Bson`] value before this reader sees it.
    fn before_read<F>(self, f: F) -> BeforeReadReader<Self, F>
    where
        Self: Sized,
        F: Fn(&Bson) -> Bson,
    {
        BeforeReadReader { inner: self, f }
    }

    /// Widens a `Reader<T>` into a `Reader<U>` when every `T` embeds into `U`.
    /// Used to fold a sum-type variant's reader into the reader for the whole
    /// sum type.
    fn widen<U>(self) -> WidenReader<Self, T>
    where
        Self: Sized,
        T: Into<U>,
    {
        WidenReader {
            inner: self,
            _marker: PhantomData,
        }
    }
}

/// Encodes a `T` into a [`Bson`] value.
///
/// `write_opt` must agree with `write_try(..).ok()`.
pub trait Writer<T> {
    /// Attempts to encode `value`.
    fn write_try(&self, value: &T) -> Result<Bson>;

    /// Encodes `value`, discarding any error.
    fn write_opt(&self, value: &T) -> Option<Bson> {
        self.write_try(value).ok()
    }

    /// Maps a `U` down to the `T` this writer knows how to encode.
    fn contramap<U, F>(self, f: F) -> ContramapWriter<Self, F>
    where
        Self: Sized,
        F: Fn(&U) -> T,
    {
        ContramapWriter { inner: self, f }
    }

    /// Like [`Writer::contramap`], but `f` may fail the write.
    fn before_write<U, F>(self, f: F) -> BeforeWriteWriter<Self, F>
    where
        Self: Sized,
        F: Fn(&U) -> Result<T>,
    {
        BeforeWriteWriter { inner: self, f }
    }

    /// Narrows a `Writer<T>` into a `Writer<U>` when every `U` embeds into
    /// `T`. The dual of [`Reader::widen`].
    fn narrow<U>(self) -> NarrowWriter<Self, T>
    where
        Self: Sized,
        U: Clone + Into<T>,
    {
        NarrowWriter {
            inner: self,
            _marker: PhantomData,
        }
    }

    /// Rewrites the produced [`Bson`] value after encoding.
    fn after_write<F>(self, f: F) -> AfterWriteWriter<Self, F>
    where
        Self: Sized,
        F: Fn(Bson) -> Bson,
    {
        AfterWriteWriter { inner: self, f }
    }
}

/// A writer that never fails: every `T` has a well-defined encoding.
///
/// Safety is a strengthening of [`Writer`]; a record's derived writer is safe
/// iff every field writer it composes is safe.
pub trait SafeWriter<T>: Writer<T> {
    /// Encodes `value` infallibly.
    fn safe_write(&self, value: &T) -> Bson;
}

/// A combined [`Reader`] and [`Writer`] for the same type. Derivation always
/// produces handlers.
pub trait Handler<T>: Reader<T> + Writer<T> {}

impl<T, H: Reader<T> + Writer<T> + ?Sized> Handler<T> for H {}

/// A [`Reader`] refined to operate only on [`Document`] values.
pub trait DocumentReader<T> {
    /// Attempts to decode `doc` as a `T`.
    fn read_document(&self, doc: &Document) -> Result<T>;
}

/// A [`Writer`] refined to operate only on [`Document`] values.
pub trait DocumentWriter<T> {
    /// Attempts to encode `value` as a [`Document`].
    fn write_document(&self, value: &T) -> Result<Document>;
}

/// A combined [`DocumentReader`] and [`DocumentWriter`].
pub trait DocumentHandler<T>: DocumentReader<T> + DocumentWriter<T> {}

impl<T, H: DocumentReader<T> + DocumentWriter<T> + ?Sized> DocumentHandler<T> for H {}

/// Requires the input to be a [`Bson::Document`], surfacing a
/// [`crate::error::ErrorKind::TypeMismatch`] otherwise.
pub fn expect_document<'a>(value: &'a Bson) -> Result<&'a Document> {
    match value {
        Bson::Document(doc) => Ok(doc),
        other => Err(crate::error::Error::type_mismatch(
            "document",
            other.type_name(),
        )),
    }
}

// --- combinator wrapper types -------------------------------------------------

/// See [`Reader::map`].
pub struct MapReader<R, F> {
    inner: R,
    f: F,
}

impl<T, U, R: Reader<T>, F: Fn(T) -> U> Reader<U> for MapReader<R, F> {
    fn read_try(&self, value: &Bson) -> Result<U> {
        self.inner.read_try(value).map(&self.f)
    }
}

/// See [`Reader::after_read`].
pub struct AfterReadReader<R, F> {
    inner: R,
    f: F,
}

impl<T, U, R: Reader<T>, F: Fn(T) -> Result<U>> Reader<U> for AfterReadReader<R, F> {
    fn read_try(&self, value: &Bson) -> Result<U> {
        self.inner.read_try(value).and_then(&self.f)
    }
}

/// See [`Reader::collect`].
pub struct CollectReader<R, F> {
    inner: R,
    f: F,
}

impl<T, U, R: Reader<T>, F: Fn(T) -> Option<U>> Reader<U> for CollectReader<R, F> {
    fn read_try(&self, value: &Bson) -> Result<U> {
        let decoded = self.inner.read_try(value)?;
        (self.f)(decoded).ok_or_else(|| crate::error::Error::decode_failure("collect: value rejected"))
    }
}

/// See [`Reader::before_read`].
pub struct BeforeReadReader<R, F> {
    inner: R,
    f: F,
}

impl<T, R: Reader<T>, F: Fn(&Bson) -> Bson> Reader<T> for BeforeReadReader<R, F> {
    fn read_try(&self, value: &Bson) -> Result<T> {
        let rewritten = (self.f)(value);
        self.inner.read_try(&rewritten)
    }
}

/// See [`Reader::widen`].
pub struct WidenReader<R, T> {
    inner: R,
    _marker: PhantomData<T>,
}

impl<T, U, R: Reader<T>> Reader<U> for WidenReader<R, T>
where
    T: Into<U>,
{
    fn read_try(&self, value: &Bson) -> Result<U> {
        self.inner.read_try(value).map(Into::into)
    }
}

/// See [`Writer::contramap`].
pub struct ContramapWriter<W, F> {
    inner: W,
    f: F,
}

impl<T, U, W: Writer<T>, F: Fn(&U) -> T> Writer<U> for ContramapWriter<W, F> {
    fn write_try(&self, value: &U) -> Result<Bson> {
        self.inner.write_try(&(self.f)(value))
    }
}

/// See [`Writer::before_write`].
pub struct BeforeWriteWriter<W, F> {
    inner: W,
    f: F,
}

impl<T, U, W: Writer<T>, F: Fn(&U) -> Result<T>> Writer<U> for BeforeWriteWriter<W, F> {
    fn write_try(&self, value: &U) -> Result<Bson> {
        let mapped = (self.f)(value)?;
        self.inner.write_try(&mapped)
    }
}

/// See [`Writer::narrow`].
pub struct NarrowWriter<W, T> {
    inner: W,
    _marker: PhantomData<T>,
}

impl<T, U, W: Writer<T>> Writer<U> for NarrowWriter<W, T>
where
    U: Clone + Into<T>,
{
    fn write_try(&self, value: &U) -> Result<Bson> {
        self.inner.write_try(&value.clone().into())
    }
}

/// See [`Writer::after_write`].
pub struct AfterWriteWriter<W, F> {
    inner: W,
    f: F,
}

impl<T, W: Writer<T>, F: Fn(Bson) -> Bson> Writer<T> for AfterWriteWriter<W, F> {
    fn write_try(&self, value: &T) -> Result<Bson> {
        self.inner.write_try(value).map(&self.f)
    }
}
