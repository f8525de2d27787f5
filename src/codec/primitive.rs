//! Built-in [`Handler`] implementations for the primitive scalar types,
//! common date types, and UUID.
//!
//! Integral readers accept the coercion lattice's permissive widening: any
//! numeric BSON variant decodes successfully iff it exactly represents the
//! target value. Every primitive writer here is [`SafeWriter`]: there is no
//! value of the Rust type that fails to encode.

use crate::{
    binary::Binary,
    bson::Bson,
    codec::{Handler, Reader, SafeWriter, Writer},
    datetime::DateTime,
    decimal128::Decimal128,
    error::{Error, Result},
    oid::ObjectId,
    spec::BinarySubtype,
    timestamp::Timestamp,
};

macro_rules! simple_handler {
    ($handler:ident, $ty:ty) => {
        /// Handler for
        #[doc = concat!("`", stringify!($ty), "`.")]
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $handler;
    };
}

simple_handler!(Int32Handler, i32);
simple_handler!(Int64Handler, i64);
simple_handler!(DoubleHandler, f64);
simple_handler!(Float32Handler, f32);
simple_handler!(BoolHandler, bool);
simple_handler!(StringHandler, String);
simple_handler!(BinaryHandler, Vec<u8>);
simple_handler!(ObjectIdHandler, ObjectId);
simple_handler!(DateTimeHandler, DateTime);
simple_handler!(TimestampHandler, Timestamp);
simple_handler!(Decimal128Handler, Decimal128);
simple_handler!(UuidHandler, uuid::Uuid);

impl Reader<i32> for Int32Handler {
    fn read_try(&self, value: &Bson) -> Result<i32> {
        value
            .to_i32_exact()
            .ok_or_else(|| Error::type_mismatch("int", value.type_name()))
    }
}
impl Writer<i32> for Int32Handler {
    fn write_try(&self, value: &i32) -> Result<Bson> {
        Ok(Bson::Int32(*value))
    }
}
impl SafeWriter<i32> for Int32Handler {
    fn safe_write(&self, value: &i32) -> Bson {
        Bson::Int32(*value)
    }
}

impl Reader<i64> for Int64Handler {
    fn read_try(&self, value: &Bson) -> Result<i64> {
        value
            .to_i64_exact()
            .ok_or_else(|| Error::type_mismatch("long", value.type_name()))
    }
}
impl Writer<i64> for Int64Handler {
    fn write_try(&self, value: &i64) -> Result<Bson> {
        Ok(Bson::Int64(*value))
    }
}
impl SafeWriter<i64> for Int64Handler {
    fn safe_write(&self, value: &i64) -> Bson {
        Bson::Int64(*value)
    }
}

impl Reader<f64> for DoubleHandler {
    fn read_try(&self, value: &Bson) -> Result<f64> {
        value
            .to_f64_exact()
            .ok_or_else(|| Error::type_mismatch("double", value.type_name()))
    }
}
impl Writer<f64> for DoubleHandler {
    fn write_try(&self, value: &f64) -> Result<Bson> {
        Ok(Bson::Double(*value))
    }
}
impl SafeWriter<f64> for DoubleHandler {
    fn safe_write(&self, value: &f64) -> Bson {
        Bson::Double(*value)
    }
}

impl Reader<f32> for Float32Handler {
    fn read_try(&self, value: &Bson) -> Result<f32> {
        value
            .to_f32_exact()
            .ok_or_else(|| Error::type_mismatch("double", value.type_name()))
    }
}
impl Writer<f32> for Float32Handler {
    fn write_try(&self, value: &f32) -> Result<Bson> {
        Ok(Bson::Double(*value as f64))
    }
}
impl SafeWriter<f32> for Float32Handler {
    fn safe_write(&self, value: &f32) -> Bson {
        Bson::Double(*value as f64)
    }
}

impl Reader<bool> for BoolHandler {
    fn read_try(&self, value: &Bson) -> Result<bool> {
        match value {
            Bson::Boolean(b) => Ok(*b),
            other => Err(Error::type_mismatch("bool", other.type_name())),
        }
    }
}
impl Writer<bool> for BoolHandler {
    fn write_try(&self, value: &bool) -> Result<Bson> {
        Ok(Bson::Boolean(*value))
    }
}
impl SafeWriter<bool> for BoolHandler {
    fn safe_write(&self, value: &bool) -> Bson {
        Bson::Boolean(*value)
    }
}

impl Reader<String> for StringHandler {
    fn read_try(&self, value: &Bson) -> Result<String> {
        match value {
            Bson::String(s) => Ok(s.clone()),
            other => Err(Error::type_mismatch("string", other.type_name())),
        }
    }
}
impl Writer<String> for StringHandler {
    fn write_try(&self, value: &String) -> Result<Bson> {
        Ok(Bson::String(value.clone()))
    }
}
impl SafeWriter<String> for StringHandler {
    fn safe_write(&self, value: &String) -> Bson {
        Bson::String(value.clone())
    }
}

impl Reader<Vec<u8>> for BinaryHandler {
    fn read_try(&self, value: &Bson) -> Result<Vec<u8>> {
        match value {
            Bson::Binary(bin) => Ok(bin.bytes.clone()),
            other => Err(Error::type_mismatch("binary", other.type_name())),
        }
    }
}
impl Writer<Vec<u8>> for BinaryHandler {
    fn write_try(&self, value: &Vec<u8>) -> Result<Bson> {
        Ok(Bson::Binary(Binary::new(BinarySubtype::Generic, value.clone())))
    }
}
impl SafeWriter<Vec<u8>> for BinaryHandler {
    fn safe_write(&self, value: &Vec<u8>) -> Bson {
        Bson::Binary(Binary::new(BinarySubtype::Generic, value.clone()))
    }
}

impl Reader<ObjectId> for ObjectIdHandler {
    fn read_try(&self, value: &Bson) -> Result<ObjectId> {
        match value {
            Bson::ObjectId(id) => Ok(*id),
            other => Err(Error::type_mismatch("objectId", other.type_name())),
        }
    }
}
impl Writer<ObjectId> for ObjectIdHandler {
    fn write_try(&self, value: &ObjectId) -> Result<Bson> {
        Ok(Bson::ObjectId(*value))
    }
}
impl SafeWriter<ObjectId> for ObjectIdHandler {
    fn safe_write(&self, value: &ObjectId) -> Bson {
        Bson::ObjectId(*value)
    }
}

impl Reader<DateTime> for DateTimeHandler {
    fn read_try(&self, value: &Bson) -> Result<DateTime> {
        match value {
            Bson::DateTime(dt) => Ok(*dt),
            other => Err(Error::type_mismatch("date", other.type_name())),
        }
    }
}
impl Writer<DateTime> for DateTimeHandler {
    fn write_try(&self, value: &DateTime) -> Result<Bson> {
        Ok(Bson::DateTime(*value))
    }
}
impl SafeWriter<DateTime> for DateTimeHandler {
    fn safe_write(&self, value: &DateTime) -> Bson {
        Bson::DateTime(*value)
    }
}

impl Reader<Timestamp> for TimestampHandler {
    fn read_try(&self, value: &Bson) -> Result<Timestamp> {
        match value {
            Bson::Timestamp(ts) => Ok(*ts),
            other => Err(Error::type_mismatch("timestamp", other.type_name())),
        }
    }
}
impl Writer<Timestamp> for TimestampHandler {
    fn write_try(&self, value: &Timestamp) -> Result<Bson> {
        Ok(Bson::Timestamp(*value))
    }
}
impl SafeWriter<Timestamp> for TimestampHandler {
    fn safe_write(&self, value: &Timestamp) -> Bson {
        Bson::Timestamp(*value)
    }
}

impl Reader<Decimal128> for Decimal128Handler {
    fn read_try(&self, value: &Bson) -> Result<Decimal128> {
        match value {
            Bson::Decimal128(d) => Ok(*d),
            other => Err(Error::type_mismatch("decimal", other.type_name())),
        }
    }
}
impl Writer<Decimal128> for Decimal128Handler {
    fn write_try(&self, value: &Decimal128) -> Result<Bson> {
        Ok(Bson::Decimal128(*value))
    }
}
impl SafeWriter<Decimal128> for Decimal128Handler {
    fn safe_write(&self, value: &Decimal128) -> Bson {
        Bson::Decimal128(*value)
    }
}

/// UUIDs are represented as [`Bson::Binary`] with [`BinarySubtype::Uuid`].
impl Reader<uuid::Uuid> for UuidHandler {
    fn read_try(&self, value: &Bson) -> Result<uuid::Uuid> {
        match value {
            Bson::Binary(bin) if bin.subtype == BinarySubtype::Uuid => {
                uuid::Uuid::from_slice(&bin.bytes)
                    .map_err(|e| Error::decode_failure(format!("invalid UUID bytes: {e}")))
            }
            Bson::Binary(_) => Err(Error::decode_failure(
                "binary value is not subtype 4 (UUID)",
            )),
            other => Err(Error::type_mismatch("binary", other.type_name())),
        }
    }
}
impl Writer<uuid::Uuid> for UuidHandler {
    fn write_try(&self, value: &uuid::Uuid) -> Result<Bson> {
        Ok(Bson::Binary(Binary::new(
            BinarySubtype::Uuid,
            value.as_bytes().to_vec(),
        )))
    }
}
impl SafeWriter<uuid::Uuid> for UuidHandler {
    fn safe_write(&self, value: &uuid::Uuid) -> Bson {
        Bson::Binary(Binary::new(BinarySubtype::Uuid, value.as_bytes().to_vec()))
    }
}

/// Default [`Handler`] values for every primitive type this module covers.
pub mod defaults {
    use super::*;

    /// `i32` handler.
    pub fn int32() -> impl Handler<i32> + Clone + Copy {
        Int32Handler
    }
    /// `i64` handler.
    pub fn int64() -> impl Handler<i64> + Clone + Copy {
        Int64Handler
    }
    /// `f64` handler.
    pub fn double() -> impl Handler<f64> + Clone + Copy {
        DoubleHandler
    }
    /// `bool` handler.
    pub fn boolean() -> impl Handler<bool> + Clone + Copy {
        BoolHandler
    }
    /// `String` handler.
    pub fn string() -> impl Handler<String> + Clone + Copy {
        StringHandler
    }
    /// `ObjectId` handler.
    pub fn object_id() -> impl Handler<ObjectId> + Clone + Copy {
        ObjectIdHandler
    }
    /// `DateTime` handler.
    pub fn date_time() -> impl Handler<DateTime> + Clone + Copy {
        DateTimeHandler
    }
    /// `uuid::Uuid` handler.
    pub fn uuid() -> impl Handler<uuid::Uuid> + Clone + Copy {
        UuidHandler
    }
}
