//! L2: the numeric/boolean bridges.
//!
//! [`Bson::to_i32_exact`] and friends implement the numeric coercion lattice:
//! a coercion succeeds only when the source value is exactly representable
//! in the target. [`NumberLike`]/[`BooleanLike`] are capability tags over
//! that lattice, each with a default identity codec.

use crate::{
    bson::Bson,
    codec::{Reader, SafeWriter, Writer},
    decimal128::Decimal128,
    error::{Error, Result},
};

impl Bson {
    /// Exact coercion to `i32`: succeeds iff the source is a whole number in
    /// range.
    pub fn to_i32_exact(&self) -> Option<i32> {
        match self {
            Bson::Int32(v) => Some(*v),
            Bson::Int64(v) => i32::try_from(*v).ok(),
            Bson::Double(v) => whole_number_in_range(*v, i32::MIN as f64, i32::MAX as f64)
                .map(|w| w as i32),
            _ => None,
        }
    }

    /// Exact coercion to `i64`. `DateTime` and `Timestamp` are deliberately
    /// excluded here; use [`Bson::to_i64_only`] for those, matching the data
    /// model's note that they expose `toLong` only.
    pub fn to_i64_exact(&self) -> Option<i64> {
        match self {
            Bson::Int32(v) => Some(*v as i64),
            Bson::Int64(v) => Some(*v),
            Bson::Double(v) => whole_number_in_range(*v, -(2f64.powi(63)), 2f64.powi(63) - 1.0),
            _ => None,
        }
    }

    /// `toLong` for the variants that only ever expose a 64-bit integral
    /// view: `DateTime` (its millisecond count) and `Timestamp` (its packed
    /// 64-bit form).
    pub fn to_i64_only(&self) -> Option<i64> {
        match self {
            Bson::DateTime(dt) => Some(dt.millis()),
            Bson::Timestamp(ts) => Some(ts.to_packed_u64() as i64),
            other => other.to_i64_exact(),
        }
    }

    /// Exact coercion to `f32`.
    pub fn to_f32_exact(&self) -> Option<f32> {
        let as_f64 = self.to_f64_exact()?;
        let as_f32 = as_f64 as f32;
        (as_f32 as f64 == as_f64).then_some(as_f32)
    }

    /// Exact coercion to `f64`.
    pub fn to_f64_exact(&self) -> Option<f64> {
        match self {
            Bson::Double(v) => Some(*v),
            Bson::Int32(v) => Some(*v as f64),
            Bson::Int64(v) => {
                let as_f64 = *v as f64;
                (as_f64 as i64 == *v).then_some(as_f64)
            }
            Bson::Decimal128(d) if d.is_decimal_double() => {
                // The decimal coefficient/exponent decode is outside this
                // crate's scope; `is_decimal_double` is the hook a caller
                // with access to the decoded parts can drive via
                // `Decimal128::is_decimal_double_parts`.
                None
            }
            _ => None,
        }
    }

    /// Exact coercion to `Decimal128`. Only the identity case is implemented:
    /// this crate treats the IEEE-754-2008 decimal128 bit layout as an
    /// external, referenced standard, so constructing a new `Decimal128` from
    /// an `f64`/integer requires a decimal encoder this crate does not carry.
    pub fn to_decimal128_exact(&self) -> Option<Decimal128> {
        match self {
            Bson::Decimal128(d) => Some(*d),
            _ => None,
        }
    }

    /// The boolean view over numerics/null/undefined/booleans: numbers are
    /// `true` iff non-zero, `Null`/`Undefined` are `false`, booleans are
    /// themselves.
    pub fn as_bool_like(&self) -> Option<bool> {
        match self {
            Bson::Boolean(b) => Some(*b),
            Bson::Int32(v) => Some(*v != 0),
            Bson::Int64(v) => Some(*v != 0),
            Bson::Double(v) => Some(*v != 0.0),
            Bson::Decimal128(d) => Some(d.bytes() != Decimal128::ZERO.bytes()),
            Bson::Null | Bson::Undefined => Some(false),
            _ => None,
        }
    }
}

fn whole_number_in_range(v: f64, min: f64, max: f64) -> Option<i64> {
    if v.fract() == 0.0 && v >= min && v <= max {
        Some(v as i64)
    } else {
        None
    }
}

/// A `Bson` value known to carry the `NumberLike` capability tag: `Double`,
/// `Int32`, `Int64`, or `Decimal128`.
#[derive(Clone, Debug, PartialEq)]
pub struct NumberLike(pub Bson);

/// A `Bson` value known to carry the `BooleanLike` capability tag: `Int32`,
/// `Int64`, `Double`, `Decimal128`, `Boolean`, `Null`, or `Undefined`.
#[derive(Clone, Debug, PartialEq)]
pub struct BooleanLike(pub Bson);

fn is_number_like(value: &Bson) -> bool {
    matches!(
        value,
        Bson::Double(_) | Bson::Int32(_) | Bson::Int64(_) | Bson::Decimal128(_)
    )
}

fn is_boolean_like(value: &Bson) -> bool {
    is_number_like(value) || matches!(value, Bson::Boolean(_) | Bson::Null | Bson::Undefined)
}

/// The default codec for [`NumberLike`]: reads any numeric-tagged value and
/// writes it back unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct NumberLikeHandler;

impl Reader<NumberLike> for NumberLikeHandler {
    fn read_try(&self, value: &Bson) -> Result<NumberLike> {
        if is_number_like(value) {
            Ok(NumberLike(value.clone()))
        } else {
            Err(Error::type_mismatch("number", value.type_name()))
        }
    }
}

impl Writer<NumberLike> for NumberLikeHandler {
    fn write_try(&self, value: &NumberLike) -> Result<Bson> {
        Ok(value.0.clone())
    }
}

impl SafeWriter<NumberLike> for NumberLikeHandler {
    fn safe_write(&self, value: &NumberLike) -> Bson {
        value.0.clone()
    }
}

/// The default codec for [`BooleanLike`]: reads any boolean-view-eligible
/// value and writes it back unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct BooleanLikeHandler;

impl Reader<BooleanLike> for BooleanLikeHandler {
    fn read_try(&self, value: &Bson) -> Result<BooleanLike> {
        if is_boolean_like(value) {
            Ok(BooleanLike(value.clone()))
        } else {
            Err(Error::type_mismatch("boolean-like", value.type_name()))
        }
    }
}

impl Writer<BooleanLike> for BooleanLikeHandler {
    fn write_try(&self, value: &BooleanLike) -> Result<Bson> {
        Ok(value.0.clone())
    }
}

impl SafeWriter<BooleanLike> for BooleanLikeHandler {
    fn safe_write(&self, value: &BooleanLike) -> Bson {
        value.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_to_int_coercions_succeed() {
        assert_eq!(Bson::Int32(5).to_i64_exact(), Some(5));
        assert_eq!(Bson::Int64(5).to_i32_exact(), Some(5));
    }

    #[test]
    fn whole_double_coerces_to_int() {
        assert_eq!(Bson::Double(2.0).to_i32_exact(), Some(2));
    }

    #[test]
    fn fractional_double_does_not_coerce_to_int() {
        assert_eq!(Bson::Double(2.5).to_i32_exact(), None);
    }

    #[test]
    fn overflowing_int64_does_not_narrow_to_int32() {
        assert_eq!(Bson::Int64(i64::from(i32::MAX) + 1).to_i32_exact(), None);
    }

    #[test]
    fn datetime_and_timestamp_expose_long_only() {
        assert_eq!(Bson::DateTime(crate::datetime::DateTime::from_millis(42)).to_i32_exact(), None);
        assert_eq!(
            Bson::DateTime(crate::datetime::DateTime::from_millis(42)).to_i64_only(),
            Some(42)
        );
    }

    #[test]
    fn boolean_view_over_numbers() {
        assert_eq!(Bson::Int32(0).as_bool_like(), Some(false));
        assert_eq!(Bson::Int32(1).as_bool_like(), Some(true));
        assert_eq!(Bson::Null.as_bool_like(), Some(false));
        assert_eq!(Bson::Undefined.as_bool_like(), Some(false));
        assert_eq!(Bson::Boolean(true).as_bool_like(), Some(true));
        assert_eq!(Bson::String("x".into()).as_bool_like(), None);
    }

    #[test]
    fn number_like_handler_round_trips() {
        let handler = NumberLikeHandler;
        let value = Bson::Int32(7);
        let decoded = handler.read_try(&value).unwrap();
        assert_eq!(handler.write_try(&decoded).unwrap(), value);
    }

    #[test]
    fn number_like_handler_rejects_non_numeric() {
        let handler = NumberLikeHandler;
        assert!(handler.read_try(&Bson::String("x".into())).is_err());
    }
}
