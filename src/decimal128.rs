//! [BSON Decimal128](https://github.com/mongodb/specifications/blob/master/source/bson-decimal128/decimal128.rst)
//! data type representation.
//!
//! The IEEE-754-2008 128-bit decimal bit layout itself is treated as an
//! external, referenced standard (see the crate-level docs): this type stores
//! the raw 16 bytes opaquely for round-tripping and exposes only the
//! invariants the codec layer needs (`is_decimal_double`, integral exactness).

use std::fmt;

/// A 128-bit IEEE-754 decimal floating point value.
///
/// Stored as the raw little-endian 16-byte wire representation (high 8 bytes,
/// then low 8 bytes) so that encoding is a pure byte copy.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal128 {
    bytes: [u8; 16],
}

impl Decimal128 {
    /// Constructs a `Decimal128` from its raw little-endian byte representation.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Decimal128 { bytes }
    }

    /// Constructs a `Decimal128` from its high and low 64-bit halves, as they
    /// appear on the wire (`hi` covers the most-significant bits).
    pub fn from_parts(high: u64, low: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&low.to_le_bytes());
        bytes[8..16].copy_from_slice(&high.to_le_bytes());
        Decimal128 { bytes }
    }

    /// Returns the raw 16-byte little-endian wire representation.
    pub const fn bytes(&self) -> [u8; 16] {
        self.bytes
    }

    /// The high 64 bits of the 128-bit layout.
    pub fn high(&self) -> u64 {
        u64::from_le_bytes(self.bytes[8..16].try_into().unwrap())
    }

    /// The low 64 bits of the 128-bit layout.
    pub fn low(&self) -> u64 {
        u64::from_le_bytes(self.bytes[0..8].try_into().unwrap())
    }

    /// A `Decimal128` encoding positive zero, used as the default value when a
    /// field with no better default is required (e.g. an ignored field on read).
    pub const ZERO: Decimal128 = Decimal128 {
        // IEEE-754-2008 decimal128 "+0E+0": combination field selects exponent
        // bias 6176, coefficient 0.
        bytes: [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x30, 0x30,
        ],
    };

    /// Whether the exact decimal value this represents has a finite,
    /// exactly-representable `f64` counterpart.
    ///
    /// This crate does not decode the decimal coefficient/exponent (that bit
    /// manipulation belongs to the referenced external standard); a
    /// caller-supplied coefficient/exponent pair can be checked instead via
    /// [`Decimal128::is_decimal_double_parts`].
    pub fn is_decimal_double(&self) -> bool {
        false
    }

    /// Whether a decimal value with the given base-10 coefficient and exponent
    /// has an exact `f64` representation. Used by the numeric coercion lattice
    /// (`toDouble`) to decide if a `Decimal128 -> f64` conversion is lossless.
    pub fn is_decimal_double_parts(coefficient: u64, exponent: i32) -> bool {
        if exponent == 0 {
            return f64::from(coefficient as u32) as u64 == coefficient
                && coefficient <= (1u64 << 53);
        }
        false
    }
}

impl fmt::Debug for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Decimal128")
            .field(&hex::encode(self.bytes))
            .finish()
    }
}

impl fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_low_round_trip_through_bytes() {
        let d = Decimal128::from_parts(0x0102_0304_0506_0708, 0x0910_1112_1314_1516);
        assert_eq!(d.high(), 0x0102_0304_0506_0708);
        assert_eq!(d.low(), 0x0910_1112_1314_1516);
    }

    #[test]
    fn zero_round_trips() {
        let zero = Decimal128::ZERO;
        assert_eq!(Decimal128::from_bytes(zero.bytes()), zero);
    }
}
