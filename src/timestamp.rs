//! BSON internal replication `Timestamp` type (`0x11`), not to be confused
//! with [`crate::datetime::DateTime`].

use std::fmt;

/// A packed 64-bit BSON timestamp: a 32-bit seconds-since-epoch component and
/// a 32-bit ordinal used to order operations within the same second.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Timestamp {
    /// Seconds since the Unix epoch.
    pub time: u32,
    /// Ordinal within the second.
    pub increment: u32,
}

impl Timestamp {
    /// Constructs a `Timestamp` from its seconds/ordinal parts.
    pub const fn new(time: u32, increment: u32) -> Self {
        Timestamp { time, increment }
    }

    /// Packs this timestamp into the 64-bit wire representation: the high 32
    /// bits are `time`, the low 32 bits are `increment`.
    pub const fn to_packed_u64(self) -> u64 {
        ((self.time as u64) << 32) | (self.increment as u64)
    }

    /// Unpacks a 64-bit wire value into a `Timestamp`.
    pub const fn from_packed_u64(packed: u64) -> Self {
        Timestamp {
            time: (packed >> 32) as u32,
            increment: packed as u32,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}, {})", self.time, self.increment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_high_as_seconds() {
        let ts = Timestamp::new(1, 2);
        assert_eq!(ts.to_packed_u64(), (1u64 << 32) | 2);
    }

    #[test]
    fn round_trips_through_packed_form() {
        let ts = Timestamp::new(0xAABBCCDD, 0x11223344);
        assert_eq!(Timestamp::from_packed_u64(ts.to_packed_u64()), ts);
    }
}
