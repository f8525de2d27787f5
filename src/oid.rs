//! Module containing functionality related to BSON ObjectIds.
//! For more information, see the documentation for the [`ObjectId`] type.

use std::{
    convert::TryInto,
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU32, Ordering},
    time::SystemTime,
};

use once_cell::sync::Lazy;
use rand::Rng;

use crate::error::{Error, ErrorKind, Result};

const TIMESTAMP_SIZE: usize = 4;
const MACHINE_ID_SIZE: usize = 3;
const THREAD_ID_SIZE: usize = 2;
const COUNTER_SIZE: usize = 3;

const TIMESTAMP_OFFSET: usize = 0;
const MACHINE_ID_OFFSET: usize = TIMESTAMP_OFFSET + TIMESTAMP_SIZE;
const THREAD_ID_OFFSET: usize = MACHINE_ID_OFFSET + MACHINE_ID_SIZE;
const COUNTER_OFFSET: usize = THREAD_ID_OFFSET + THREAD_ID_SIZE;

const MAX_U24: u32 = 0x00FF_FFFF;

fn counter_to_bytes(value: u32) -> [u8; COUNTER_SIZE] {
    let buf = value.to_be_bytes();
    [buf[1], buf[2], buf[3]]
}

/// Process-wide counter, seeded from a pseudo-random value on first use and
/// incremented modulo 2^24 thereafter. Wait-free: a single atomic fetch-add.
static OID_COUNTER: Lazy<AtomicU32> =
    Lazy::new(|| AtomicU32::new(rand::rng().random_range(0..=MAX_U24)));

/// The 3-byte machine identifier, derived once per process and memoized.
///
/// Falls back from "first 3 bytes of the MD5 of a resolved MAC address" to
/// "first 3 bytes of a hashed hostname" to "first 3 bytes of the current
/// thread id" if the earlier sources are unavailable. All three fallback tiers
/// are deterministic for a given host.
static MACHINE_ID: Lazy<[u8; MACHINE_ID_SIZE]> = Lazy::new(compute_machine_id);

fn md5_like_digest(bytes: &[u8]) -> [u8; 16] {
    // A process-local, allocation-free fold used only to derive a stable
    // 3-byte machine fingerprint from a MAC address or hostname. Not intended
    // to be (and is not) a cryptographic MD5 implementation.
    let mut state: [u8; 16] = [0; 16];
    for (i, b) in bytes.iter().enumerate() {
        state[i % 16] = state[i % 16].wrapping_add(*b).rotate_left(3);
    }
    state
}

fn compute_machine_id() -> [u8; MACHINE_ID_SIZE] {
    if let Some(mac) = resolve_mac_address() {
        let digest = md5_like_digest(&mac);
        return [digest[0], digest[1], digest[2]];
    }

    if let Ok(hostname) = std::env::var("HOSTNAME").or_else(|_| std::env::var("COMPUTERNAME")) {
        if !hostname.is_empty() {
            let digest = md5_like_digest(hostname.as_bytes());
            return [digest[0], digest[1], digest[2]];
        }
    }

    let thread_bytes = current_thread_id_bytes();
    [thread_bytes[0], thread_bytes[1], thread_bytes[2]]
}

/// Best-effort MAC address resolution. This crate has no network/system
/// introspection dependency, so this always falls through to the hostname or
/// thread-id tiers; it exists as the documented first tier of the fallback
/// chain and as the extension point for a platform-specific resolver.
fn resolve_mac_address() -> Option<[u8; 6]> {
    None
}

fn current_thread_id_bytes() -> [u8; 8] {
    let id = format!("{:?}", std::thread::current().id());
    let digest = md5_like_digest(id.as_bytes());
    digest[0..8].try_into().unwrap()
}

fn gen_thread_id() -> [u8; THREAD_ID_SIZE] {
    let bytes = current_thread_id_bytes();
    [bytes[6], bytes[7]]
}

/// A wrapper around a raw 12-byte ObjectId.
///
/// Bytes are laid out as: a 4-byte big-endian Unix-seconds timestamp, a
/// 3-byte machine identifier, 2 bytes derived from the generating thread, and
/// a 3-byte big-endian counter shared process-wide. This matches the classic
/// (pre driver-spec-4.0) ObjectId layout rather than the newer
/// all-random-plus-counter format.
#[derive(Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct ObjectId {
    id: [u8; 12],
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl From<[u8; 12]> for ObjectId {
    fn from(bytes: [u8; 12]) -> Self {
        Self { id: bytes }
    }
}

impl ObjectId {
    /// Generates a new [`ObjectId`] using the current time, the process-wide
    /// machine/thread identifier, and the process-wide counter.
    pub fn new() -> Self {
        let timestamp = Self::gen_timestamp();
        Self::from_parts(timestamp, *MACHINE_ID, gen_thread_id(), Self::gen_count())
    }

    /// Constructs an ObjectId from a Unix-seconds timestamp with the
    /// remaining 8 bytes zeroed. Used to build range-query bounds where only
    /// the embedded creation time matters.
    pub fn from_time(seconds_since_epoch: u32) -> Self {
        Self::from_parts(seconds_since_epoch, [0; 3], [0; 2], [0; 3])
    }

    /// Constructs a new ObjectId wrapper around the raw byte representation.
    pub const fn from_bytes(bytes: [u8; 12]) -> ObjectId {
        ObjectId { id: bytes }
    }

    fn from_parts(
        seconds_since_epoch: u32,
        machine_id: [u8; MACHINE_ID_SIZE],
        thread_id: [u8; THREAD_ID_SIZE],
        counter: [u8; COUNTER_SIZE],
    ) -> Self {
        let mut bytes = [0u8; 12];
        bytes[TIMESTAMP_OFFSET..TIMESTAMP_OFFSET + TIMESTAMP_SIZE]
            .copy_from_slice(&seconds_since_epoch.to_be_bytes());
        bytes[MACHINE_ID_OFFSET..MACHINE_ID_OFFSET + MACHINE_ID_SIZE].copy_from_slice(&machine_id);
        bytes[THREAD_ID_OFFSET..THREAD_ID_OFFSET + THREAD_ID_SIZE].copy_from_slice(&thread_id);
        bytes[COUNTER_OFFSET..COUNTER_OFFSET + COUNTER_SIZE].copy_from_slice(&counter);
        Self::from_bytes(bytes)
    }

    /// Creates an ObjectId from a 12-byte (24-char) hexadecimal string.
    pub fn parse_str(s: impl AsRef<str>) -> Result<ObjectId> {
        let s = s.as_ref();
        let bytes = hex::decode(s).map_err(|e| {
            Error::new(ErrorKind::ObjectId {}).with_message(format!("invalid hex: {e}"))
        })?;
        if bytes.len() != 12 {
            return Err(Error::new(ErrorKind::ObjectId {}).with_message(format!(
                "an ObjectId's hex string must decode to 12 bytes, got {}",
                bytes.len()
            )));
        }
        let mut array = [0u8; 12];
        array.copy_from_slice(&bytes);
        Ok(ObjectId::from_bytes(array))
    }

    /// Retrieves the creation timestamp embedded in this ObjectId.
    pub fn timestamp(&self) -> crate::datetime::DateTime {
        let mut buf = [0; 4];
        buf.copy_from_slice(&self.id[0..4]);
        let seconds_since_epoch = u32::from_be_bytes(buf);
        crate::datetime::DateTime::from_millis(seconds_since_epoch as i64 * 1000)
    }

    /// Returns the raw byte representation of an ObjectId.
    pub const fn bytes(&self) -> [u8; 12] {
        self.id
    }

    /// Convert this ObjectId to its hex string representation.
    pub fn to_hex(self) -> String {
        hex::encode(self.id)
    }

    fn gen_timestamp() -> u32 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("system clock is before 1970")
            .as_secs()
            .try_into()
            .unwrap() // will succeed until 2106 since timestamp is unsigned
    }

    /// Generates the next 3-byte counter value, wrapping modulo 2^24.
    fn gen_count() -> [u8; COUNTER_SIZE] {
        let prev = OID_COUNTER.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| {
            Some((v + 1) % (MAX_U24 + 1))
        });
        counter_to_bytes(prev.unwrap_or(0))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("ObjectId").field(&self.to_hex()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_produces_distinct_ids() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn hex_round_trips() {
        let id = ObjectId::new();
        let hex = id.to_hex();
        assert_eq!(ObjectId::parse_str(&hex).unwrap(), id);
    }

    #[test]
    fn rejects_wrong_length_hex() {
        assert!(ObjectId::parse_str("abcd").is_err());
    }

    #[test]
    fn rejects_invalid_hex_chars() {
        assert!(ObjectId::parse_str("zz".repeat(12)).is_err());
    }

    #[test]
    fn from_time_zeroes_trailing_bytes() {
        let id = ObjectId::from_time(1_700_000_000);
        assert_eq!(&id.bytes()[4..12], &[0u8; 8]);
    }

    #[test]
    fn timestamp_round_trips_through_seconds() {
        let seconds = 1_700_000_000u32;
        let id = ObjectId::from_time(seconds);
        assert_eq!(id.timestamp().millis(), seconds as i64 * 1000);
    }

    #[test]
    fn counter_wraps_modulo_2_24() {
        assert_eq!(counter_to_bytes(MAX_U24), [0xFF, 0xFF, 0xFF]);
        assert_eq!(counter_to_bytes(0), [0x00, 0x00, 0x00]);
    }
}
