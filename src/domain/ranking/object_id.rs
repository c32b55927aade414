use once_cell::sync::Lazy;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

// 5 random bytes fixed for the lifetime of the process, plus a counter seeded at random
static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(|| {
    let seed = Uuid::new_v4();
    let mut bytes = [0u8; 5];
    bytes.copy_from_slice(&seed.as_bytes()[..5]);
    bytes
});

static COUNTER: Lazy<AtomicU32> = Lazy::new(|| {
    let seed = Uuid::new_v4();
    let b = seed.as_bytes();
    AtomicU32::new(u32::from_be_bytes([0, b[0], b[1], b[2]]))
});

/// 12-byte identifier rendered as 24 lowercase hex characters:
/// seconds since epoch, process-unique bytes, rolling counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    pub fn new() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        let count = COUNTER.fetch_add(1, Ordering::SeqCst) & 0x00FF_FFFF;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
