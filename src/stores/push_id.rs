//! Generates unique, chronologically ordered keys for new store locations.
//!
//! A key is 20 characters long. The first 8 characters encode the creation
//! time in milliseconds and the remaining 12 are random, so keys sort in the
//! order they were created and are very unlikely to collide between clients.

use std::sync::Mutex;

use time::OffsetDateTime;
use uuid::Uuid;

/// The characters used to encode keys, in ASCII order.
const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

const TIMESTAMP_LENGTH: usize = 8;
const RANDOM_LENGTH: usize = 12;

/// The length of a generated key.
pub const PUSH_ID_LENGTH: usize = TIMESTAMP_LENGTH + RANDOM_LENGTH;

#[derive(Debug, Default)]
struct PushIdState {
    last_push_time: i64,
    last_random_chars: [u8; RANDOM_LENGTH],
}

/// Generates keys for new child locations.
///
/// Two keys generated in the same millisecond share the timestamp prefix and
/// the random suffix of the second is the first's plus one.
#[derive(Debug, Default)]
pub struct PushIdGenerator {
    state: Mutex<PushIdState>,
}

impl PushIdGenerator {
    /// Create a generator with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a key for the current time.
    pub fn generate(&self) -> String {
        let now = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;

        self.generate_at(now as i64)
    }

    /// Generate a key for the time `now`, in milliseconds since the Unix epoch.
    pub fn generate_at(&self, now: i64) -> String {
        // A poisoned lock only means another thread panicked mid-generation,
        // the state is still a valid pair of timestamp and random characters.
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if now == state.last_push_time {
            increment(&mut state.last_random_chars);
        } else {
            state.last_push_time = now;
            state.last_random_chars = random_chars();
        }

        let mut key = String::with_capacity(PUSH_ID_LENGTH);
        key.extend(encode_timestamp(now).iter().map(|&c| c as char));
        key.extend(
            state
                .last_random_chars
                .iter()
                .map(|&index| PUSH_CHARS[index as usize] as char),
        );

        key
    }
}

fn encode_timestamp(mut timestamp: i64) -> [u8; TIMESTAMP_LENGTH] {
    let mut chars = [0; TIMESTAMP_LENGTH];

    for c in chars.iter_mut().rev() {
        *c = PUSH_CHARS[timestamp.rem_euclid(64) as usize];
        timestamp = timestamp.div_euclid(64);
    }

    chars
}

/// The UUID bytes that hold the version (6) and variant (8) bits.
const UUID_FIXED_BYTES: [usize; 2] = [6, 8];

fn random_chars() -> [u8; RANDOM_LENGTH] {
    let bytes = Uuid::new_v4().into_bytes();
    let random_bytes = bytes
        .iter()
        .enumerate()
        .filter(|(index, _)| !UUID_FIXED_BYTES.contains(index))
        .map(|(_, byte)| byte);
    let mut chars = [0; RANDOM_LENGTH];

    // The 14 remaining bytes are uniformly random and 256 is a multiple of
    // 64, so each character is uniform over the push alphabet.
    for (c, byte) in chars.iter_mut().zip(random_bytes) {
        *c = byte % 64;
    }

    chars
}

/// Add one to the base-64 number stored in `chars`, wrapping on overflow.
fn increment(chars: &mut [u8; RANDOM_LENGTH]) {
    for c in chars.iter_mut().rev() {
        if *c == 63 {
            *c = 0;
        } else {
            *c += 1;
            return;
        }
    }
}
