//! Value generation for absent fields.
//!
//! A field configured with `generate` receives a fresh value when its
//! whole source chain resolves to absent and no static default is
//! configured. All generators are process-wide and safe under concurrent
//! use from multiple requests; the sequence counter is initialized once
//! at process start and never reset mid-run.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Process-local incrementing sequence shared by every request.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// The kinds of values Iris can generate for absent fields.
///
/// # Example
///
/// ```rust
/// use iris_core::GeneratorKind;
///
/// let id = GeneratorKind::Uuid.generate();
/// assert!(uuid::Uuid::parse_str(&id).is_ok());
///
/// let first: u64 = GeneratorKind::Sequence.generate().parse().unwrap();
/// let second: u64 = GeneratorKind::Sequence.generate().parse().unwrap();
/// assert!(second > first);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    /// A random UUID (v4).
    Uuid,
    /// A monotonically-sortable identifier (UUID v7: embedded timestamp
    /// plus randomness, naturally time-ordered).
    SortableId,
    /// The current unix timestamp in milliseconds.
    Timestamp,
    /// A process-local incrementing sequence number.
    Sequence,
    /// A random unsigned integer.
    RandomInt,
    /// A compact URL-safe random string.
    CompactId,
}

impl GeneratorKind {
    /// Generates a fresh value.
    #[must_use]
    pub fn generate(self) -> String {
        match self {
            Self::Uuid => Uuid::new_v4().to_string(),
            Self::SortableId => Uuid::now_v7().to_string(),
            Self::Timestamp => chrono::Utc::now().timestamp_millis().to_string(),
            Self::Sequence => SEQUENCE.fetch_add(1, Ordering::Relaxed).to_string(),
            Self::RandomInt => rand::random::<u64>().to_string(),
            Self::CompactId => nanoid::nanoid!(),
        }
    }
}
