//! Per-request context types.
//!
//! The [`Context`] is the mapping of field name to extracted/derived value
//! for one inbound request. It is created when the request arrives, lives
//! exactly as long as the request (including its downstream calls and
//! asynchronous continuations), and is destroyed on every exit path.
//!
//! A `Context` is a cheap clone over shared interior state: the host
//! attaches one clone to the request object (for `http`-based hosts,
//! `request.extensions_mut().insert(ctx.clone())`) and every piece of
//! code serving that request — on any thread, at any later point —
//! observes the same values. It is never stored in a thread-local:
//! a request may be served by more than one thread over its lifetime.

use crate::error::ExtractionError;
use crate::field::SourceKind;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// A named stage of the extraction state machine.
///
/// Phases run strictly forward: `PreAuth` → `PostAuth` →
/// `BodyProcessing` → `Complete`. Each phase gates which source kinds
/// may be read, because each depends on host state produced between
/// phases (authentication, routing, body parsing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Phase {
    /// Before the caller's identity is established. Header, Query, and
    /// Cookie fields are captured here so failure telemetry still
    /// carries request/tenant identity when authentication fails.
    PreAuth = 0,
    /// After authentication and routing: Path and Claim fields.
    PostAuth = 1,
    /// After the host has parsed a JSON request body: Body fields.
    BodyProcessing = 2,
    /// Terminal state; no further extraction runs.
    Complete = 3,
}

impl Phase {
    /// Returns the source kinds eligible for extraction in this phase.
    #[must_use]
    pub const fn eligible_kinds(self) -> &'static [SourceKind] {
        match self {
            Self::PreAuth => &[SourceKind::Header, SourceKind::Query, SourceKind::Cookie],
            Self::PostAuth => &[SourceKind::Path, SourceKind::Claim],
            Self::BodyProcessing => &[SourceKind::Body],
            Self::Complete => &[],
        }
    }

    /// Returns the phase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PreAuth => "pre_auth",
            Self::PostAuth => "post_auth",
            Self::BodyProcessing => "body_processing",
            Self::Complete => "complete",
        }
    }

    /// Returns all phases in order.
    #[must_use]
    pub const fn all() -> [Phase; 4] {
        [
            Self::PreAuth,
            Self::PostAuth,
            Self::BodyProcessing,
            Self::Complete,
        ]
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::PreAuth,
            1 => Self::PostAuth,
            2 => Self::BodyProcessing,
            _ => Self::Complete,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Default)]
struct ContextInner {
    values: DashMap<String, String>,
    masked: DashMap<String, String>,
    phase: AtomicU8,
}

/// The per-request mapping of field name to extracted/derived value.
///
/// Cloning is cheap and clones share state; concurrent writes from
/// sibling downstream captures of the same request are safe.
///
/// # Example
///
/// ```rust
/// use iris_core::Context;
///
/// let ctx = Context::new();
/// ctx.insert("request_id", "abc-123");
///
/// let clone = ctx.clone();
/// assert_eq!(clone.get("request_id").as_deref(), Some("abc-123"));
///
/// // Writes through any clone are visible everywhere.
/// clone.insert("tenant", "acme");
/// assert_eq!(ctx.get("tenant").as_deref(), Some("acme"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    /// Creates an empty context in the `PreAuth` phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value of a field, if resolved.
    #[must_use]
    pub fn get(&self, field_name: &str) -> Option<String> {
        self.inner.values.get(field_name).map(|v| v.clone())
    }

    /// Returns the masked value if the field is sensitive and masked,
    /// otherwise the raw value.
    ///
    /// This is the accessor observability sinks use.
    #[must_use]
    pub fn get_masked_or_raw(&self, field_name: &str) -> Option<String> {
        self.inner
            .masked
            .get(field_name)
            .map(|v| v.clone())
            .or_else(|| self.get(field_name))
    }

    /// Stores a raw field value.
    pub fn insert(&self, field_name: impl Into<String>, value: impl Into<String>) {
        self.inner.values.insert(field_name.into(), value.into());
    }

    /// Stores the masked rendition of a sensitive field.
    pub fn insert_masked(&self, field_name: impl Into<String>, masked: impl Into<String>) {
        self.inner.masked.insert(field_name.into(), masked.into());
    }

    /// Returns whether a field has been resolved.
    #[must_use]
    pub fn contains(&self, field_name: &str) -> bool {
        self.inner.values.contains_key(field_name)
    }

    /// Returns the number of resolved fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.values.len()
    }

    /// Returns whether no fields are resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.values.is_empty()
    }

    /// Returns the names of all resolved fields.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.inner
            .values
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Returns the current extraction phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.inner.phase.load(Ordering::Acquire))
    }

    /// Enters the given extraction phase.
    ///
    /// Re-entering the current phase is permitted (re-runs are
    /// idempotent); moving backward is a [`ExtractionError::PhaseOrder`]
    /// error.
    pub fn enter_phase(&self, phase: Phase) -> Result<(), ExtractionError> {
        let current = self.phase();
        if phase < current {
            return Err(ExtractionError::PhaseOrder {
                current,
                requested: phase,
            });
        }
        self.inner.phase.store(phase as u8, Ordering::Release);
        Ok(())
    }

    /// Marks extraction complete; no further phases may run.
    pub fn complete(&self) {
        self.inner
            .phase
            .store(Phase::Complete as u8, Ordering::Release);
    }
}

/// One key/value pair bound for a specific downstream call.
///
/// Entries are ephemeral: computed just-in-time per outgoing call by
/// evaluating each field's downstream enrichment against the current
/// [`Context`] and the target system id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagationEntry {
    /// Where the value is written on the outgoing request (Header or
    /// Query).
    pub kind: SourceKind,
    /// The header or query-parameter name.
    pub key: String,
    /// The value to send.
    pub value: String,
    /// Whether the value is sensitive (hosts must not log it raw).
    pub sensitive: bool,
}
