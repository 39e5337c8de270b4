//! Proxy record definitions
//!
//! Contains the immutable value type describing one proxy entry as seen by
//! an inventory: identity, display labels, classification and latency.

use super::proxy_kind::ProxyKind;

/// Delay value meaning "not measured yet".
pub const DELAY_UNMEASURED: i32 = 0;

/// Represents a single proxy entry.
///
/// Records are never mutated after construction. An update (for example a new
/// latency measurement) produces a new record via [`ProxyRecord::with_delay`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyRecord {
    name: String,
    title: String,
    subtitle: String,
    kind: ProxyKind,
    /// Latency in milliseconds, `DELAY_UNMEASURED` when unknown
    delay: i32,
}

impl ProxyRecord {
    /// Create a new record with an unmeasured delay.
    ///
    /// No validation is performed; empty strings are accepted.
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        kind: ProxyKind,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            subtitle: subtitle.into(),
            kind,
            delay: DELAY_UNMEASURED,
        }
    }

    /// Return a copy of this record carrying `delay`.
    pub fn with_delay(&self, delay: i32) -> Self {
        Self {
            delay,
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn kind(&self) -> ProxyKind {
        self.kind
    }

    pub fn delay(&self) -> i32 {
        self.delay
    }

    /// Whether this record is a selection group
    pub fn is_group(&self) -> bool {
        self.kind.is_group()
    }

    /// Whether a latency has been recorded.
    ///
    /// A measured latency of exactly 0ms cannot be told apart from "unmeasured".
    pub fn is_measured(&self) -> bool {
        self.delay > DELAY_UNMEASURED
    }
}
