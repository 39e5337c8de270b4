//! Core data models for the application
//!
//! This module contains the proxy record value type and its kind
//! classification, separated from the codecs that move them across
//! process and format boundaries.
//!
//! # Usage
//!
//! ```rust
//! use proxy_record::models::{ProxyKind, ProxyRecord};
//!
//! let proxy = ProxyRecord::new("hk-01", "Hong Kong 01", "hk.example.com", ProxyKind::Trojan);
//! assert!(!proxy.is_measured());
//!
//! // Records are immutable; a new measurement produces a new record
//! let measured = proxy.with_delay(42);
//! assert_eq!(measured.delay(), 42);
//! assert_eq!(proxy.delay(), 0);
//! ```
//!
//! Or use the re-exports from the crate root:
//!
//! ```rust
//! use proxy_record::ProxyKind;
//!
//! assert!(ProxyKind::URLTest.is_group());
//! assert_eq!(ProxyKind::from_name("Vmess"), Some(ProxyKind::Vmess));
//! ```

mod proxy;
mod proxy_kind;

pub use proxy::*;
pub use proxy_kind::*;
