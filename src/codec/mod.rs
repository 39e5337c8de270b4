//! Encoders and decoders for [`ProxyRecord`](crate::models::ProxyRecord)
//!
//! Two formats are provided:
//!
//! * [`text`] - a self-describing document (JSON, YAML or TOML) for
//!   configuration files, logs and loosely coupled APIs.
//! * [`binary`] - a fixed-order, untagged layout for transfer between
//!   processes running the same version of this crate.

pub mod binary;
pub mod text;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use text::{TextCodec, TextFormat};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unknown proxy kind {0:?}")]
    UnknownKind(String),

    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("text serialization failed: {0}")]
    Text(String),

    #[error("field `{field}` is too long to encode ({len} bytes)")]
    FieldTooLong { field: &'static str, len: usize },
}

/// How the text codec treats a `kind` tag it does not recognise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKindPolicy {
    /// Coerce the tag to `ProxyKind::Unknown`
    #[default]
    Lenient,
    /// Fail with `DecodeError::UnknownKind`
    Strict,
}

impl UnknownKindPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnknownKindPolicy::Lenient => "lenient",
            UnknownKindPolicy::Strict => "strict",
        }
    }
}
