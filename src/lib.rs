pub mod codec;
pub mod models;
pub mod settings;
pub mod utils;

// Re-export the main proxy types for easier access
pub use models::{ProxyKind, ProxyRecord};

// Re-export codec and settings types
pub use codec::{DecodeError, EncodeError, TextCodec, TextFormat, UnknownKindPolicy};
pub use settings::Settings;
