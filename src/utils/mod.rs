pub mod base64;

pub use base64::{payload_decode, payload_encode};
