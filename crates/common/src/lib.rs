//! Shared building blocks for the enterprise directory crates:
//! logging bootstrap, the `{data, message, message_code}` response envelope
//! and small HTTP-facing types.

pub mod response;
pub mod types;

pub mod utils {
    pub mod logging;
}

pub use response::{create_response, message_codes, Envelope};
