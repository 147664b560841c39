//! Types for Azure Communication Services Email operations.
//!
//! - **email** - the caller-facing [`Mail`] description
//! - **message** - the [`MailMessage`] wire payload derived from it
//! - **responses** - success and error envelopes

mod email;
mod message;
mod responses;

pub use email::*;
pub use message::*;
pub use responses::*;
