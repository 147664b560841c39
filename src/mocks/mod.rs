//! Test doubles for the HTTP transport.
//!
//! [`MockTransport`] records every request it receives and answers from a
//! queue, a handler closure or a default response, so dispatch behaviour can
//! be tested without a network.

mod transport;

pub use transport::{MockResponse, MockTransport};
