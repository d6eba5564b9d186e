//! # letscloud-core
//!
//! Request pipeline shared by the LetsCloud client crates.
//!
//! This crate builds authenticated requests, sends them, and classifies every
//! outcome into a single [`Error`] type.
//!
//! ## Modules
//!
//! - [`config`] - Client configuration (API key, base URL, timeout, debug flag)
//! - [`transport`] - The [`Requester`] seam and its `reqwest` implementation
//! - [`envelope`] - Decoding of the `{success, message, data}` response envelope
//! - [`error`] - Error taxonomy and conversions

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod envelope;
pub mod error;
pub mod transport;

// Re-export commonly used types
pub use config::ClientConfig;
pub use envelope::Envelope;
pub use error::{Error, Result};
pub use transport::{HttpRequester, Requester};
