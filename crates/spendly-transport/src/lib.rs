//! Transport boundary for the Spendly backend.
//!
//! This crate owns the two network operations performed on behalf of the
//! conversation controller (`upload_file`, `send_message`) together with
//! their request and response payload types. The controller only depends on
//! the [`TransportClient`] trait, so tests can substitute a mock.

pub mod client;
pub mod payload;

pub use client::{HttpTransport, TransportClient};
pub use payload::{ChatData, ChatResponse, FileUpload, MessagePayload, UploadResponse};
