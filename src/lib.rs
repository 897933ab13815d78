//! Typed request models for the NSK airline reservation API.
//!
//! Every request type implements [`ApiRequest`]: it serializes itself into a
//! JSON payload and checks that payload against the upstream contract before
//! anything is sent. [`NskClient`] ties validation to a [`Transport`].

pub mod client;
pub mod error;
pub mod formats;
pub mod request;
pub mod requests;
pub mod structural;

// Re-export key types for convenience
pub use client::{ClientConfig, HttpTransport, NskClient, Transport};
pub use error::{ApiError, FieldViolation, ValidationError, VALIDATION_ERROR_CODE};
pub use formats::{FieldFormat, UnknownFormat};
pub use request::{ApiRequest, Endpoint, HttpMethod, Payload};
pub use requests::*;
