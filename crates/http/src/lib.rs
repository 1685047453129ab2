//! Agendify HTTP client
//!
//! [`client::AgendifyClient`] wraps every outbound call to the Agendify API:
//! it attaches the held bearer credential to each request and reports
//! authentication rejections to a single registered hook, so session expiry
//! is detected in one place instead of in every caller.

pub mod client;
pub mod types;

pub use client::{AgendifyClient, AgendifyClientBuilder, error::ClientError};
