//! Builds WireGuard configurations from a server identity and a list of peers.
//!
//! A [`session::Session`] owns everything the operator entered and keeps the rendered
//! configuration text up to date after every change. Key material produced by
//! [`keys::KeyMaterialGenerator`] is simulated and must not be used for a real tunnel.

pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod keys;
pub mod net;
pub mod notice;
pub mod peers;
pub mod render;
pub mod session;
pub mod storage;

pub use error::Error;
