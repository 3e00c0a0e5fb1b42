//! Rocket Cart Core - Shared cart types library.
//!
//! This crate provides the types used across all Rocket Cart components:
//! - `rocket-cart` - The cart store and its collaborators
//! - `cli` - Command-line driver for a file-backed cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, quantities, prices, line items and cart state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
