//! Shared type definitions for relgraph
//!
//! This crate provides the definitions used across the relgraph crates:
//!
//! - [`Dialect`] - Database dialect enum (Default, H2, HSQLDB, SQLite, PostgreSQL)
//! - [`PrimitiveKind`] - Protocol primitive types (`Edm.String`, `Edm.Int32`, ...)
//!
//! # Features
//!
//! - `std` - Standard library support (enabled by default)
//! - `serde` - Enable serde serialization/deserialization

#![cfg_attr(not(feature = "std"), no_std)]

mod dialect;
mod primitive;

pub use dialect::{Dialect, DialectParseError};
pub use primitive::PrimitiveKind;

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::{Dialect, PrimitiveKind};
}
