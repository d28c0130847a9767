//! Statusboard Core
//!
//! Core types and logic for the Statusboard pipeline dashboard.
//!
//! This crate contains:
//! - Domain types: live pipeline snapshots and archived history records
//! - DTOs: row shapes exchanged with the backing store
//! - Projection: per-stage view state derived from a snapshot
//! - Archival: the gatekeeper that turns finished pipelines into history records
//!
//! Everything here is synchronous and free of I/O. Callers own the polling,
//! the clock and the store.

pub mod archival;
pub mod domain;
pub mod dto;
pub mod duration;
pub mod error;
pub mod projection;

pub use error::{CoreError, Result};
