//! Core domain types
//!
//! This module contains the structures shared by the dashboard's readers and
//! writers. Live snapshots are owned by the external live-state row; history
//! records are produced only by the archival gatekeeper.

pub mod history;
pub mod pipeline;
