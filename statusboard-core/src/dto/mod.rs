//! Data Transfer Objects for the backing store
//!
//! Row shapes exchanged with the store's REST interface. They wrap domain
//! types in the envelopes the tables use and carry no logic of their own.

pub mod history;
pub mod state;
