//! Client-side application state.
//!
//! State is split by domain so consumers can depend on small focused
//! models; auth is the only domain this crate owns.

pub mod auth;
