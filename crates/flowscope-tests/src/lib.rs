//! Integration test crate for FlowScope.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the core, flow, and io crates to verify they work
//! together.

#[cfg(test)]
mod formats;

#[cfg(test)]
mod pipeline;
