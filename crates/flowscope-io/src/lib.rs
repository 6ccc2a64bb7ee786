//! FlowScope IO - file collaborators for the flow pipeline.
//!
//! This crate handles:
//! - Grayscale input frames (PGM)
//! - Flow-field output and ground-truth reference files (.flo)
//! - Error metrics against a reference field

pub mod compare;
pub mod error;
pub mod flo;
pub mod pgm;

pub use compare::{average_angular_error, average_endpoint_error};
pub use error::{IoError, Result};
pub use flo::{parse_flo, read_flo, write_flo, FLO_TAG};
pub use pgm::{parse_pgm, read_pgm, write_pgm};
