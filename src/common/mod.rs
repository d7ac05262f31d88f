//! Common utility modules shared across the crate

pub mod fs;
