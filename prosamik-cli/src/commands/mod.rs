//! Command implementations for the prosamik CLI

pub mod serve;

pub use serve::run_serve;
