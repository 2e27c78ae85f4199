//! Top-level display driver plus a fake host for offline simulation.

pub mod engine;
pub mod simulator;
