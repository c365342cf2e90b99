//! Readers for the external input formats consumed by the engine.

pub mod heights;
