//! mediaconv - single-file and batch media conversion using ffmpeg
//!
//! The encoder is an external binary. This crate builds its argument vectors,
//! picks collision-free output names and runs batches sequentially with
//! per-item failure isolation.

pub mod allocator;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod job;
pub mod media;
pub mod report;
pub mod scan;
pub mod stream;
pub mod workflow;
