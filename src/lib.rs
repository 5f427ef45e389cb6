//! Media download backend.
//!
//! Accepts a source URL, acquires the underlying asset through yt-dlp,
//! normalizes its container with ffmpeg where needed, and serves the
//! result as a one-shot download. Jobs live only in process memory and
//! are driven by a small fixed worker pool.

pub mod app;
pub mod common;
pub mod config;
pub mod docs;
pub mod infrastructure;
pub mod modules;
pub mod routes;
pub mod state;
pub mod workers;
