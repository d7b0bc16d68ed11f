// Copyright 2026 imdb-reviews contributors
// SPDX-License-Identifier: MIT

//! imdb-reviews CLI library — browser renderer, review collector, and the
//! run entry point behind the `imdb-reviews` binary.
//!
//! This library crate exposes the modules for integration testing.

pub mod app;
pub mod collector;
pub mod config;
pub mod progress;
pub mod renderer;

pub use app::{run, RunReport};
pub use collector::{Collector, CollectorConfig};
pub use config::Settings;
