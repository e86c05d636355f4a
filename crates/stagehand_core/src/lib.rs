//! Core infrastructure for stagehand processes.
//!
//! This crate provides the ambient setup most stagehand binaries need:
//!
//! - [`TracingConfig`] - Installs the `tracing` subscriber
//! - [`TracingFormat`] - Pretty, compact or JSON output
//!
//! # Example
//!
//! ```
//! use stagehand_core::{TracingConfig, TracingFormat};
//!
//! TracingConfig::new()
//!     .with_format(TracingFormat::Json)
//!     .with_env_filter("stagehand_lifecycle=debug,info")
//!     .init();
//! ```
//!
//! # Architecture
//!
//! This crate is part of Layer 1 infrastructure:
//!
//! - **Layer 1** (`stagehand_lifecycle`, `stagehand_core`): Hook orchestration and process setup
//! - **Layer 2** (`stagehand_runtime`): Supervision of a lifecycle from start to shutdown

mod tracing_setup;

pub use tracing_setup::{ParseTracingFormatError, TracingConfig, TracingFormat};
