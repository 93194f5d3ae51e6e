//! Common test utilities and helpers
//!
//! This module provides shared functionality used across integration tests:
//! - Binary path resolution (via `get_nativepack_binary`)
//! - Temporary projects with a fake toolchain on `PATH` (via `helpers`)

pub(crate) mod helpers;

// Re-export get_nativepack_binary for convenient access
pub(crate) use helpers::get_nativepack_binary;
