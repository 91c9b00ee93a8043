//! Error types and error handling for the analyzer.
//!
//! This module defines the diagnostics produced by semantic analysis.
//! It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for structural, declaration, scope and
//!   type errors
//! - The append-only collector the passes report into
//! - Rendering of diagnostics into driver-facing messages

pub mod errors;
