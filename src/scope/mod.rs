//! Lexical scope handling for the analyzer.
//!
//! This module contains the scope stack used while walking class,
//! method, block and let bodies. It handles:
//!
//! - Entering and leaving nested scopes in LIFO order
//! - Binding identifier names to their declared types
//! - Shadowed lookup, innermost binding first
//! - Restoring outer bindings exactly when a scope is left

pub mod scope;
