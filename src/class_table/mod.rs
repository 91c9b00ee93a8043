//! Class table and inheritance resolution.
//!
//! This module builds the program-wide class registry and answers every
//! hierarchy question the analyzer asks. It handles:
//!
//! - Registration of class declarations, rejecting duplicate and
//!   reserved names
//! - Cyclic-inheritance detection over the name-based parent graph
//! - Parent-existence and `Main`/`main` structural checks
//! - Ancestry chains and the common-ancestor (subtype join) operation
//! - Method resolution along the ancestor chain
//!
//! The table stores copied signatures indexed by name, never references
//! into the AST, so it can be consulted freely while the analyzer
//! mutates the tree.

pub mod class_table;

#[cfg(test)]
mod tests;
