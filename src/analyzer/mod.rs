//! Semantic analysis module.
//!
//! This module drives the three analysis passes over a parsed program:
//!
//! - Hierarchy validation through the class table (registration,
//!   cycles, parent existence, `Main`/`main`)
//! - Per-class declaration checks (field and method well-formedness,
//!   override compatibility along the ancestor chain)
//! - Recursive expression typing with scoped identifier resolution
//!
//! Every rule violation is recorded as a located diagnostic and the
//! traversal continues with a recovery type, so one broken expression
//! never hides the rest of the program's errors. On success every
//! expression node carries its resolved static type.

pub mod analyzer;
