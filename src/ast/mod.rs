/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program and declaration nodes (classes, fields, methods)
/// - expressions: Definitions for the expression node kinds
/// - types: Definitions for the Lumen type model
pub mod ast;
pub mod expressions;
pub mod types;
