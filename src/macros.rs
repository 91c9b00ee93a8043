//! Utility macros for the analyzer.
//!
//! This module defines helper macros used when constructing AST nodes:
//!
//! - `MK_EXPR!` - Creates an Expr instance with an unset type slot
//!
//! Parsing is external to this crate, so test code builds expression
//! trees directly; the macro keeps that construction short.

/// Creates an Expr instance with an unresolved type slot.
///
/// # Arguments
///
/// * `$kind` - The ExprKind
/// * `$line` - 1-based source line
/// * `$column` - 1-based source column
///
/// # Example
///
/// ```ignore
/// let expr = MK_EXPR!(ExprKind::IntegerLiteral(42), 3, 9);
/// ```
#[macro_export]
macro_rules! MK_EXPR {
    ($kind:expr, $line:expr, $column:expr) => {
        $crate::ast::expressions::Expr::new($kind, $crate::Position::new($line, $column))
    };
}
