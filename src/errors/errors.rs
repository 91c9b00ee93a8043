//! Semantic diagnostics.
//!
//! Analysis never aborts on a rule violation: each one is recorded as a
//! [`Diagnostic`] in a [`Diagnostics`] collector and the traversal
//! continues with a recovery type. The program is rejected when at least
//! one diagnostic was recorded.

use thiserror::Error;

use crate::{ast::types::Type, Position};

/// A located semantic error.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    kind: SemanticErrorKind,
    position: Position,
}

impl Diagnostic {
    pub fn new(kind: SemanticErrorKind, position: Position) -> Self {
        Diagnostic { kind, position }
    }

    pub fn kind(&self) -> &SemanticErrorKind {
        &self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// The human-readable message, without location prefix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Renders the diagnostic in the reporting format expected by the
    /// driver: `<source-name>:<line>:<column>: semantic error: <message>`.
    pub fn render(&self, source_name: &str) -> String {
        format!(
            "{}:{}: semantic error: {}",
            source_name, self.position, self.kind
        )
    }
}

/// Append-only diagnostic collector threaded through every pass.
#[derive(Debug, Default)]
pub struct Diagnostics {
    list: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn report(&mut self, kind: SemanticErrorKind, position: Position) {
        self.list.push(Diagnostic::new(kind, position));
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.list.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.list
    }
}

/// The closed set of semantic error kinds.
#[derive(Error, Debug, Clone)]
pub enum SemanticErrorKind {
    // Structural errors
    #[error("class {class:?} is defined more than once")]
    DuplicateClass { class: String },
    #[error("class cannot be named {class:?}")]
    ReservedClassName { class: String },
    #[error("parent class {parent:?} of class {class:?} is not defined")]
    UndefinedParent { class: String, parent: String },
    #[error("cyclic inheritance involving class {class:?}")]
    CyclicInheritance { class: String },
    #[error("no class 'Main' defined")]
    MissingMainClass,
    #[error("class 'Main' must have a 'main' method with no formals and return type int32")]
    InvalidMainMethod,

    // Declaration errors
    #[error("field {field:?} is defined more than once in class {class:?}")]
    DuplicateField { field: String, class: String },
    #[error("method {method:?} is defined more than once in class {class:?}")]
    DuplicateMethod { method: String, class: String },
    #[error("field {field:?} redefines a field of ancestor {ancestor:?} with a different type")]
    FieldRedefinition { field: String, ancestor: String },
    #[error("type {name:?} does not exist")]
    UnknownType { name: String },
    #[error("override of method {method:?} changes return type from {expected} to {found}")]
    OverrideReturnMismatch {
        method: String,
        expected: Type,
        found: Type,
    },
    #[error("override of method {method:?} takes {found} formals, but its ancestor takes {expected}")]
    OverrideArityMismatch {
        method: String,
        expected: usize,
        found: usize,
    },
    #[error("override of method {method:?} changes formal {formal:?}")]
    OverrideFormalMismatch { method: String, formal: String },

    // Scope errors
    #[error("method {method:?} has several formals named {formal:?}")]
    DuplicateFormal { method: String, formal: String },
    #[error("use of undeclared identifier {name:?}")]
    UndeclaredIdentifier { name: String },
    #[error("assignment to undeclared variable {name:?}")]
    AssignToUndeclared { name: String },

    // Type errors
    #[error("method {method:?} returns {found}, but declares return type {expected}")]
    ReturnTypeMismatch {
        method: String,
        expected: Type,
        found: Type,
    },
    #[error("condition must be of type bool, found {found}")]
    ConditionNotBool { found: Type },
    #[error("conditional branches have incompatible types {then_ty} and {else_ty}")]
    BranchTypeMismatch { then_ty: Type, else_ty: Type },
    #[error("operator {op:?} expects {expected} operands, found {left} and {right}")]
    BinaryOperandMismatch {
        op: String,
        expected: Type,
        left: Type,
        right: Type,
    },
    #[error("operands of '=' have different types {left} and {right}")]
    EqualityOperandMismatch { left: Type, right: Type },
    #[error("operator {op:?} expects a {expected} operand, found {found}")]
    UnaryOperandMismatch {
        op: String,
        expected: Type,
        found: Type,
    },
    #[error("field {field:?} has type {expected}, but its initializer has type {found}")]
    FieldInitMismatch {
        field: String,
        expected: Type,
        found: Type,
    },
    #[error("let binding {name:?} has type {expected}, but its initializer has type {found}")]
    LetInitMismatch {
        name: String,
        expected: Type,
        found: Type,
    },
    #[error("cannot assign {found} to {name:?} of type {expected}")]
    AssignTypeMismatch {
        name: String,
        expected: Type,
        found: Type,
    },
    #[error("type {receiver} has no method {method:?}")]
    MethodNotFound { method: String, receiver: Type },
    #[error("call to {method:?} expects {expected} arguments, received {found}")]
    WrongArgumentCount {
        method: String,
        expected: usize,
        found: usize,
    },
    #[error("argument {index} of call to {method:?} has type {found}, expected {expected}")]
    ArgumentTypeMismatch {
        method: String,
        index: usize,
        expected: Type,
        found: Type,
    },
    #[error("cannot instantiate undefined class {class:?}")]
    UnknownClass { class: String },
}

impl SemanticErrorKind {
    /// Stable name of the error kind, independent of its message fields.
    pub fn name(&self) -> &'static str {
        match self {
            SemanticErrorKind::DuplicateClass { .. } => "DuplicateClass",
            SemanticErrorKind::ReservedClassName { .. } => "ReservedClassName",
            SemanticErrorKind::UndefinedParent { .. } => "UndefinedParent",
            SemanticErrorKind::CyclicInheritance { .. } => "CyclicInheritance",
            SemanticErrorKind::MissingMainClass => "MissingMainClass",
            SemanticErrorKind::InvalidMainMethod => "InvalidMainMethod",
            SemanticErrorKind::DuplicateField { .. } => "DuplicateField",
            SemanticErrorKind::DuplicateMethod { .. } => "DuplicateMethod",
            SemanticErrorKind::FieldRedefinition { .. } => "FieldRedefinition",
            SemanticErrorKind::UnknownType { .. } => "UnknownType",
            SemanticErrorKind::OverrideReturnMismatch { .. } => "OverrideReturnMismatch",
            SemanticErrorKind::OverrideArityMismatch { .. } => "OverrideArityMismatch",
            SemanticErrorKind::OverrideFormalMismatch { .. } => "OverrideFormalMismatch",
            SemanticErrorKind::DuplicateFormal { .. } => "DuplicateFormal",
            SemanticErrorKind::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
            SemanticErrorKind::AssignToUndeclared { .. } => "AssignToUndeclared",
            SemanticErrorKind::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            SemanticErrorKind::ConditionNotBool { .. } => "ConditionNotBool",
            SemanticErrorKind::BranchTypeMismatch { .. } => "BranchTypeMismatch",
            SemanticErrorKind::BinaryOperandMismatch { .. } => "BinaryOperandMismatch",
            SemanticErrorKind::EqualityOperandMismatch { .. } => "EqualityOperandMismatch",
            SemanticErrorKind::UnaryOperandMismatch { .. } => "UnaryOperandMismatch",
            SemanticErrorKind::FieldInitMismatch { .. } => "FieldInitMismatch",
            SemanticErrorKind::LetInitMismatch { .. } => "LetInitMismatch",
            SemanticErrorKind::AssignTypeMismatch { .. } => "AssignTypeMismatch",
            SemanticErrorKind::MethodNotFound { .. } => "MethodNotFound",
            SemanticErrorKind::WrongArgumentCount { .. } => "WrongArgumentCount",
            SemanticErrorKind::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            SemanticErrorKind::UnknownClass { .. } => "UnknownClass",
        }
    }
}
