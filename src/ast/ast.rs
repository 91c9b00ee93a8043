//! Core declaration nodes of the AST.
//!
//! A [`Program`] owns an ordered list of class declarations; classes own
//! their fields and methods, methods own their formals and body. The
//! whole tree is built once by the external parser and then mutated only
//! through the analyzer's write-once type annotations.

use std::rc::Rc;

use crate::{
    ast::{expressions::Expr, types::Type},
    Position,
};

/// Program
///
/// The root of the ownership tree: every declaration and expression is
/// exclusively owned by its parent below this node.
#[derive(Debug, Clone)]
pub struct Program {
    pub classes: Vec<ClassDecl>,
    /// Name of the source file the program was parsed from, used when
    /// rendering diagnostics.
    pub source_name: Rc<String>,
}

impl Program {
    pub fn new(source_name: Rc<String>) -> Self {
        Program {
            classes: Vec::new(),
            source_name,
        }
    }

    pub fn add_class(&mut self, class: ClassDecl) {
        self.classes.push(class);
    }
}

/// Class Declaration
///
/// A named class with an optional explicit parent. A class without an
/// explicit parent implicitly extends the built-in `Object` class.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub parent: Option<String>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub position: Position,
}

/// Field Declaration
///
/// A named, typed field with an optional initializer expression.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Type,
    pub init: Option<Expr>,
    pub position: Position,
}

/// Method Declaration
///
/// A named method with ordered formal parameters, a declared return type
/// and a block-expression body.
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub formals: Vec<Formal>,
    pub return_ty: Type,
    pub body: Expr,
    pub position: Position,
}

/// Formal Parameter
///
/// One `name : type` entry of a method signature.
#[derive(Debug, Clone)]
pub struct Formal {
    pub name: String,
    pub ty: Type,
    pub position: Position,
}
