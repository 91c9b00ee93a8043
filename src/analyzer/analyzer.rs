use std::collections::HashSet;
use std::rc::Rc;

use crate::{
    ast::{
        ast::{ClassDecl, FieldDecl, MethodDecl, Program},
        expressions::{BinOp, Expr, ExprKind, UnOp},
        types::Type,
    },
    class_table::class_table::{ClassTable, MethodSig},
    errors::errors::{Diagnostic, Diagnostics, SemanticErrorKind},
    scope::scope::ScopeStack,
    Position,
};

/// Outcome of analyzing a program.
///
/// The program is accepted when no diagnostic was recorded; the tree
/// passed to [`analyze`] then carries a resolved type on every
/// expression node and is ready for code generation.
#[derive(Debug)]
pub struct AnalysisResult {
    source_name: Rc<String>,
    diagnostics: Vec<Diagnostic>,
}

impl AnalysisResult {
    pub fn is_accepted(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics in the order they were recorded.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Driver-facing messages, one per diagnostic:
    /// `<source-name>:<line>:<column>: semantic error: <message>`.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .map(|diagnostic| diagnostic.render(&self.source_name))
            .collect()
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }
}

/// Runs semantic analysis over a parsed program.
///
/// The tree is annotated in place; the returned result carries the
/// verdict and the collected diagnostics.
pub fn analyze(program: &mut Program) -> AnalysisResult {
    let mut diagnostics = Diagnostics::new();

    let class_table = ClassTable::build(&program.classes, &mut diagnostics);
    class_table.check_cycles(&mut diagnostics);
    class_table.check_parents_exist(&mut diagnostics);
    class_table.check_main(&mut diagnostics);

    let mut analyzer = SemanticAnalyzer {
        class_table,
        scopes: ScopeStack::new(),
        diagnostics,
        current_class: String::new(),
    };

    for index in 0..program.classes.len() {
        // Only the registered (first) declaration of a name is analyzed;
        // a duplicate was already reported during registration.
        let authoritative = analyzer
            .class_table
            .get(&program.classes[index].name)
            .map(|info| info.decl_index == Some(index))
            .unwrap_or(false);
        if authoritative {
            analyzer.check_class(&mut program.classes[index]);
        }
    }

    AnalysisResult {
        source_name: Rc::clone(&program.source_name),
        diagnostics: analyzer.diagnostics.into_vec(),
    }
}

/// Semantic Analyzer
///
/// Walks the declarations and expression trees of one program, resolving
/// identifiers through the scope stack and types through the class
/// table, and accumulating diagnostics without ever aborting a pass.
pub struct SemanticAnalyzer {
    class_table: ClassTable,
    scopes: ScopeStack,
    diagnostics: Diagnostics,
    /// Name of the class whose declarations are being checked; gives
    /// `self` its type and anchors method resolution for self calls.
    current_class: String,
}

impl SemanticAnalyzer {
    fn report(&mut self, kind: SemanticErrorKind, position: Position) {
        self.diagnostics.report(kind, position);
    }

    /// Whether `actual` may be used where `expected` is required:
    /// equality for primitives, ancestry for class types.
    fn conforms(&self, expected: &Type, actual: &Type) -> bool {
        if expected == actual {
            return true;
        }
        match (expected.class_name(), actual.class_name()) {
            (Some(expected_class), Some(actual_class)) => self
                .class_table
                .common_ancestor(expected_class, actual_class)
                .as_deref()
                == Some(expected_class),
            _ => false,
        }
    }

    /// Declaration checks for one class, then its method bodies.
    fn check_class(&mut self, class: &mut ClassDecl) {
        let class_name = class.name.clone();
        self.current_class = class_name.clone();
        self.scopes.enter_scope();

        // Bind inherited fields first, root-most ancestor down, so the
        // class's own declarations shadow them and method bodies can
        // reach every field of the chain.
        let inherited: Vec<(String, Type)> = self
            .class_table
            .ancestry(&class_name)
            .into_iter()
            .skip(1)
            .rev()
            .flat_map(|ancestor| {
                self.class_table
                    .get(ancestor)
                    .map(|info| {
                        info.fields
                            .iter()
                            .map(|field| (field.name.clone(), field.ty.clone()))
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default()
            })
            .collect();
        for (name, ty) in inherited {
            self.scopes.declare(&name, ty);
        }

        let mut seen_fields: HashSet<String> = HashSet::new();
        for field in &class.fields {
            if !seen_fields.insert(field.name.clone()) {
                self.report(
                    SemanticErrorKind::DuplicateField {
                        field: field.name.clone(),
                        class: class_name.clone(),
                    },
                    field.position,
                );
                continue;
            }
            self.check_field_decl(&class_name, field);
            self.scopes.declare(&field.name, field.ty.clone());
        }

        // Initializers are typed once every field of the class is bound.
        for field in &mut class.fields {
            if let Some(init) = &mut field.init {
                let init_ty = self.check_expression(init);
                if !self.conforms(&field.ty, &init_ty) {
                    let position = init.position;
                    self.report(
                        SemanticErrorKind::FieldInitMismatch {
                            field: field.name.clone(),
                            expected: field.ty.clone(),
                            found: init_ty,
                        },
                        position,
                    );
                }
            }
        }

        let mut seen_methods: HashSet<String> = HashSet::new();
        for method in &mut class.methods {
            if !seen_methods.insert(method.name.clone()) {
                self.report(
                    SemanticErrorKind::DuplicateMethod {
                        method: method.name.clone(),
                        class: class_name.clone(),
                    },
                    method.position,
                );
            }
            self.check_override(method);
            self.check_method(method);
        }

        self.scopes.exit_scope();
    }

    /// Field-level declaration checks: the declared type must exist, and
    /// the nearest ancestor declaring a field of the same name must
    /// declare it with the same type.
    fn check_field_decl(&mut self, class_name: &str, field: &FieldDecl) {
        if let Some(type_name) = field.ty.class_name() {
            if !self.class_table.contains(type_name) {
                self.report(
                    SemanticErrorKind::UnknownType {
                        name: type_name.to_string(),
                    },
                    field.position,
                );
            }
        }

        let ancestor_field: Option<(String, Type)> = {
            let mut hit = None;
            for ancestor in self.class_table.ancestry(class_name).into_iter().skip(1) {
                if let Some(sig) = self
                    .class_table
                    .get(ancestor)
                    .and_then(|info| info.field(&field.name))
                {
                    hit = Some((ancestor.to_string(), sig.ty.clone()));
                    break;
                }
            }
            hit
        };
        if let Some((ancestor, ancestor_ty)) = ancestor_field {
            if ancestor_ty != field.ty {
                self.report(
                    SemanticErrorKind::FieldRedefinition {
                        field: field.name.clone(),
                        ancestor,
                    },
                    field.position,
                );
            }
        }
    }

    /// Override-compatibility check: every ancestor method sharing the
    /// name must agree on return type, arity, and formal names and types
    /// in order.
    fn check_override(&mut self, method: &MethodDecl) {
        let ancestor_sigs: Vec<MethodSig> = self
            .class_table
            .ancestry(&self.current_class)
            .into_iter()
            .skip(1)
            .filter_map(|ancestor| {
                self.class_table
                    .get(ancestor)
                    .and_then(|info| info.method(&method.name))
                    .cloned()
            })
            .collect();

        for ancestor_sig in ancestor_sigs {
            if ancestor_sig.return_ty != method.return_ty {
                self.report(
                    SemanticErrorKind::OverrideReturnMismatch {
                        method: method.name.clone(),
                        expected: ancestor_sig.return_ty.clone(),
                        found: method.return_ty.clone(),
                    },
                    method.position,
                );
            }
            if ancestor_sig.formals.len() != method.formals.len() {
                self.report(
                    SemanticErrorKind::OverrideArityMismatch {
                        method: method.name.clone(),
                        expected: ancestor_sig.formals.len(),
                        found: method.formals.len(),
                    },
                    method.position,
                );
                continue;
            }
            for ((ancestor_name, ancestor_ty), formal) in
                ancestor_sig.formals.iter().zip(&method.formals)
            {
                if *ancestor_name != formal.name || *ancestor_ty != formal.ty {
                    self.report(
                        SemanticErrorKind::OverrideFormalMismatch {
                            method: method.name.clone(),
                            formal: formal.name.clone(),
                        },
                        formal.position,
                    );
                }
            }
        }
    }

    /// Method-level checks: formal validation and binding, then the body
    /// block against the declared return type.
    fn check_method(&mut self, method: &mut MethodDecl) {
        self.scopes.enter_scope();

        let mut seen_formals: HashSet<String> = HashSet::new();
        for formal in &method.formals {
            if let Some(type_name) = formal.ty.class_name() {
                if !self.class_table.contains(type_name) {
                    self.report(
                        SemanticErrorKind::UnknownType {
                            name: type_name.to_string(),
                        },
                        formal.position,
                    );
                }
            }
            if !seen_formals.insert(formal.name.clone()) {
                self.report(
                    SemanticErrorKind::DuplicateFormal {
                        method: method.name.clone(),
                        formal: formal.name.clone(),
                    },
                    formal.position,
                );
                continue;
            }
            self.scopes.declare(&formal.name, formal.ty.clone());
        }

        let body_ty = self.check_expression(&mut method.body);
        if !self.conforms(&method.return_ty, &body_ty) {
            self.report(
                SemanticErrorKind::ReturnTypeMismatch {
                    method: method.name.clone(),
                    expected: method.return_ty.clone(),
                    found: body_ty,
                },
                method.position,
            );
        }

        self.scopes.exit_scope();
    }

    /// Recursive expression typing.
    ///
    /// Computes and writes the node's static type. Rule violations are
    /// reported and analysis continues with a recovery type, so a single
    /// faulty leaf never stops the traversal.
    fn check_expression(&mut self, expr: &mut Expr) -> Type {
        let position = expr.position;
        let ty = match &mut expr.kind {
            ExprKind::IntegerLiteral(_) => Type::Int32,
            ExprKind::StringLiteral(_) => Type::String,
            ExprKind::BooleanLiteral(_) => Type::Bool,

            ExprKind::BinaryOp { op, left, right } => {
                let op = *op;
                let left_ty = self.check_expression(left);
                let right_ty = self.check_expression(right);
                self.check_binary_op(op, left_ty, right_ty, position)
            }

            ExprKind::UnaryOp { op, operand } => {
                let op = *op;
                let operand_ty = self.check_expression(operand);
                self.check_unary_op(op, operand_ty, position)
            }

            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                let cond_position = cond.position;
                let cond_ty = self.check_expression(cond);
                if cond_ty != Type::Bool {
                    self.report(
                        SemanticErrorKind::ConditionNotBool { found: cond_ty },
                        cond_position,
                    );
                }
                let then_ty = self.check_expression(then_expr);
                match else_expr {
                    Some(else_expr) => {
                        let else_ty = self.check_expression(else_expr);
                        self.join_branches(then_ty, else_ty, position)
                    }
                    // A missing else behaves as an implicit (), and a
                    // unit branch makes the whole conditional unit.
                    None => Type::Unit,
                }
            }

            ExprKind::While { cond, body } => {
                let cond_position = cond.position;
                let cond_ty = self.check_expression(cond);
                if cond_ty != Type::Bool {
                    self.report(
                        SemanticErrorKind::ConditionNotBool { found: cond_ty },
                        cond_position,
                    );
                }
                self.check_expression(body);
                Type::Unit
            }

            ExprKind::Block(exprs) => {
                self.scopes.enter_scope();
                let mut last_ty = Type::Unit;
                for sub_expr in exprs.iter_mut() {
                    last_ty = self.check_expression(sub_expr);
                }
                self.scopes.exit_scope();
                last_ty
            }

            ExprKind::Let {
                name,
                declared_ty,
                init,
                body,
            } => {
                if let Some(class_name) = declared_ty.class_name() {
                    if !self.class_table.contains(class_name) {
                        self.report(
                            SemanticErrorKind::UnknownType {
                                name: class_name.to_string(),
                            },
                            position,
                        );
                    }
                }
                // The initializer is typed outside the new scope; the
                // binding is not visible to its own initializer.
                if let Some(init) = init {
                    let init_position = init.position;
                    let init_ty = self.check_expression(init);
                    if !self.conforms(declared_ty, &init_ty) {
                        let expected = declared_ty.clone();
                        let name = name.clone();
                        self.report(
                            SemanticErrorKind::LetInitMismatch {
                                name,
                                expected,
                                found: init_ty,
                            },
                            init_position,
                        );
                    }
                }
                self.scopes.enter_scope();
                let declared = declared_ty.clone();
                self.scopes.declare(name, declared);
                let body_ty = self.check_expression(body);
                self.scopes.exit_scope();
                body_ty
            }

            ExprKind::Assign { name, value } => {
                let value_ty = self.check_expression(value);
                match self.scopes.lookup(name).cloned() {
                    None => {
                        let name = name.clone();
                        self.report(SemanticErrorKind::AssignToUndeclared { name }, position);
                    }
                    Some(bound_ty) => {
                        if !self.conforms(&bound_ty, &value_ty) {
                            let name = name.clone();
                            self.report(
                                SemanticErrorKind::AssignTypeMismatch {
                                    name,
                                    expected: bound_ty,
                                    found: value_ty.clone(),
                                },
                                position,
                            );
                        }
                    }
                }
                value_ty
            }

            ExprKind::Call {
                receiver,
                method,
                args,
            } => {
                let method = method.clone();
                self.check_call(receiver, &method, args, position)
            }

            ExprKind::Identifier(name) => match self.scopes.lookup(name).cloned() {
                Some(ty) => ty,
                None => {
                    let name = name.clone();
                    self.report(SemanticErrorKind::UndeclaredIdentifier { name }, position);
                    Type::Unit
                }
            },

            ExprKind::SelfRef => Type::Class(self.current_class.clone()),

            ExprKind::New(class_name) => {
                if !self.class_table.contains(class_name) {
                    let class = class_name.clone();
                    self.report(SemanticErrorKind::UnknownClass { class }, position);
                }
                Type::Class(class_name.clone())
            }

            ExprKind::Unit => Type::Unit,
        };

        expr.set_type(ty.clone());
        ty
    }

    fn check_binary_op(
        &mut self,
        op: BinOp,
        left_ty: Type,
        right_ty: Type,
        position: Position,
    ) -> Type {
        match op {
            BinOp::Lt | BinOp::Le => {
                if left_ty != Type::Int32 || right_ty != Type::Int32 {
                    self.report(
                        SemanticErrorKind::BinaryOperandMismatch {
                            op: op.to_string(),
                            expected: Type::Int32,
                            left: left_ty,
                            right: right_ty,
                        },
                        position,
                    );
                }
                Type::Bool
            }
            BinOp::Eq => {
                if left_ty != right_ty {
                    self.report(
                        SemanticErrorKind::EqualityOperandMismatch {
                            left: left_ty,
                            right: right_ty,
                        },
                        position,
                    );
                }
                Type::Bool
            }
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                if left_ty != Type::Int32 || right_ty != Type::Int32 {
                    self.report(
                        SemanticErrorKind::BinaryOperandMismatch {
                            op: op.to_string(),
                            expected: Type::Int32,
                            left: left_ty,
                            right: right_ty,
                        },
                        position,
                    );
                }
                Type::Int32
            }
            BinOp::And => {
                if left_ty != Type::Bool || right_ty != Type::Bool {
                    self.report(
                        SemanticErrorKind::BinaryOperandMismatch {
                            op: op.to_string(),
                            expected: Type::Bool,
                            left: left_ty,
                            right: right_ty,
                        },
                        position,
                    );
                }
                Type::Bool
            }
        }
    }

    fn check_unary_op(&mut self, op: UnOp, operand_ty: Type, position: Position) -> Type {
        match op {
            UnOp::IsNull => Type::Bool,
            UnOp::Not => {
                if operand_ty != Type::Bool {
                    self.report(
                        SemanticErrorKind::UnaryOperandMismatch {
                            op: op.to_string(),
                            expected: Type::Bool,
                            found: operand_ty,
                        },
                        position,
                    );
                }
                Type::Bool
            }
            UnOp::Neg => {
                if operand_ty != Type::Int32 {
                    self.report(
                        SemanticErrorKind::UnaryOperandMismatch {
                            op: op.to_string(),
                            expected: Type::Int32,
                            found: operand_ty,
                        },
                        position,
                    );
                }
                Type::Int32
            }
        }
    }

    /// Result type of a two-branch conditional: unit absorbs, class
    /// types join at their common ancestor, primitives must agree.
    fn join_branches(&mut self, then_ty: Type, else_ty: Type, position: Position) -> Type {
        if then_ty == Type::Unit || else_ty == Type::Unit {
            return Type::Unit;
        }
        if !then_ty.is_primitive() && !else_ty.is_primitive() {
            let join = match (then_ty.class_name(), else_ty.class_name()) {
                (Some(then_class), Some(else_class)) => {
                    self.class_table.common_ancestor(then_class, else_class)
                }
                _ => None,
            };
            return match join {
                Some(join) => Type::Class(join),
                // A branch names an unregistered class; that was already
                // reported where the value was produced.
                None => then_ty,
            };
        }
        if then_ty == else_ty {
            then_ty
        } else {
            self.report(
                SemanticErrorKind::BranchTypeMismatch {
                    then_ty: then_ty.clone(),
                    else_ty,
                },
                position,
            );
            then_ty
        }
    }

    /// Call typing: a `self` receiver resolves within the enclosing
    /// class only; any other receiver is typed and the method searched
    /// up its ancestor chain.
    fn check_call(
        &mut self,
        receiver: &mut Expr,
        method: &str,
        args: &mut [Expr],
        position: Position,
    ) -> Type {
        let self_call = matches!(receiver.kind, ExprKind::SelfRef);
        let receiver_ty = self.check_expression(receiver);

        // Arguments are always typed, even when resolution fails below.
        let arg_tys: Vec<Type> = args
            .iter_mut()
            .map(|arg| self.check_expression(arg))
            .collect();
        let arg_positions: Vec<Position> = args.iter().map(|arg| arg.position).collect();

        let sig: Option<MethodSig> = if self_call {
            self.class_table
                .get(&self.current_class)
                .and_then(|info| info.method(method))
                .cloned()
        } else {
            match receiver_ty.class_name() {
                Some(class_name) => self.class_table.resolve_method(class_name, method).cloned(),
                None => None,
            }
        };

        let sig = match sig {
            Some(sig) => sig,
            None => {
                self.report(
                    SemanticErrorKind::MethodNotFound {
                        method: method.to_string(),
                        receiver: receiver_ty,
                    },
                    position,
                );
                return Type::Unit;
            }
        };

        if arg_tys.len() != sig.formals.len() {
            self.report(
                SemanticErrorKind::WrongArgumentCount {
                    method: method.to_string(),
                    expected: sig.formals.len(),
                    found: arg_tys.len(),
                },
                position,
            );
        } else {
            for (index, ((_, formal_ty), arg_ty)) in
                sig.formals.iter().zip(&arg_tys).enumerate()
            {
                if !self.conforms(formal_ty, arg_ty) {
                    self.report(
                        SemanticErrorKind::ArgumentTypeMismatch {
                            method: method.to_string(),
                            index: index + 1,
                            expected: formal_ty.clone(),
                            found: arg_ty.clone(),
                        },
                        arg_positions[index],
                    );
                }
            }
        }

        sig.return_ty.clone()
    }
}
