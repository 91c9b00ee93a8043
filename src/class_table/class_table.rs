use std::collections::{HashMap, HashSet};

use crate::{
    ast::{
        ast::ClassDecl,
        types::{Type, OBJECT_CLASS},
    },
    errors::errors::{Diagnostics, SemanticErrorKind},
    Position,
};

/// Copied signature of a field declaration.
#[derive(Debug, Clone)]
pub struct FieldSig {
    pub name: String,
    pub ty: Type,
}

/// Copied signature of a method declaration.
#[derive(Debug, Clone)]
pub struct MethodSig {
    pub name: String,
    /// Ordered formal parameters as `(name, type)` pairs.
    pub formals: Vec<(String, Type)>,
    pub return_ty: Type,
}

/// One registered class.
///
/// Holds signature copies only; the declaration bodies stay in the
/// `Program` and are reached through `decl_index`.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub name: String,
    /// Parent class name; `None` only for the root `Object` class.
    /// A declaration without an explicit parent is normalized to
    /// `Object` here.
    pub parent: Option<String>,
    pub position: Position,
    /// Index of the declaration in `Program::classes`; `None` for the
    /// implicit `Object`.
    pub decl_index: Option<usize>,
    pub fields: Vec<FieldSig>,
    pub methods: Vec<MethodSig>,
}

impl ClassInfo {
    /// First field of the class with the given name.
    pub fn field(&self, name: &str) -> Option<&FieldSig> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// First method of the class with the given name.
    pub fn method(&self, name: &str) -> Option<&MethodSig> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Two-state DFS mark used by the cycle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Class Table
///
/// Arena of registered classes plus a name-to-index map. Built once from
/// the program's class list and read-only for the rest of analysis. The
/// implicit `Object` root always occupies index 0.
#[derive(Debug)]
pub struct ClassTable {
    classes: Vec<ClassInfo>,
    by_name: HashMap<String, usize>,
}

impl ClassTable {
    /// Builds the table from the program's class declarations, reporting
    /// duplicate and reserved class names. The first declaration of a
    /// name is authoritative; later ones are not registered.
    pub fn build(classes: &[ClassDecl], diagnostics: &mut Diagnostics) -> Self {
        let object = ClassInfo {
            name: OBJECT_CLASS.to_string(),
            parent: None,
            position: Position::start(),
            decl_index: None,
            fields: Vec::new(),
            methods: Vec::new(),
        };
        let mut table = ClassTable {
            classes: vec![object],
            by_name: HashMap::from([(OBJECT_CLASS.to_string(), 0)]),
        };

        for (decl_index, class) in classes.iter().enumerate() {
            table.register(decl_index, class, diagnostics);
        }
        table
    }

    fn register(&mut self, decl_index: usize, class: &ClassDecl, diagnostics: &mut Diagnostics) {
        if Type::is_reserved_name(&class.name) {
            diagnostics.report(
                SemanticErrorKind::ReservedClassName {
                    class: class.name.clone(),
                },
                class.position,
            );
            return;
        }
        if self.by_name.contains_key(&class.name) {
            diagnostics.report(
                SemanticErrorKind::DuplicateClass {
                    class: class.name.clone(),
                },
                class.position,
            );
            return;
        }

        let info = ClassInfo {
            name: class.name.clone(),
            parent: Some(
                class
                    .parent
                    .clone()
                    .unwrap_or_else(|| OBJECT_CLASS.to_string()),
            ),
            position: class.position,
            decl_index: Some(decl_index),
            fields: class
                .fields
                .iter()
                .map(|field| FieldSig {
                    name: field.name.clone(),
                    ty: field.ty.clone(),
                })
                .collect(),
            methods: class
                .methods
                .iter()
                .map(|method| MethodSig {
                    name: method.name.clone(),
                    formals: method
                        .formals
                        .iter()
                        .map(|formal| (formal.name.clone(), formal.ty.clone()))
                        .collect(),
                    return_ty: method.return_ty.clone(),
                })
                .collect(),
        };

        self.by_name.insert(class.name.clone(), self.classes.len());
        self.classes.push(info);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ClassInfo> {
        self.by_name.get(name).map(|&index| &self.classes[index])
    }

    pub fn classes(&self) -> &[ClassInfo] {
        &self.classes
    }

    /// Depth-first cycle detection over parent links.
    ///
    /// Each class is walked once with a two-state mark; revisiting an
    /// in-progress class reports it as cyclic and stops that chain, the
    /// remaining classes are still checked.
    pub fn check_cycles(&self, diagnostics: &mut Diagnostics) {
        let mut marks: HashMap<&str, Mark> = HashMap::new();
        for info in &self.classes {
            self.visit(&info.name, &mut marks, diagnostics);
        }
    }

    fn visit<'a>(
        &'a self,
        name: &'a str,
        marks: &mut HashMap<&'a str, Mark>,
        diagnostics: &mut Diagnostics,
    ) {
        match marks.get(name) {
            Some(Mark::Done) => return,
            Some(Mark::InProgress) => {
                let position = self
                    .get(name)
                    .map(|info| info.position)
                    .unwrap_or_else(Position::start);
                diagnostics.report(
                    SemanticErrorKind::CyclicInheritance {
                        class: name.to_string(),
                    },
                    position,
                );
                return;
            }
            None => {}
        }

        marks.insert(name, Mark::InProgress);
        if let Some(info) = self.get(name) {
            if let Some(parent) = &info.parent {
                if self.contains(parent) {
                    self.visit(parent, marks, diagnostics);
                }
            }
        }
        marks.insert(name, Mark::Done);
    }

    /// Every declared parent must name a registered class.
    pub fn check_parents_exist(&self, diagnostics: &mut Diagnostics) {
        for info in &self.classes {
            if let Some(parent) = &info.parent {
                if !self.contains(parent) {
                    diagnostics.report(
                        SemanticErrorKind::UndefinedParent {
                            class: info.name.clone(),
                            parent: parent.clone(),
                        },
                        info.position,
                    );
                }
            }
        }
    }

    /// A class `Main` must exist and itself declare a method `main` with
    /// no formals returning `int32`.
    pub fn check_main(&self, diagnostics: &mut Diagnostics) {
        let main = match self.get("Main") {
            Some(info) => info,
            None => {
                diagnostics.report(SemanticErrorKind::MissingMainClass, Position::start());
                return;
            }
        };

        let has_main_method = main
            .methods
            .iter()
            .any(|m| m.name == "main" && m.formals.is_empty() && m.return_ty == Type::Int32);
        if !has_main_method {
            diagnostics.report(SemanticErrorKind::InvalidMainMethod, main.position);
        }
    }

    /// Ordered chain from `name` up to the root.
    ///
    /// Guarded against cyclic parent links: no class appears twice, so
    /// the walk terminates even on a hierarchy that failed the cycle
    /// check. Unknown names yield an empty chain.
    pub fn ancestry(&self, name: &str) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.get(name);
        while let Some(info) = current {
            if !seen.insert(info.name.as_str()) {
                break;
            }
            chain.push(info.name.as_str());
            current = info.parent.as_deref().and_then(|parent| self.get(parent));
        }
        chain
    }

    /// Most specific common ancestor of two classes: the join in the
    /// subtype lattice.
    ///
    /// Both ancestry chains are reversed to start at the root and walked
    /// forward while they agree; the last agreeing class is the join.
    /// `common_ancestor(a, a) == a`, and any two registered classes join
    /// at least at `Object`. `None` is only returned for unknown names.
    pub fn common_ancestor(&self, a: &str, b: &str) -> Option<String> {
        let mut chain_a = self.ancestry(a);
        let mut chain_b = self.ancestry(b);
        chain_a.reverse();
        chain_b.reverse();

        let mut join = None;
        for (x, y) in chain_a.iter().zip(chain_b.iter()) {
            if x == y {
                join = Some(*x);
            } else {
                break;
            }
        }
        join.map(str::to_string)
    }

    /// Resolves `method` by walking `class`'s ancestor chain from the
    /// class itself towards the root; the nearest definition wins.
    pub fn resolve_method(&self, class: &str, method: &str) -> Option<&MethodSig> {
        for ancestor in self.ancestry(class) {
            if let Some(sig) = self.get(ancestor).and_then(|info| info.method(method)) {
                return Some(sig);
            }
        }
        None
    }
}
