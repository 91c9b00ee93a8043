//! Unit tests for the class table and inheritance resolution.

use crate::ast::ast::{ClassDecl, MethodDecl};
use crate::ast::expressions::{Expr, ExprKind};
use crate::ast::types::Type;
use crate::class_table::class_table::ClassTable;
use crate::errors::errors::Diagnostics;
use crate::Position;

fn class(name: &str, parent: Option<&str>) -> ClassDecl {
    ClassDecl {
        name: name.to_string(),
        parent: parent.map(str::to_string),
        fields: Vec::new(),
        methods: Vec::new(),
        position: Position::new(1, 1),
    }
}

fn method(name: &str, formals: Vec<(&str, Type)>, return_ty: Type) -> MethodDecl {
    MethodDecl {
        name: name.to_string(),
        formals: formals
            .into_iter()
            .map(|(formal_name, ty)| crate::ast::ast::Formal {
                name: formal_name.to_string(),
                ty,
                position: Position::new(1, 1),
            })
            .collect(),
        return_ty,
        body: Expr::new(ExprKind::Block(Vec::new()), Position::new(1, 1)),
        position: Position::new(1, 1),
    }
}

fn main_class() -> ClassDecl {
    let mut main = class("Main", None);
    main.methods.push(method("main", Vec::new(), Type::Int32));
    main
}

#[test]
fn test_register_classes() {
    let classes = vec![main_class(), class("A", None)];
    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);

    assert!(diagnostics.is_empty());
    assert!(table.contains("Object"));
    assert!(table.contains("Main"));
    assert!(table.contains("A"));
    assert!(!table.contains("B"));
}

#[test]
fn test_duplicate_class_reported_and_first_kept() {
    let mut second = class("A", None);
    second.methods.push(method("extra", Vec::new(), Type::Unit));
    let classes = vec![class("A", None), second];

    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.iter().next().unwrap().kind().name(), "DuplicateClass");
    // The first declaration (no methods) is the registered one.
    assert!(table.get("A").unwrap().methods.is_empty());
}

#[test]
fn test_reserved_class_names_rejected() {
    let classes = vec![class("int32", None), class("Object", None)];
    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);

    assert_eq!(diagnostics.len(), 2);
    for diagnostic in diagnostics.iter() {
        assert_eq!(diagnostic.kind().name(), "ReservedClassName");
    }
    // Object stays the implicit root, not the user declaration.
    assert!(table.get("Object").unwrap().decl_index.is_none());
}

#[test]
fn test_cycle_between_two_classes() {
    let classes = vec![class("A", Some("B")), class("B", Some("A"))];
    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);
    table.check_cycles(&mut diagnostics);

    assert_eq!(diagnostics.len(), 1);
    let diagnostic = diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.kind().name(), "CyclicInheritance");
    // The reported class is on the cycle.
    assert!(diagnostic.message().contains("\"A\"") || diagnostic.message().contains("\"B\""));
}

#[test]
fn test_class_extending_itself_is_cyclic() {
    let classes = vec![class("A", Some("A"))];
    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);
    table.check_cycles(&mut diagnostics);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.iter().next().unwrap().kind().name(), "CyclicInheritance");
}

#[test]
fn test_cycle_does_not_abort_other_classes() {
    let classes = vec![
        class("A", Some("B")),
        class("B", Some("A")),
        class("C", None),
    ];
    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);
    table.check_cycles(&mut diagnostics);

    // One cycle report; C still checks out fine.
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(table.ancestry("C"), vec!["C", "Object"]);
}

#[test]
fn test_undefined_parent_reported() {
    let classes = vec![class("A", Some("Ghost"))];
    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);
    table.check_parents_exist(&mut diagnostics);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.iter().next().unwrap().kind().name(), "UndefinedParent");
}

#[test]
fn test_implicit_parent_is_object() {
    let classes = vec![class("A", None)];
    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);
    table.check_parents_exist(&mut diagnostics);

    assert!(diagnostics.is_empty());
    assert_eq!(table.get("A").unwrap().parent.as_deref(), Some("Object"));
}

#[test]
fn test_missing_main_class() {
    let classes = vec![class("A", None)];
    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);
    table.check_main(&mut diagnostics);

    assert_eq!(diagnostics.len(), 1);
    let diagnostic = diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.kind().name(), "MissingMainClass");
    assert_eq!(diagnostic.position(), Position::new(1, 1));
}

#[test]
fn test_main_method_with_wrong_signature() {
    let mut main = class("Main", None);
    main.methods
        .push(method("main", vec![("arg", Type::Int32)], Type::Int32));
    let classes = vec![main];

    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);
    table.check_main(&mut diagnostics);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.iter().next().unwrap().kind().name(), "InvalidMainMethod");
}

#[test]
fn test_main_method_with_wrong_return_type() {
    let mut main = class("Main", None);
    main.methods.push(method("main", Vec::new(), Type::Unit));
    let classes = vec![main];

    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);
    table.check_main(&mut diagnostics);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.iter().next().unwrap().kind().name(), "InvalidMainMethod");
}

#[test]
fn test_valid_main_accepted() {
    let classes = vec![main_class()];
    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);
    table.check_main(&mut diagnostics);

    assert!(diagnostics.is_empty());
}

#[test]
fn test_ancestry_chain_order() {
    let classes = vec![
        class("Animal", None),
        class("Dog", Some("Animal")),
        class("Puppy", Some("Dog")),
    ];
    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);

    assert_eq!(table.ancestry("Puppy"), vec!["Puppy", "Dog", "Animal", "Object"]);
    assert_eq!(table.ancestry("Object"), vec!["Object"]);
    assert!(table.ancestry("Ghost").is_empty());
}

#[test]
fn test_common_ancestor_is_reflexive() {
    let classes = vec![class("A", None)];
    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);

    assert_eq!(table.common_ancestor("A", "A"), Some("A".to_string()));
}

#[test]
fn test_common_ancestor_with_root() {
    let classes = vec![class("A", None)];
    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);

    assert_eq!(table.common_ancestor("A", "Object"), Some("Object".to_string()));
    assert_eq!(table.common_ancestor("Object", "A"), Some("Object".to_string()));
}

#[test]
fn test_common_ancestor_is_symmetric() {
    let classes = vec![
        class("Animal", None),
        class("Dog", Some("Animal")),
        class("Cat", Some("Animal")),
    ];
    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);

    assert_eq!(table.common_ancestor("Dog", "Cat"), Some("Animal".to_string()));
    assert_eq!(
        table.common_ancestor("Dog", "Cat"),
        table.common_ancestor("Cat", "Dog")
    );
}

#[test]
fn test_common_ancestor_of_ancestor_and_descendant() {
    let classes = vec![
        class("Animal", None),
        class("Dog", Some("Animal")),
        class("Puppy", Some("Dog")),
    ];
    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);

    assert_eq!(
        table.common_ancestor("Puppy", "Animal"),
        Some("Animal".to_string())
    );
}

#[test]
fn test_common_ancestor_of_unknown_class() {
    let classes = vec![class("A", None)];
    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);

    assert_eq!(table.common_ancestor("A", "Ghost"), None);
}

#[test]
fn test_resolve_method_walks_ancestors() {
    let mut animal = class("Animal", None);
    animal.methods.push(method("speak", Vec::new(), Type::String));
    let dog = class("Dog", Some("Animal"));
    let classes = vec![animal, dog];

    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);

    let sig = table.resolve_method("Dog", "speak").unwrap();
    assert_eq!(sig.return_ty, Type::String);
    assert!(table.resolve_method("Dog", "fetch").is_none());
}

#[test]
fn test_resolve_method_nearest_definition_wins() {
    let mut animal = class("Animal", None);
    animal.methods.push(method("age", Vec::new(), Type::Int32));
    let mut dog = class("Dog", Some("Animal"));
    dog.methods
        .push(method("age", vec![("years", Type::Int32)], Type::Int32));
    let classes = vec![animal, dog];

    let mut diagnostics = Diagnostics::new();
    let table = ClassTable::build(&classes, &mut diagnostics);

    let sig = table.resolve_method("Dog", "age").unwrap();
    assert_eq!(sig.formals.len(), 1);
}
