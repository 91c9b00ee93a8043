use std::collections::HashMap;

use crate::ast::types::Type;

/// Scope Stack
///
/// A stack of lexical frames, each mapping an identifier to its declared
/// type. Lookup walks the frames innermost-first, so a binding in an
/// inner frame shadows any same-named binding further out, and popping a
/// frame restores exactly the bindings that were visible before the
/// matching push. Lookup cost is proportional to the nesting depth.
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<HashMap<String, Type>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack::default()
    }

    /// Pushes a fresh innermost frame.
    pub fn enter_scope(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Pops the innermost frame. Every enter must be matched by exactly
    /// one exit.
    pub fn exit_scope(&mut self) {
        debug_assert!(!self.frames.is_empty(), "exited more scopes than entered");
        self.frames.pop();
    }

    /// Binds `name` in the innermost frame, shadowing any outer binding
    /// for the lifetime of that frame.
    pub fn declare(&mut self, name: &str, ty: Type) {
        debug_assert!(!self.frames.is_empty(), "declared a binding outside any scope");
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), ty);
        }
    }

    /// Resolves `name` against the innermost frame that binds it.
    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
