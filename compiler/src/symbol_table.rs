use crate::error::CompileError;
use std::collections::BTreeMap;

/// Lexically scoped table of declared variables. Each scope maps a
/// name to a used flag; lookups search innermost-out and mark the
/// first match used.
pub struct SymbolTable {
    scopes: Vec<BTreeMap<String, bool>>,
}

impl SymbolTable {
    /// Starts with one global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![BTreeMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(BTreeMap::new());
    }

    pub fn exit_scope(&mut self) -> Result<(), CompileError> {
        match self.scopes.pop() {
            Some(_) => Ok(()),
            None => Err(CompileError::ScopeUnderflow),
        }
    }

    /// Declares `name` (unused) in the innermost scope. Redeclaring a
    /// name already present in that same scope is an error; shadowing
    /// an outer scope is not.
    pub fn insert(
        &mut self,
        name: &str,
        line: usize,
    ) -> Result<(), CompileError> {
        if self.scopes.is_empty() {
            self.enter_scope();
        }
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(name) {
                return Err(CompileError::Redeclaration {
                    name: name.to_string(),
                    line,
                });
            }
            scope.insert(name.to_string(), false);
        }
        Ok(())
    }

    /// Resolves `name` against the live scopes, innermost first, and
    /// marks the first match used.
    pub fn mark_used(
        &mut self,
        name: &str,
        line: usize,
    ) -> Result<(), CompileError> {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(used) = scope.get_mut(name) {
                *used = true;
                return Ok(());
            }
        }
        Err(CompileError::Undeclared {
            name: name.to_string(),
            line,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains_key(name))
    }

    /// Names in the innermost scope that were never marked used, in
    /// name order.
    pub fn unused(&self) -> Vec<String> {
        match self.scopes.last() {
            Some(scope) => scope
                .iter()
                .filter(|&(_, used)| !used)
                .map(|(name, _)| name.clone())
                .collect(),
            None => Vec::new(),
        }
    }
}
