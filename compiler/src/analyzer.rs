use crate::error::CompileError;
use crate::lexer;
use crate::symbol_table::SymbolTable;
use crate::tree::{Node, NodeKind};

/// Walks the syntax tree once, feeding declarations into the scope
/// table and verifying that every variable reference resolves to a
/// declaration in an enclosing scope.
pub struct Analyzer {
    table: SymbolTable,
}

/// Declaration and usage sites are recognized structurally: a terminal
/// whose text is non-empty, not a keyword and starts with a letter is
/// a variable name.
fn variable_name(node: &Node) -> Option<&str> {
    let text = node.terminal_text()?;
    let first = text.chars().next()?;
    if first.is_ascii_alphabetic() && !lexer::is_keyword(text) {
        Some(text)
    } else {
        None
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            table: SymbolTable::new(),
        }
    }

    /// Full tree walk. Returns one warning per declared-but-unused
    /// variable; declaration and resolution failures abort the walk.
    pub fn check(
        &mut self,
        tree: &Node,
    ) -> Result<Vec<String>, CompileError> {
        self.check_node(tree)?;
        let warnings = self
            .table
            .unused()
            .into_iter()
            .map(|name| {
                format!("WARNING: variable '{name}' declared but never used")
            })
            .collect();
        Ok(warnings)
    }

    fn check_node(&mut self, node: &Node) -> Result<(), CompileError> {
        match node.kind {
            NodeKind::Vars | NodeKind::VarList => self.declare(node)?,
            NodeKind::Read | NodeKind::Assign | NodeKind::Print => {
                self.verify_uses(node)?
            }
            _ => {}
        }
        // declaration and usage handling never suppress the descent;
        // nested <varList> and statement subtrees are reached here
        for child in &node.children {
            self.check_node(child)?;
        }
        Ok(())
    }

    /// Every direct child that looks like a variable is a declaration
    /// at its own line.
    fn declare(&mut self, node: &Node) -> Result<(), CompileError> {
        for child in &node.children {
            if let Some(name) = variable_name(child) {
                self.table.insert(name, child.line)?;
            }
        }
        Ok(())
    }

    /// Unrestricted scan of a statement subtree; every variable-looking
    /// terminal must resolve.
    fn verify_uses(&mut self, node: &Node) -> Result<(), CompileError> {
        if let Some(name) = variable_name(node) {
            self.table.mark_used(name, node.line)?;
        }
        for child in &node.children {
            self.verify_uses(child)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_analyzer {
    use super::*;
    use crate::parser::Parser;

    fn check(src: &str) -> Result<Vec<String>, CompileError> {
        let tree = Parser::new(src).parse().unwrap();
        Analyzer::new().check(&tree)
    }

    #[test]
    fn declared_and_used_variables_pass_cleanly() {
        let warnings =
            check("program var a, 1 b, 2; start read a; print b; stop")
                .unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn unused_variable_warns_but_does_not_fail() {
        let warnings =
            check("program var a, 1 b, 2; start read a; stop").unwrap();
        assert_eq!(
            warnings,
            vec!["WARNING: variable 'b' declared but never used".to_string()]
        );
    }

    #[test]
    fn undeclared_use_is_fatal() {
        assert_eq!(
            check("program start read x; stop"),
            Err(CompileError::Undeclared {
                name: "x".to_string(),
                line: 1
            })
        );
    }

    #[test]
    fn redeclaration_is_fatal() {
        assert_eq!(
            check("program var a, 1 a, 2; start read a; stop"),
            Err(CompileError::Redeclaration {
                name: "a".to_string(),
                line: 1
            })
        );
    }

    #[test]
    fn uses_inside_expressions_are_verified() {
        assert_eq!(
            check("program var a, 1; start print (a + b); stop"),
            Err(CompileError::Undeclared {
                name: "b".to_string(),
                line: 1
            })
        );
    }

    #[test]
    fn block_declarations_share_the_global_scope() {
        let warnings = check(
            "program start var a, 1; set a a + 1; stop",
        )
        .unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn use_before_declaration_line_is_still_visible() {
        // the checker walks the whole tree before reporting unused,
        // and all declarations land in the one global scope
        let warnings =
            check("program var x, 0; start iterate [ x .lt. 3 ] set x x + 1; stop")
                .unwrap();
        assert!(warnings.is_empty());
    }
}
