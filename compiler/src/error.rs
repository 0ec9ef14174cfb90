use std::fmt;

/// Everything that can abort a compilation. All variants are fatal;
/// unused-variable diagnostics are warnings and never reach this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    Lexical { lexeme: String, line: usize },
    Syntax { msg: Box<str>, line: usize },
    Redeclaration { name: String, line: usize },
    Undeclared { name: String, line: usize },
    ScopeUnderflow,
    EmptyInput,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use CompileError::*;
        match self {
            Lexical { lexeme, line } => {
                writeln!(
                    f,
                    "Lexical error: unrecognized input '{lexeme}' at line {line}."
                )
            }
            Syntax { msg, line } => {
                writeln!(f, "Syntax error: {msg} at line {line}.")
            }
            Redeclaration { name, line } => {
                writeln!(
                    f,
                    "Semantic error: variable '{name}' redefined at line {line}."
                )
            }
            Undeclared { name, line } => {
                writeln!(
                    f,
                    "Semantic error: variable '{name}' used without declaration at line {line}."
                )
            }
            ScopeUnderflow => {
                writeln!(f, "Semantic error: no enclosing scope to exit.")
            }
            EmptyInput => writeln!(f, "Error: empty input."),
        }
    }
}

impl std::error::Error for CompileError {}
