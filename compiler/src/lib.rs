pub mod analyzer;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod symbol_table;
pub mod tree;

pub use crate::error::CompileError;

/// A successful compilation: the generated pseudo-assembly plus any
/// unused-variable warnings collected along the way.
#[derive(Debug)]
pub struct Output {
    pub code: String,
    pub warnings: Vec<String>,
}

/// Runs the whole pipeline: lex and parse into a concrete syntax
/// tree, verify static semantics, then generate accumulator
/// pseudo-assembly. Stops at the first fatal error; warnings never
/// fail the run.
pub fn compile(source: &str) -> Result<Output, CompileError> {
    if source.trim().is_empty() {
        return Err(CompileError::EmptyInput);
    }
    let tree = parser::Parser::new(source).parse()?;
    let warnings = analyzer::Analyzer::new().check(&tree)?;
    let code = codegen::CodeGen::new().generate(&tree);
    Ok(Output { code, warnings })
}
