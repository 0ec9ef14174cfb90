use crate::error::CompileError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::tree::{Node, NodeKind};

const RELATIONAL_OPS: [&str; 6] = [".le.", ".ge.", ".lt.", ".gt.", "**", "~"];

/// Recursive-descent parser with one token of lookahead. One method
/// per grammar rule; every method returns the rule's node with one
/// child per consumed right-hand-side symbol, terminals included.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self { lexer, current }
    }

    /// Consumes exactly one `<program>` and requires the token stream
    /// to be exhausted afterwards.
    pub fn parse(&mut self) -> Result<Node, CompileError> {
        let tree = self.program()?;
        if self.current.kind == TokenKind::EndOfInput {
            Ok(tree)
        } else {
            Err(self.error(&format!(
                "expected end of input after <program>, found '{}'",
                self.current
            )))
        }
    }

    fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.current, next)
    }

    fn take_terminal(&mut self) -> Node {
        let token = self.advance();
        Node::terminal(token.text, token.line)
    }

    fn at_keyword(&self, word: &str) -> bool {
        self.current.kind == TokenKind::Keyword && self.current.text == word
    }

    fn at_operator(&self, op: &str) -> bool {
        self.current.kind == TokenKind::Operator && self.current.text == op
    }

    fn at_statement(&self) -> bool {
        self.current.kind == TokenKind::Keyword
            && matches!(
                self.current.text.as_str(),
                "read" | "print" | "iff" | "iterate" | "set" | "start"
            )
    }

    fn expect_keyword(&mut self, word: &str) -> Result<Node, CompileError> {
        if self.at_keyword(word) {
            Ok(self.take_terminal())
        } else {
            Err(self.error(&format!(
                "expected keyword '{word}', found '{}'",
                self.current
            )))
        }
    }

    fn expect_operator(&mut self, op: &str) -> Result<Node, CompileError> {
        if self.at_operator(op) {
            Ok(self.take_terminal())
        } else {
            Err(self.error(&format!(
                "expected '{op}', found '{}'",
                self.current
            )))
        }
    }

    fn expect_identifier(&mut self) -> Result<Node, CompileError> {
        if self.current.kind == TokenKind::Identifier {
            Ok(self.take_terminal())
        } else {
            Err(self.error(&format!(
                "expected an identifier, found '{}'",
                self.current
            )))
        }
    }

    fn expect_number(&mut self) -> Result<Node, CompileError> {
        if self.current.kind == TokenKind::Number {
            Ok(self.take_terminal())
        } else {
            Err(self.error(&format!(
                "expected an integer, found '{}'",
                self.current
            )))
        }
    }

    /// An error token surfacing in the lookahead is a lexical failure,
    /// not a grammar mismatch.
    fn error(&self, msg: &str) -> CompileError {
        if self.current.kind == TokenKind::Error {
            CompileError::Lexical {
                lexeme: self.current.text.clone(),
                line: self.current.line,
            }
        } else {
            CompileError::Syntax {
                msg: msg.into(),
                line: self.current.line,
            }
        }
    }

    // <program> -> program <vars> <block>
    fn program(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::Program, self.current.line);
        node.add_child(self.expect_keyword("program")?);
        node.add_child(self.vars()?);
        node.add_child(self.block()?);
        Ok(node)
    }

    // <vars> -> empty | var <varList>
    fn vars(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::Vars, self.current.line);
        if self.at_keyword("var") {
            node.add_child(self.take_terminal());
            node.add_child(self.var_list()?);
        }
        Ok(node)
    }

    // <varList> -> identifier , integer ; | identifier , integer <varList>
    fn var_list(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::VarList, self.current.line);
        node.add_child(self.expect_identifier()?);
        node.add_child(self.expect_operator(",")?);
        node.add_child(self.expect_number()?);
        if self.at_operator(";") {
            node.add_child(self.take_terminal());
        } else {
            node.add_child(self.var_list()?);
        }
        Ok(node)
    }

    // <block> -> start <vars> <stats> stop
    fn block(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::Block, self.current.line);
        node.add_child(self.expect_keyword("start")?);
        node.add_child(self.vars()?);
        node.add_child(self.stats()?);
        node.add_child(self.expect_keyword("stop")?);
        Ok(node)
    }

    // <stats> -> empty | <stat> <mStat>
    //
    // Driven by the statement FIRST set so that a block with no
    // statements still parses.
    fn stats(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::Stats, self.current.line);
        if self.at_statement() {
            node.add_child(self.stat()?);
            node.add_child(self.more_stats()?);
        }
        Ok(node)
    }

    // <mStat> -> empty | <stat> <mStat>
    fn more_stats(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::MoreStats, self.current.line);
        if self.at_statement() {
            node.add_child(self.stat()?);
            node.add_child(self.more_stats()?);
        }
        Ok(node)
    }

    // <stat> -> <read> | <print> | <block> | <cond> | <iter> | <assign>
    fn stat(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::Stat, self.current.line);
        if self.current.kind != TokenKind::Keyword {
            return Err(self.error(&format!(
                "expected a statement, found '{}'",
                self.current
            )));
        }
        let child = match self.current.text.as_str() {
            "read" => self.read_stat()?,
            "print" => self.print_stat()?,
            "start" => self.block()?,
            "iff" => self.cond()?,
            "iterate" => self.iter()?,
            "set" => self.assign()?,
            _ => {
                return Err(self.error(&format!(
                    "expected a statement, found '{}'",
                    self.current
                )))
            }
        };
        node.add_child(child);
        Ok(node)
    }

    // <read> -> read identifier ;
    fn read_stat(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::Read, self.current.line);
        node.add_child(self.expect_keyword("read")?);
        node.add_child(self.expect_identifier()?);
        node.add_child(self.expect_operator(";")?);
        Ok(node)
    }

    // <print> -> print <exp> ;
    fn print_stat(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::Print, self.current.line);
        node.add_child(self.expect_keyword("print")?);
        node.add_child(self.exp()?);
        node.add_child(self.expect_operator(";")?);
        Ok(node)
    }

    // <cond> -> iff [ <exp> <relational> <exp> ] <stat>
    fn cond(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::Cond, self.current.line);
        node.add_child(self.expect_keyword("iff")?);
        node.add_child(self.expect_operator("[")?);
        node.add_child(self.exp()?);
        node.add_child(self.relational()?);
        node.add_child(self.exp()?);
        node.add_child(self.expect_operator("]")?);
        node.add_child(self.stat()?);
        Ok(node)
    }

    // <iter> -> iterate [ <exp> <relational> <exp> ] <stat>
    fn iter(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::Iter, self.current.line);
        node.add_child(self.expect_keyword("iterate")?);
        node.add_child(self.expect_operator("[")?);
        node.add_child(self.exp()?);
        node.add_child(self.relational()?);
        node.add_child(self.exp()?);
        node.add_child(self.expect_operator("]")?);
        node.add_child(self.stat()?);
        Ok(node)
    }

    // <assign> -> set identifier <exp> ;
    fn assign(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::Assign, self.current.line);
        node.add_child(self.expect_keyword("set")?);
        node.add_child(self.expect_identifier()?);
        node.add_child(self.exp()?);
        node.add_child(self.expect_operator(";")?);
        Ok(node)
    }

    // <relational> -> .le. | .ge. | .lt. | .gt. | ** | ~
    fn relational(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::Relational, self.current.line);
        if self.current.kind == TokenKind::Operator
            && RELATIONAL_OPS.contains(&self.current.text.as_str())
        {
            node.add_child(self.take_terminal());
            Ok(node)
        } else {
            Err(self.error(&format!(
                "expected a relational operator, found '{}'",
                self.current
            )))
        }
    }

    // <exp> -> <M> (+ <M> | - <M>)*
    fn exp(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::Exp, self.current.line);
        node.add_child(self.term()?);
        while self.at_operator("+") || self.at_operator("-") {
            node.add_child(self.take_terminal());
            node.add_child(self.term()?);
        }
        Ok(node)
    }

    // <M> -> <N> % <M> | <N>
    fn term(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::Term, self.current.line);
        node.add_child(self.factor()?);
        if self.at_operator("%") {
            node.add_child(self.take_terminal());
            node.add_child(self.term()?);
        }
        Ok(node)
    }

    // <N> -> - <N> | <R> (/ <R>)*
    fn factor(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::Factor, self.current.line);
        if self.at_operator("-") {
            node.add_child(self.take_terminal());
            node.add_child(self.factor()?);
        } else {
            node.add_child(self.operand()?);
            while self.at_operator("/") {
                node.add_child(self.take_terminal());
                node.add_child(self.operand()?);
            }
        }
        Ok(node)
    }

    // <R> -> ( <exp> ) | identifier | integer
    fn operand(&mut self) -> Result<Node, CompileError> {
        let mut node = Node::new(NodeKind::Operand, self.current.line);
        if self.at_operator("(") {
            node.add_child(self.take_terminal());
            node.add_child(self.exp()?);
            node.add_child(self.expect_operator(")")?);
        } else if self.current.kind == TokenKind::Identifier
            || self.current.kind == TokenKind::Number
        {
            node.add_child(self.take_terminal());
        } else {
            return Err(self.error(&format!(
                "expected '(', an identifier or an integer, found '{}'",
                self.current
            )));
        }
        Ok(node)
    }
}
