use std::fmt;

/// Discriminator for concrete-syntax-tree nodes. One variant per
/// grammar rule, plus `Terminal` for leaves (keywords, punctuation,
/// identifiers and numerals keep their lexeme text).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NodeKind {
    Program,
    Vars,
    VarList,
    Block,
    Stats,
    MoreStats,
    Stat,
    Read,
    Print,
    Cond,
    Iter,
    Assign,
    Relational,
    Exp,
    Term,
    Factor,
    Operand,
    Terminal(String),
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use NodeKind::*;
        match self {
            Program => write!(f, "<program>"),
            Vars => write!(f, "<vars>"),
            VarList => write!(f, "<varList>"),
            Block => write!(f, "<block>"),
            Stats => write!(f, "<stats>"),
            MoreStats => write!(f, "<mStat>"),
            Stat => write!(f, "<stat>"),
            Read => write!(f, "<read>"),
            Print => write!(f, "<print>"),
            Cond => write!(f, "<cond>"),
            Iter => write!(f, "<iter>"),
            Assign => write!(f, "<assign>"),
            Relational => write!(f, "<relational>"),
            Exp => write!(f, "<exp>"),
            Term => write!(f, "<M>"),
            Factor => write!(f, "<N>"),
            Operand => write!(f, "<R>"),
            Terminal(text) => write!(f, "{text}"),
        }
    }
}

/// A full concrete syntax tree: every production's right-hand-side
/// symbols appear as ordered children, literal terminals included.
/// Each nonterminal node carries the line of the first token consumed
/// for its production; terminals carry their own token's line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub line: usize,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, line: usize) -> Self {
        Self {
            kind,
            line,
            children: Vec::new(),
        }
    }

    pub fn terminal(text: impl Into<String>, line: usize) -> Self {
        Self::new(NodeKind::Terminal(text.into()), line)
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn terminal_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Terminal(text) => Some(text),
            _ => None,
        }
    }

    /// Descends through first children to the left-most leaf. The
    /// print handler uses this to decide identifier vs. literal.
    pub fn leftmost_terminal(&self) -> Option<&str> {
        let mut node = self;
        while let Some(first) = node.children.first() {
            node = first;
        }
        node.terminal_text()
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{} (line {})", "", self.kind, self.line, indent = depth * 2)?;
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod test_tree {
    use super::*;

    #[test]
    fn leftmost_terminal_descends_first_children() {
        let mut exp = Node::new(NodeKind::Exp, 1);
        let mut term = Node::new(NodeKind::Term, 1);
        let mut factor = Node::new(NodeKind::Factor, 1);
        let mut operand = Node::new(NodeKind::Operand, 1);
        operand.add_child(Node::terminal("x", 1));
        factor.add_child(operand);
        term.add_child(factor);
        exp.add_child(term);
        exp.add_child(Node::terminal("+", 1));

        assert_eq!(exp.leftmost_terminal(), Some("x"));
    }

    #[test]
    fn terminal_text_is_only_for_leaves() {
        let leaf = Node::terminal("set", 3);
        assert_eq!(leaf.terminal_text(), Some("set"));
        assert_eq!(Node::new(NodeKind::Stat, 3).terminal_text(), None);
    }

    #[test]
    fn display_shows_grammar_tags() {
        let mut vars = Node::new(NodeKind::Vars, 2);
        vars.add_child(Node::terminal("var", 2));
        let dump = vars.to_string();
        assert!(dump.starts_with("<vars> (line 2)"));
        assert!(dump.contains("var (line 2)"));
    }
}
