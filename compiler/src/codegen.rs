use crate::tree::{Node, NodeKind};

/// Walks the syntax tree and emits pseudo-assembly for an accumulator
/// machine. Labels and temporaries are `L<n>` / `T<n>` with
/// monotonically increasing counters, never reset within a run. Every
/// temporary, and every declared variable as its declaration is
/// walked, is appended to the storage list in first-allocation order
/// without de-duplication.
pub struct CodeGen {
    code: String,
    label_count: usize,
    temp_count: usize,
    storage: Vec<String>,
    pending_label: Option<String>,
}

impl CodeGen {
    pub fn new() -> Self {
        Self {
            code: String::new(),
            label_count: 0,
            temp_count: 0,
            storage: Vec::new(),
            pending_label: None,
        }
    }

    /// Emits the whole program: instructions, the trailing `STOP`, and
    /// one `name 0` storage line per tracked variable and temporary.
    pub fn generate(&mut self, tree: &Node) -> String {
        self.traverse(tree);
        self.emit("STOP");
        let mut code = std::mem::take(&mut self.code);
        for name in &self.storage {
            code.push_str(&format!("{name} 0\n"));
        }
        code
    }

    fn emit(&mut self, instruction: &str) {
        match self.pending_label.take() {
            Some(label) => {
                self.code.push_str(&format!("{label}: {instruction}\n"));
            }
            None => {
                self.code.push_str(instruction);
                self.code.push('\n');
            }
        }
    }

    fn emit_label(&mut self, label: &str) {
        self.emit(&format!("{label}: NOOP"));
    }

    fn create_label(&mut self) -> String {
        let label = format!("L{}", self.label_count);
        self.label_count += 1;
        label
    }

    /// Fresh temporary, immediately registered for storage.
    fn create_temp(&mut self) -> String {
        let temp = format!("T{}", self.temp_count);
        self.temp_count += 1;
        self.allocate_storage(&temp);
        temp
    }

    fn allocate_storage(&mut self, name: &str) {
        self.storage.push(name.to_string());
    }

    /// Label dispatch: one handler per statement-shaped node, child
    /// traversal for everything else.
    fn traverse(&mut self, node: &Node) {
        match node.kind {
            NodeKind::Program | NodeKind::Block => {
                // keyword <vars> <stats-or-block-body> [keyword]
                self.traverse(&node.children[1]);
                self.traverse(&node.children[2]);
            }
            NodeKind::Vars => {
                // empty, or `var <varList>`
                if let Some(list) = node.children.get(1) {
                    self.traverse(list);
                }
            }
            NodeKind::VarList => self.gen_var_list(node),
            NodeKind::Read => self.gen_read(node),
            NodeKind::Print => self.gen_print(node),
            NodeKind::Assign => self.gen_assign(node),
            NodeKind::Cond => self.gen_cond(node),
            NodeKind::Iter => self.gen_iter(node),
            NodeKind::Exp => self.gen_exp(&node.children),
            _ => {
                for child in &node.children {
                    self.traverse(child);
                }
            }
        }
    }

    // <varList> -> identifier , integer (; | <varList>)
    fn gen_var_list(&mut self, node: &Node) {
        if let Some(name) = node.children[0].terminal_text() {
            self.allocate_storage(name);
        }
        let tail = &node.children[3];
        if tail.kind == NodeKind::VarList {
            self.gen_var_list(tail);
        }
    }

    fn gen_read(&mut self, node: &Node) {
        if let Some(name) = node.children[1].terminal_text() {
            self.emit(&format!("READ {name}"));
        }
    }

    fn gen_print(&mut self, node: &Node) {
        let exp = &node.children[1];
        self.gen_exp(&exp.children);
        // only the left-most terminal of the expression decides
        // identifier vs. literal
        let value = exp.leftmost_terminal().unwrap_or_default().to_string();
        if value.chars().next().map_or(false, |c| c.is_ascii_alphabetic()) {
            self.emit(&format!("WRITE {value}"));
        } else {
            let temp = self.create_temp();
            self.emit(&format!("STORE {temp}"));
            self.emit(&format!("WRITE {temp}"));
        }
    }

    fn gen_assign(&mut self, node: &Node) {
        self.gen_exp(&node.children[2].children);
        if let Some(name) = node.children[1].terminal_text() {
            self.emit(&format!("STORE {name}"));
        }
    }

    // iff [ <exp> <relational> <exp> ] <stat>
    fn gen_cond(&mut self, node: &Node) {
        self.gen_exp(&node.children[2].children);
        let left = self.create_temp();
        self.emit(&format!("STORE {left}"));
        self.gen_exp(&node.children[4].children);
        let right = self.create_temp();
        self.emit(&format!("STORE {right}"));
        self.emit(&format!("LOAD {left}"));
        self.emit(&format!("SUB {right}"));
        let target = self.create_label();
        self.gen_branch(&node.children[3], &target);
        self.traverse(&node.children[6]);
        self.emit_label(&target);
    }

    // iterate [ <exp> <relational> <exp> ] <stat>
    fn gen_iter(&mut self, node: &Node) {
        let loop_start = self.create_label();
        let loop_end = self.create_label();
        // the loop-start label prefixes the condition's first instruction
        self.pending_label = Some(loop_start.clone());
        self.gen_exp(&node.children[2].children);
        let left = self.create_temp();
        self.emit(&format!("STORE {left}"));
        self.gen_exp(&node.children[4].children);
        let right = self.create_temp();
        self.emit(&format!("STORE {right}"));
        self.emit(&format!("LOAD {left}"));
        self.emit(&format!("SUB {right}"));
        self.gen_branch(&node.children[3], &loop_end);
        self.traverse(&node.children[6]);
        self.emit(&format!("BR {loop_start}"));
        self.emit_label(&loop_end);
    }

    /// Branches are skip-on-false: the target label is taken when the
    /// condition does NOT hold, against the accumulator holding
    /// left - right. `**` keeps its extra label/branch pair.
    fn gen_branch(&mut self, relational: &Node, target: &str) {
        let oper = relational.children[0].terminal_text().unwrap_or_default();
        match oper {
            ".ge." => self.emit(&format!("BRNEG {target}")),
            ".le." => self.emit(&format!("BRPOS {target}")),
            ".gt." => self.emit(&format!("BRZNEG {target}")),
            ".lt." => self.emit(&format!("BRZPOS {target}")),
            "~" => self.emit(&format!("BRZERO {target}")),
            "**" => {
                // equality spelled with the only zero-test branch
                // available: fall through to the body when the
                // difference is zero, skip otherwise
                let skip = self.create_label();
                self.emit(&format!("BRZERO {skip}"));
                self.emit(&format!("BR {target}"));
                self.emit_label(&skip);
            }
            _ => unreachable!("parser admits exactly six relational operators"),
        }
    }

    /// `<exp>` children as a slice: `<M> (op <M>)*`. Right-associative:
    /// the right suffix is evaluated first and stashed in a fresh
    /// temporary, then the left operand, then the operation against
    /// the stash.
    fn gen_exp(&mut self, parts: &[Node]) {
        if parts.len() >= 3 {
            self.gen_exp(&parts[2..]);
            let right = self.create_temp();
            self.emit(&format!("STORE {right}"));
            self.gen_term(&parts[0]);
            let oper = if parts[1].terminal_text() == Some("+") {
                "ADD"
            } else {
                "SUB"
            };
            self.emit(&format!("{oper} {right}"));
        } else if let Some(first) = parts.first() {
            self.gen_term(first);
        }
    }

    // <M> -> <N> % <M> | <N>
    fn gen_term(&mut self, node: &Node) {
        if node.children.len() == 3 {
            self.gen_term(&node.children[2]);
            let right = self.create_temp();
            self.emit(&format!("STORE {right}"));
            self.gen_factor(&node.children[0]);
            self.emit(&format!("MULT {right}"));
        } else {
            self.gen_factor(&node.children[0]);
        }
    }

    // <N> -> - <N> | <R> (/ <R>)*
    fn gen_factor(&mut self, node: &Node) {
        if node.children[0].terminal_text() == Some("-") {
            // negate by subtracting from a loaded zero
            self.gen_factor(&node.children[1]);
            let operand = self.create_temp();
            self.emit(&format!("STORE {operand}"));
            self.emit("LOAD 0");
            self.emit(&format!("SUB {operand}"));
        } else {
            self.gen_quotient(&node.children);
        }
    }

    /// Division chain as a slice: `<R> (/ <R>)*`, re-nested to the
    /// right like `gen_exp`.
    fn gen_quotient(&mut self, parts: &[Node]) {
        if parts.len() >= 3 {
            self.gen_quotient(&parts[2..]);
            let right = self.create_temp();
            self.emit(&format!("STORE {right}"));
            self.gen_operand(&parts[0]);
            self.emit(&format!("DIV {right}"));
        } else {
            self.gen_operand(&parts[0]);
        }
    }

    // <R> -> ( <exp> ) | identifier | integer
    fn gen_operand(&mut self, node: &Node) {
        if node.children.len() == 3 {
            self.gen_exp(&node.children[1].children);
        } else if let Some(text) = node.children[0].terminal_text() {
            self.emit(&format!("LOAD {text}"));
        }
    }
}
