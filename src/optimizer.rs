// File: src/optimizer.rs
//
// Constant folding for Yat syntax trees.
// Rewrites a tree into a new, equivalent tree in which constant
// subexpressions are replaced by their value. The input is never modified.
//
// Rules:
// - Operators whose operands all fold to numbers are computed with the
//   evaluator's own semantics, in an empty scope
// - `0 * x` and `x * 0` fold to 0 only when `x` is a bare reference
// - `x - x` folds to 0 when both sides are the same bare reference
// - Everything else is rebuilt from its folded children. Conditionals keep
//   both branches even when the condition is constant.

use crate::ast::{BinaryOp, Function, Node, UnaryOp};
use crate::interpreter::{Interpreter, Scope, Value};
use std::rc::Rc;

/// Statistics tracking what the folder did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FoldStats {
    pub nodes_visited: usize,
    pub constants_folded: usize,
    pub identities_applied: usize,
}

/// Constant folding pass over a node tree
pub struct ConstantFolder {
    pub stats: FoldStats,
    interpreter: Interpreter,
}

impl ConstantFolder {
    pub fn new() -> Self {
        Self {
            stats: FoldStats::default(),
            interpreter: Interpreter::silent(),
        }
    }

    /// Fold a whole tree, returning the rewritten copy
    pub fn fold(&mut self, node: &Node) -> Node {
        self.stats.nodes_visited += 1;
        match node {
            Node::Number(n) => Node::Number(*n),
            Node::Reference(name) => Node::Reference(name.clone()),
            Node::Read(name) => Node::Read(name.clone()),

            Node::BinaryOperation { lhs, op, rhs } => {
                let lhs = self.fold(lhs);
                let rhs = self.fold(rhs);
                self.fold_binary(lhs, *op, rhs)
            }

            Node::UnaryOperation { op, expr } => {
                let expr = self.fold(expr);
                self.fold_unary(*op, expr)
            }

            Node::Conditional { condition, if_true, if_false } => Node::Conditional {
                condition: Box::new(self.fold(condition)),
                if_true: self.fold_block(if_true),
                if_false: self.fold_block(if_false),
            },

            Node::Function(function) => Node::Function(self.fold_function(function)),

            Node::FunctionDefinition { name, function } => Node::FunctionDefinition {
                name: name.clone(),
                function: self.fold_function(function),
            },

            Node::FunctionCall { callee, args } => Node::FunctionCall {
                callee: Box::new(self.fold(callee)),
                args: self.fold_block(args),
            },

            Node::Print(expr) => Node::Print(Box::new(self.fold(expr))),
        }
    }

    fn fold_block(&mut self, stmts: &[Node]) -> Vec<Node> {
        stmts.iter().map(|stmt| self.fold(stmt)).collect()
    }

    fn fold_function(&mut self, function: &Function) -> Rc<Function> {
        Rc::new(Function {
            params: function.params.clone(),
            body: self.fold_block(&function.body),
        })
    }

    fn fold_binary(&mut self, lhs: Node, op: BinaryOp, rhs: Node) -> Node {
        if lhs.as_number().is_some() && rhs.as_number().is_some() {
            let node = Node::binary_op(lhs, op, rhs);
            return self.evaluate_constant(node);
        }

        match op {
            BinaryOp::Mul => {
                let zero_times_ref = lhs.as_number() == Some(0) && rhs.as_reference().is_some();
                let ref_times_zero = rhs.as_number() == Some(0) && lhs.as_reference().is_some();
                if zero_times_ref || ref_times_zero {
                    tracing::trace!(op = %op, "multiplication by zero folded");
                    self.stats.identities_applied += 1;
                    return Node::Number(0);
                }
            }
            BinaryOp::Sub => {
                if let (Some(left), Some(right)) = (lhs.as_reference(), rhs.as_reference()) {
                    if left == right {
                        tracing::trace!(name = left, "self subtraction folded");
                        self.stats.identities_applied += 1;
                        return Node::Number(0);
                    }
                }
            }
            _ => {}
        }

        Node::binary_op(lhs, op, rhs)
    }

    fn fold_unary(&mut self, op: UnaryOp, expr: Node) -> Node {
        let constant = expr.as_number().is_some();
        let node = Node::unary_op(op, expr);
        if constant {
            self.evaluate_constant(node)
        } else {
            node
        }
    }

    /// Evaluate an operator over literal operands. Operations the evaluator
    /// rejects (division by zero, overflow) are kept as they are so the
    /// failure still happens at run time.
    fn evaluate_constant(&mut self, node: Node) -> Node {
        match self.interpreter.evaluate(&node, &mut Scope::new()) {
            Ok(Value::Number(n)) => {
                self.stats.constants_folded += 1;
                Node::Number(n)
            }
            Ok(_) => node,
            Err(err) => {
                tracing::trace!(error = %err.message, "constant left unfolded");
                node
            }
        }
    }

    /// Get a summary of folding results
    pub fn summary(&self) -> String {
        format!(
            "Constant Folding Summary:\n\
             - Nodes visited: {}\n\
             - Constants folded: {}\n\
             - Identities applied: {}",
            self.stats.nodes_visited, self.stats.constants_folded, self.stats.identities_applied
        )
    }
}

impl Default for ConstantFolder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold `program` with a fresh folder
pub fn fold_constants(program: &Node) -> Node {
    let mut folder = ConstantFolder::new();
    let folded = folder.fold(program);
    tracing::debug!(
        visited = folder.stats.nodes_visited,
        folded = folder.stats.constants_folded,
        identities = folder.stats.identities_applied,
        "constant folding finished"
    );
    folded
}
