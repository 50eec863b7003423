// File: src/printer.rs
//
// Pretty printer for Yat syntax trees.
//
// Conventions:
// - statements end with `;` and a newline unless they end with `}`
// - blocks open with `{` and a newline, contents indented by 4 spaces
// - binary and unary operations are always parenthesized, and so is each
//   operand unless it already is
// - a whole program gets a trailing `;` (unless it ends with `}`) but no newline

use crate::ast::Node;
use crate::errors::{YatError, YatResult};
use crate::interpreter::PrintHandlerImpl;

pub const DEFAULT_INDENT: usize = 4;

#[derive(Debug, Default)]
pub struct PrettyPrinter {
    indent: usize,
}

impl PrettyPrinter {
    pub fn new() -> Self {
        Self { indent: 0 }
    }

    /// Render `program` as source text
    pub fn format_program(&mut self, program: &Node) -> YatResult<String> {
        let mut res = self.format(program)?;
        if !res.ends_with('}') {
            res.push(';');
        }
        Ok(res)
    }

    /// Render a single node without a statement terminator
    pub fn format(&mut self, node: &Node) -> YatResult<String> {
        match node {
            Node::Number(n) => Ok(n.to_string()),
            Node::Reference(name) => Ok(name.clone()),
            Node::Read(name) => Ok(format!("read {}", name)),
            Node::Print(expr) => Ok(format!("print {}", self.format(expr)?)),

            Node::BinaryOperation { lhs, op, rhs } => {
                let lhs = in_brackets(self.format(lhs)?);
                let rhs = in_brackets(self.format(rhs)?);
                Ok(format!("({} {} {})", lhs, op, rhs))
            }

            Node::UnaryOperation { op, expr } => {
                let expr = in_brackets(self.format(expr)?);
                Ok(format!("({}{})", op, expr))
            }

            Node::FunctionCall { callee, args } => {
                let mut res = self.format(callee)?;
                res.push('(');
                res.push_str(&self.format_list(args)?.join(", "));
                res.push(')');
                Ok(res)
            }

            Node::FunctionDefinition { name, function } => {
                let mut res = format!("def {}({}) {{\n", name, function.params.join(", "));
                res.push_str(&self.format_block(&function.body)?);
                res.push_str(&self.indentation());
                res.push('}');
                Ok(res)
            }

            Node::Conditional { condition, if_true, if_false } => {
                let condition = in_brackets(self.format(condition)?);
                let mut res = format!("if {} {{\n", condition);
                res.push_str(&self.format_block(if_true)?);
                if !if_false.is_empty() {
                    res.push_str(&self.indentation());
                    res.push_str("} else {\n");
                    res.push_str(&self.format_block(if_false)?);
                }
                res.push_str(&self.indentation());
                res.push('}');
                Ok(res)
            }

            Node::Function(_) => Err(Box::new(YatError::type_mismatch(
                "A bare function can't be pretty-printed; bind it with a definition".to_string(),
            ))),
        }
    }

    fn format_list(&mut self, nodes: &[Node]) -> YatResult<Vec<String>> {
        nodes.iter().map(|node| self.format(node)).collect()
    }

    /// Indented statements, each terminated, one per line
    fn format_block(&mut self, stmts: &[Node]) -> YatResult<String> {
        self.indent += DEFAULT_INDENT;
        let mut res = String::new();
        for stmt in stmts {
            let line = match self.format(stmt) {
                Ok(line) => line,
                Err(err) => {
                    self.indent -= DEFAULT_INDENT;
                    return Err(err);
                }
            };
            res.push_str(&self.indentation());
            res.push_str(&line);
            if !line.ends_with('}') {
                res.push(';');
            }
            res.push('\n');
        }
        self.indent -= DEFAULT_INDENT;
        Ok(res)
    }

    fn indentation(&self) -> String {
        " ".repeat(self.indent)
    }
}

fn in_brackets(expr: String) -> String {
    if expr.starts_with('(') && expr.ends_with(')') {
        expr
    } else {
        format!("({})", expr)
    }
}

/// Render `program` with a fresh printer
pub fn format_program(program: &Node) -> YatResult<String> {
    PrettyPrinter::new().format_program(program)
}

/// Render `program` and write it, followed by a newline, to `output`
pub fn pretty_print(program: &Node, output: &PrintHandlerImpl) -> YatResult<()> {
    let text = format_program(program)?;
    output.println(&text);
    Ok(())
}
