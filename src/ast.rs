// File: src/ast.rs
//
// Abstract Syntax Tree (AST) definitions for the Yat toy language.
//
// Trees are built programmatically by the caller; there is no parser.
// Nodes are immutable once built: the constant folder and the pretty
// printer walk a tree and build new output without touching the input.

use crate::errors::{YatError, YatResult};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Binary operators, validated when a node is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl FromStr for BinaryOp {
    type Err = Box<YatError>;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        match symbol {
            "+" => Ok(BinaryOp::Add),
            "-" => Ok(BinaryOp::Sub),
            "*" => Ok(BinaryOp::Mul),
            "/" => Ok(BinaryOp::Div),
            "%" => Ok(BinaryOp::Mod),
            "==" => Ok(BinaryOp::Eq),
            "!=" => Ok(BinaryOp::Ne),
            "<" => Ok(BinaryOp::Lt),
            ">" => Ok(BinaryOp::Gt),
            "<=" => Ok(BinaryOp::Le),
            ">=" => Ok(BinaryOp::Ge),
            "&&" => Ok(BinaryOp::And),
            "||" => Ok(BinaryOp::Or),
            _ => Err(Box::new(YatError::unknown_operator(symbol))),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators: arithmetic negation and logical not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

impl FromStr for UnaryOp {
    type Err = Box<YatError>;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        match symbol {
            "-" => Ok(UnaryOp::Neg),
            "!" => Ok(UnaryOp::Not),
            _ => Err(Box::new(YatError::unknown_operator(symbol))),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A function value: parameter names and a body sequence.
///
/// Functions are shared through `Rc` so that binding one in a scope stores
/// the very same value that was defined, not a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub params: Vec<String>,
    pub body: Vec<Node>,
}

impl Function {
    pub fn new<S: Into<String>>(params: Vec<S>, body: Vec<Node>) -> Self {
        Function {
            params: params.into_iter().map(Into::into).collect(),
            body,
        }
    }
}

/// Every expression and statement of the language.
///
/// Statement sequences (function bodies and conditional branches) are plain
/// vectors; the value of a sequence is the value of its last node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Number(i64),
    Reference(String),
    BinaryOperation {
        lhs: Box<Node>,
        op: BinaryOp,
        rhs: Box<Node>,
    },
    UnaryOperation {
        op: UnaryOp,
        expr: Box<Node>,
    },
    FunctionCall {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    Function(Rc<Function>),
    FunctionDefinition {
        name: String,
        function: Rc<Function>,
    },
    Conditional {
        condition: Box<Node>,
        if_true: Vec<Node>,
        if_false: Vec<Node>,
    },
    Print(Box<Node>),
    Read(String),
}

impl Node {
    pub fn number(value: i64) -> Node {
        Node::Number(value)
    }

    pub fn reference(name: impl Into<String>) -> Node {
        Node::Reference(name.into())
    }

    /// Build a binary operation from an operator symbol.
    /// Fails with `UnknownOperator` if the symbol is not a binary operator.
    pub fn binary(lhs: Node, op: &str, rhs: Node) -> YatResult<Node> {
        Ok(Node::binary_op(lhs, op.parse()?, rhs))
    }

    pub fn binary_op(lhs: Node, op: BinaryOp, rhs: Node) -> Node {
        Node::BinaryOperation {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    /// Build a unary operation from an operator symbol.
    /// Fails with `UnknownOperator` if the symbol is not a unary operator.
    pub fn unary(op: &str, expr: Node) -> YatResult<Node> {
        Ok(Node::unary_op(op.parse()?, expr))
    }

    pub fn unary_op(op: UnaryOp, expr: Node) -> Node {
        Node::UnaryOperation {
            op,
            expr: Box::new(expr),
        }
    }

    pub fn call(callee: Node, args: Vec<Node>) -> Node {
        Node::FunctionCall {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn function(function: Function) -> Node {
        Node::Function(Rc::new(function))
    }

    pub fn function_definition(name: impl Into<String>, function: Function) -> Node {
        Node::FunctionDefinition {
            name: name.into(),
            function: Rc::new(function),
        }
    }

    pub fn conditional(condition: Node, if_true: Vec<Node>, if_false: Vec<Node>) -> Node {
        Node::Conditional {
            condition: Box::new(condition),
            if_true,
            if_false,
        }
    }

    pub fn print(expr: Node) -> Node {
        Node::Print(Box::new(expr))
    }

    pub fn read(name: impl Into<String>) -> Node {
        Node::Read(name.into())
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Node::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Node::Reference(name) => Some(name),
            _ => None,
        }
    }
}
