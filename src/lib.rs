// File: src/lib.rs
//
// Library interface for the Yat evaluator.
// Trees are built programmatically, then evaluated, constant folded or
// pretty printed.

pub mod ast;
pub mod errors;
pub mod interpreter;
pub mod optimizer;
pub mod printer;

pub use ast::{BinaryOp, Function, Node, UnaryOp};
pub use errors::{ErrorKind, YatError, YatResult};
pub use interpreter::{evaluate, Interpreter, Scope, Value};
pub use optimizer::{fold_constants, ConstantFolder};
