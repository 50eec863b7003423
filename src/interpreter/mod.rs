// File: src/interpreter/mod.rs
//
// Tree-walking interpreter for the Yat toy language.
// Executes a programmatically built AST by recursive traversal.
//
// Semantics in brief:
// - Numbers evaluate to themselves, references read through the scope chain
// - Binary and unary operators work on numbers only; comparisons and the
//   logical operators produce 1 or 0, and `&&`/`||` evaluate both operands
// - A call evaluates its arguments in the caller's scope, then runs the body
//   in a fresh scope whose parent is the call-site scope. That is what lets
//   a recursive function find its own name.
// - A statement sequence evaluates to its last value, or `Value::None`

mod io;
mod scope;
mod value;

pub use io::{
    buffer_handler, lines_handler, silent_handler, stdin_handler, stdout_handler,
    InputHandlerImpl, PrintHandlerImpl, SharedInputHandler, SharedPrintHandler,
};
pub use scope::Scope;
pub use value::Value;

use crate::ast::{BinaryOp, Node, UnaryOp};
use crate::errors::{YatError, YatResult};

/// Default limit on nested function calls before evaluation gives up
pub const DEFAULT_MAX_CALL_DEPTH: usize = 512;

/// Grow the stack when less than this much remains (100KB red zone)
const RED_ZONE: usize = 100 * 1024;

/// Stack space added per growth (1MB)
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Evaluation context: I/O channels, call stack and configuration
pub struct Interpreter {
    input: SharedInputHandler,
    output: SharedPrintHandler,
    call_stack: Vec<String>,
    max_call_depth: usize,
}

impl Interpreter {
    /// Creates an interpreter wired to stdin and stdout
    pub fn new() -> Self {
        Self::with_io(stdin_handler(), stdout_handler())
    }

    /// Creates an interpreter reading from `input` and printing to `output`
    pub fn with_io(input: SharedInputHandler, output: SharedPrintHandler) -> Self {
        Interpreter {
            input,
            output,
            call_stack: Vec::new(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Creates an interpreter with no input and discarded output.
    /// The constant folder evaluates through one of these.
    pub fn silent() -> Self {
        Self::with_io(lines_handler(Vec::<String>::new()), silent_handler())
    }

    /// Sets the output sink for print statements
    pub fn set_output(&mut self, output: SharedPrintHandler) {
        self.output = output;
    }

    /// Sets the input source for read statements
    pub fn set_input(&mut self, input: SharedInputHandler) {
        self.input = input;
    }

    pub fn output(&self) -> &SharedPrintHandler {
        &self.output
    }

    pub fn set_max_call_depth(&mut self, depth: usize) {
        self.max_call_depth = depth;
    }

    pub fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }

    /// Get the current call stack for error reporting
    pub fn get_call_stack(&self) -> Vec<String> {
        self.call_stack.clone()
    }

    fn error(&self, err: YatError) -> Box<YatError> {
        Box::new(err.with_call_stack(self.call_stack.clone()))
    }

    /// Evaluates a single node in `scope`
    pub fn evaluate(&mut self, node: &Node, scope: &mut Scope<'_>) -> YatResult<Value> {
        // Deep recursion is bounded by the call depth limit, not the native stack
        stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || self.eval_node(node, scope))
    }

    fn eval_node(&mut self, node: &Node, scope: &mut Scope<'_>) -> YatResult<Value> {
        match node {
            Node::Number(n) => Ok(Value::Number(*n)),

            Node::Reference(name) => scope.get(name).map_err(|err| self.error(*err)),

            Node::BinaryOperation { lhs, op, rhs } => {
                // Both operands always run, even for && and ||
                let left = self.evaluate(lhs, scope)?;
                let right = self.evaluate(rhs, scope)?;
                self.apply_binary(*op, &left, &right)
            }

            Node::UnaryOperation { op, expr } => {
                let operand = self.evaluate(expr, scope)?;
                self.apply_unary(*op, &operand)
            }

            Node::Conditional { condition, if_true, if_false } => {
                let cond_val = self.evaluate(condition, scope)?;
                let branch = if cond_val.is_truthy().map_err(|err| self.error(*err))? {
                    if_true
                } else {
                    if_false
                };
                self.eval_block(branch, scope)
            }

            Node::Print(expr) => {
                let value = self.evaluate(expr, scope)?;
                let n = value.expect_number("print").map_err(|err| self.error(*err))?;
                self.output.println(&n.to_string());
                Ok(Value::None)
            }

            Node::Read(name) => {
                let n = self.read_number()?;
                scope.set(name.clone(), Value::Number(n));
                Ok(Value::None)
            }

            Node::Function(function) => Ok(Value::Function(function.clone())),

            Node::FunctionDefinition { name, function } => {
                let value = Value::Function(function.clone());
                scope.set(name.clone(), value.clone());
                Ok(value)
            }

            Node::FunctionCall { callee, args } => self.eval_call(callee, args, scope),
        }
    }

    /// Evaluates a statement sequence; its value is the last statement's value
    pub fn eval_block(&mut self, stmts: &[Node], scope: &mut Scope<'_>) -> YatResult<Value> {
        let mut result = Value::None;
        for stmt in stmts {
            result = self.evaluate(stmt, scope)?;
        }
        Ok(result)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(callee = %call_name(callee), argc = args.len()))]
    fn eval_call(&mut self, callee: &Node, args: &[Node], scope: &mut Scope<'_>) -> YatResult<Value> {
        let function = match self.evaluate(callee, scope)? {
            Value::Function(function) => function,
            other => {
                return Err(self.error(YatError::type_mismatch(format!(
                    "'{}' is not callable: it is a {}",
                    call_name(callee),
                    other.kind_name()
                ))))
            }
        };

        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.evaluate(arg, scope)?);
        }

        if arg_values.len() != function.params.len() {
            return Err(self.error(
                YatError::arity_mismatch(function.params.len(), arg_values.len())
                    .with_note(format!("while calling '{}'", call_name(callee))),
            ));
        }

        if self.call_stack.len() >= self.max_call_depth {
            return Err(self.error(YatError::recursion_limit(self.max_call_depth)));
        }

        self.call_stack.push(call_name(callee));

        let mut frame = Scope::with_parent(scope);
        for (param, arg) in function.params.iter().zip(arg_values) {
            frame.set(param.clone(), arg);
        }
        let result = self.eval_block(&function.body, &mut frame);

        self.call_stack.pop();
        tracing::trace!(depth = self.call_stack.len(), ok = result.is_ok(), "call returned");
        result
    }

    fn read_number(&self) -> YatResult<i64> {
        let line = self
            .input
            .read_line()
            .map_err(|e| self.error(YatError::invalid_input(format!("Failed to read input: {}", e))))?
            .ok_or_else(|| self.error(YatError::invalid_input("Unexpected end of input".to_string())))?;

        line.trim().parse::<i64>().map_err(|_| {
            self.error(YatError::invalid_input(format!(
                "Expected an integer, got '{}'",
                line.trim()
            )))
        })
    }

    /// Applies a binary operator to two already-evaluated operands
    pub fn apply_binary(&self, op: BinaryOp, left: &Value, right: &Value) -> YatResult<Value> {
        let context = format!("operator '{}'", op);
        let a = left.expect_number(&context).map_err(|err| self.error(*err))?;
        let b = right.expect_number(&context).map_err(|err| self.error(*err))?;

        let result: Value = match op {
            BinaryOp::Add => a.checked_add(b).ok_or_else(|| self.error(YatError::overflow("+")))?.into(),
            BinaryOp::Sub => a.checked_sub(b).ok_or_else(|| self.error(YatError::overflow("-")))?.into(),
            BinaryOp::Mul => a.checked_mul(b).ok_or_else(|| self.error(YatError::overflow("*")))?.into(),
            BinaryOp::Div => floor_div(a, b).map_err(|err| self.error(err))?.into(),
            BinaryOp::Mod => floor_mod(a, b).map_err(|err| self.error(err))?.into(),
            BinaryOp::Eq => Value::from(a == b),
            BinaryOp::Ne => Value::from(a != b),
            BinaryOp::Lt => Value::from(a < b),
            BinaryOp::Gt => Value::from(a > b),
            BinaryOp::Le => Value::from(a <= b),
            BinaryOp::Ge => Value::from(a >= b),
            BinaryOp::And => Value::from(a != 0 && b != 0),
            BinaryOp::Or => Value::from(a != 0 || b != 0),
        };
        Ok(result)
    }

    /// Applies a unary operator to an already-evaluated operand
    pub fn apply_unary(&self, op: UnaryOp, operand: &Value) -> YatResult<Value> {
        let context = format!("operator '{}'", op);
        let n = operand.expect_number(&context).map_err(|err| self.error(*err))?;
        let result: Value = match op {
            UnaryOp::Neg => n.checked_neg().ok_or_else(|| self.error(YatError::overflow("-")))?.into(),
            UnaryOp::Not => Value::from(n == 0),
        };
        Ok(result)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    /// Evaluates this node with stdin/stdout as the I/O channels
    pub fn evaluate(&self, scope: &mut Scope<'_>) -> YatResult<Value> {
        Interpreter::new().evaluate(self, scope)
    }
}

/// Evaluates `node` in `scope` with stdin/stdout as the I/O channels
pub fn evaluate(node: &Node, scope: &mut Scope<'_>) -> YatResult<Value> {
    Interpreter::new().evaluate(node, scope)
}

/// Name shown in call stacks: the callee's identifier when it is a plain reference
fn call_name(callee: &Node) -> String {
    match callee {
        Node::Reference(name) => name.clone(),
        _ => "<anonymous function>".to_string(),
    }
}

/// Integer division rounding toward negative infinity
fn floor_div(a: i64, b: i64) -> Result<i64, YatError> {
    if b == 0 {
        return Err(YatError::division_by_zero());
    }
    let q = a.checked_div(b).ok_or_else(|| YatError::overflow("/"))?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Remainder taking the sign of the divisor
fn floor_mod(a: i64, b: i64) -> Result<i64, YatError> {
    if b == 0 {
        return Err(YatError::division_by_zero());
    }
    // i64::MIN % -1 overflows in hardware; the mathematical answer is 0
    let r = a.checked_rem(b).unwrap_or(0);
    if r != 0 && ((r < 0) != (b < 0)) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}
