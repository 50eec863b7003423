// Integration tests for the Yat interpreter
//
// These tests build trees by hand and check evaluation results:
// - Scoping and name lookup
// - Conditionals and sequence values
// - Function definition, calls and recursion
// - print/read through substituted I/O channels
// - Error kinds

use std::rc::Rc;

use pretty_assertions::assert_eq;
use yat::interpreter::{buffer_handler, lines_handler, SharedPrintHandler, DEFAULT_MAX_CALL_DEPTH};
use yat::{ErrorKind, Function, Interpreter, Node, Scope, Value};

fn interpreter_with(input: &[&str]) -> (Interpreter, SharedPrintHandler) {
    let output = buffer_handler();
    let interp = Interpreter::with_io(lines_handler(input.iter().copied()), output.clone());
    (interp, output)
}

fn bin(lhs: Node, op: &str, rhs: Node) -> Node {
    Node::binary(lhs, op, rhs).unwrap()
}

fn factorial_definition() -> Node {
    Node::function_definition(
        "fact",
        Function::new(
            vec!["n"],
            vec![Node::conditional(
                bin(Node::reference("n"), "==", Node::number(1)),
                vec![Node::reference("n")],
                vec![bin(
                    Node::reference("n"),
                    "*",
                    Node::call(
                        Node::reference("fact"),
                        vec![bin(Node::reference("n"), "-", Node::number(1))],
                    ),
                )],
            )],
        ),
    )
}

#[test]
fn test_function_definition_binds_same_function() {
    let (mut interp, _) = interpreter_with(&[]);
    let mut scope = Scope::new();
    let def = Node::function_definition("useless", Function::new(vec!["a"], vec![]));

    let returned = interp.evaluate(&def, &mut scope).unwrap();
    let bound = scope.get("useless").unwrap();

    match (&def, &bound) {
        (Node::FunctionDefinition { function, .. }, Value::Function(value)) => {
            assert!(Rc::ptr_eq(function, value));
        }
        _ => panic!("Expected a bound function, got {:?}", bound),
    }
    assert_eq!(returned, bound);
}

#[test]
fn test_conditional_if_true() {
    let mut scope = Scope::new();
    let op = Node::conditional(Node::number(1), vec![Node::number(1)], vec![Node::number(3)]);
    assert_eq!(op.evaluate(&mut scope).unwrap(), Value::Number(1));
}

#[test]
fn test_conditional_if_false() {
    let mut scope = Scope::new();
    let op = Node::conditional(Node::number(0), vec![Node::number(3)], vec![Node::number(7)]);
    assert_eq!(op.evaluate(&mut scope).unwrap(), Value::Number(7));
}

#[test]
fn test_conditional_empty_branches_yield_none() {
    let mut scope = Scope::new();
    let taken = Node::conditional(Node::number(1), vec![], vec![]);
    let not_taken = Node::conditional(Node::number(0), vec![], vec![]);
    assert_eq!(taken.evaluate(&mut scope).unwrap(), Value::None);
    assert_eq!(not_taken.evaluate(&mut scope).unwrap(), Value::None);
}

#[test]
fn test_conditional_on_function_is_type_mismatch() {
    let mut scope = Scope::new();
    let cond = Node::conditional(Node::function(Function::new(vec!["a"], vec![])), vec![], vec![]);
    assert_eq!(cond.evaluate(&mut scope).unwrap_err().kind, ErrorKind::TypeMismatch);
}

#[test]
fn test_print_writes_number_and_newline() {
    let (mut interp, output) = interpreter_with(&[]);
    let mut scope = Scope::new();
    let result = interp.evaluate(&Node::print(Node::number(666)), &mut scope).unwrap();
    assert_eq!(result, Value::None);
    assert_eq!(output.get_output(), "666\n");
}

#[test]
fn test_print_function_is_type_mismatch() {
    let (mut interp, output) = interpreter_with(&[]);
    let mut scope = Scope::new();
    let print = Node::print(Node::function(Function::new(Vec::<String>::new(), vec![])));
    assert_eq!(interp.evaluate(&print, &mut scope).unwrap_err().kind, ErrorKind::TypeMismatch);
    assert_eq!(output.get_output(), "");
}

#[test]
fn test_read_binds_in_current_scope() {
    let (mut interp, _) = interpreter_with(&["2000"]);
    let mut scope = Scope::new();
    interp.evaluate(&Node::read("foo"), &mut scope).unwrap();
    assert_eq!(scope.get("foo").unwrap(), Value::Number(2000));
}

#[test]
fn test_read_accepts_surrounding_whitespace_and_sign() {
    let (mut interp, _) = interpreter_with(&["  -42 "]);
    let mut scope = Scope::new();
    interp.evaluate(&Node::read("foo"), &mut scope).unwrap();
    assert_eq!(scope.get("foo").unwrap(), Value::Number(-42));
}

#[test]
fn test_read_rejects_garbage_and_end_of_input() {
    let (mut interp, _) = interpreter_with(&["twelve"]);
    let mut scope = Scope::new();
    let err = interp.evaluate(&Node::read("x"), &mut scope).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    let err = interp.evaluate(&Node::read("x"), &mut scope).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
    assert_eq!(err.message, "Unexpected end of input");
}

#[test]
fn test_function_call() {
    let mut scope = Scope::new();
    scope.set(
        "useless",
        Value::Function(Rc::new(Function::new(vec!["a", "b"], vec![Node::reference("a")]))),
    );
    let call = Node::call(Node::reference("useless"), vec![Node::number(1), Node::number(2)]);
    assert_eq!(call.evaluate(&mut scope).unwrap(), Value::Number(1));
}

#[test]
fn test_call_arguments_evaluate_left_to_right_in_caller_scope() {
    let (mut interp, output) = interpreter_with(&[]);
    let mut scope = Scope::new();
    let sub = Function::new(vec!["a", "b"], vec![bin(Node::reference("a"), "-", Node::reference("b"))]);
    interp.evaluate(&Node::function_definition("sub", sub), &mut scope).unwrap();

    // Each argument prints a marker before yielding its value
    let noisy = |marker: i64, value: i64| {
        Node::conditional(
            Node::number(1),
            vec![Node::print(Node::number(marker)), Node::number(value)],
            vec![],
        )
    };
    let call = Node::call(Node::reference("sub"), vec![noisy(1, 10), noisy(2, 3)]);
    assert_eq!(interp.evaluate(&call, &mut scope).unwrap(), Value::Number(7));
    assert_eq!(output.get_output(), "1\n2\n");
}

#[test]
fn test_call_parameters_do_not_leak_into_caller() {
    let mut scope = Scope::new();
    scope.set("a", Value::Number(100));
    let def = Node::function_definition(
        "shadow",
        Function::new(vec!["a"], vec![Node::read("unused_marker"), Node::reference("a")]),
    );
    let (mut interp, _) = interpreter_with(&["9"]);
    interp.evaluate(&def, &mut scope).unwrap();
    let call = Node::call(Node::reference("shadow"), vec![Node::number(5)]);
    assert_eq!(interp.evaluate(&call, &mut scope).unwrap(), Value::Number(5));
    assert_eq!(scope.get("a").unwrap(), Value::Number(100));
    assert_eq!(
        scope.get("unused_marker").unwrap_err().kind,
        ErrorKind::NotFound("unused_marker".to_string())
    );
}

#[test]
fn test_callee_sees_call_site_scope() {
    let (mut interp, _) = interpreter_with(&[]);
    let mut scope = Scope::new();
    let def = Node::function_definition(
        "outer_reader",
        Function::new(Vec::<String>::new(), vec![Node::reference("late")]),
    );
    interp.evaluate(&def, &mut scope).unwrap();
    scope.set("late", Value::Number(3));
    let call = Node::call(Node::reference("outer_reader"), vec![]);
    assert_eq!(interp.evaluate(&call, &mut scope).unwrap(), Value::Number(3));
}

#[test]
fn test_reference() {
    let mut scope = Scope::new();
    scope.set("digit", Value::Number(8));
    assert_eq!(Node::reference("digit").evaluate(&mut scope).unwrap(), Value::Number(8));
}

#[test]
fn test_binary_op_mul() {
    let mut scope = Scope::new();
    let op = bin(Node::number(4), "*", Node::number(7));
    assert_eq!(op.evaluate(&mut scope).unwrap(), Value::Number(28));
}

#[test]
fn test_binary_op_logical_or() {
    let mut scope = Scope::new();
    let op = bin(Node::number(0), "||", Node::number(1));
    assert_eq!(op.evaluate(&mut scope).unwrap(), Value::Number(1));
}

#[test]
fn test_binary_op_unknown_op() {
    let err = Node::binary(Node::number(0), "?", Node::number(0)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownOperator("?".to_string()));
    assert_eq!(err.message, "Unknown operation: ?");
}

#[test]
fn test_unary_op_minus() {
    let mut scope = Scope::new();
    let op = Node::unary("-", Node::number(3)).unwrap();
    assert_eq!(op.evaluate(&mut scope).unwrap(), Value::Number(-3));
}

#[test]
fn test_unary_op_negation() {
    let mut scope = Scope::new();
    let op = Node::unary("!", Node::number(0)).unwrap();
    assert_eq!(op.evaluate(&mut scope).unwrap(), Value::Number(1));
    let op = Node::unary("!", Node::number(-4)).unwrap();
    assert_eq!(op.evaluate(&mut scope).unwrap(), Value::Number(0));
}

#[test]
fn test_unary_op_unknown_op() {
    let err = Node::unary("#", Node::number(3)).unwrap_err();
    assert_eq!(err.message, "Unknown operation: #");
}

#[test]
fn test_factorial() {
    let (mut interp, output) = interpreter_with(&["7"]);
    let mut scope = Scope::new();
    interp.evaluate(&Node::read("n"), &mut scope).unwrap();
    interp.evaluate(&factorial_definition(), &mut scope).unwrap();
    let print = Node::print(Node::call(Node::reference("fact"), vec![Node::reference("n")]));
    interp.evaluate(&print, &mut scope).unwrap();
    assert_eq!(output.get_output(), "5040\n");
}

#[test]
fn test_factorial_value() {
    let (mut interp, _) = interpreter_with(&[]);
    let mut scope = Scope::new();
    interp.evaluate(&factorial_definition(), &mut scope).unwrap();
    let call = Node::call(Node::reference("fact"), vec![Node::number(7)]);
    assert_eq!(interp.evaluate(&call, &mut scope).unwrap(), Value::Number(5040));
}

#[test]
fn test_calling_a_number_is_type_mismatch() {
    let mut scope = Scope::new();
    scope.set("x", Value::Number(1));
    let call = Node::call(Node::reference("x"), vec![]);
    let err = call.evaluate(&mut scope).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TypeMismatch);
    assert_eq!(err.message, "'x' is not callable: it is a number");
}

#[test]
fn test_arity_mismatch() {
    let mut scope = Scope::new();
    scope.set("one", Value::Function(Rc::new(Function::new(vec!["a"], vec![]))));
    let call = Node::call(Node::reference("one"), vec![Node::number(1), Node::number(2)]);
    let err = call.evaluate(&mut scope).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ArityMismatch);
    assert_eq!(err.message, "Expected 1 argument(s), got 2");
}

#[test]
fn test_missing_name_suggests_defined_one() {
    let (mut interp, _) = interpreter_with(&[]);
    let mut scope = Scope::new();
    interp.evaluate(&factorial_definition(), &mut scope).unwrap();
    let call = Node::call(Node::reference("fcat"), vec![Node::number(3)]);
    let err = interp.evaluate(&call, &mut scope).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound("fcat".to_string()));
    assert_eq!(err.suggestion.as_deref(), Some("fact"));
}

#[test]
fn test_unbounded_recursion_hits_call_depth_limit() {
    let (mut interp, _) = interpreter_with(&[]);
    interp.set_max_call_depth(16);
    let mut scope = Scope::new();
    let forever = Node::function_definition(
        "forever",
        Function::new(Vec::<String>::new(), vec![Node::call(Node::reference("forever"), vec![])]),
    );
    interp.evaluate(&forever, &mut scope).unwrap();
    let err = interp
        .evaluate(&Node::call(Node::reference("forever"), vec![]), &mut scope)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RecursionLimit);
    assert_eq!(err.call_stack.len(), 16);
    assert!(interp.get_call_stack().is_empty());
}

/// `down(n) = if n == 0 { 0 } else { 1 + down(n - 1) }`
fn countdown_definition() -> Node {
    Node::function_definition(
        "down",
        Function::new(
            vec!["n"],
            vec![Node::conditional(
                bin(Node::reference("n"), "==", Node::number(0)),
                vec![Node::number(0)],
                vec![bin(
                    Node::number(1),
                    "+",
                    Node::call(
                        Node::reference("down"),
                        vec![bin(Node::reference("n"), "-", Node::number(1))],
                    ),
                )],
            )],
        ),
    )
}

fn run_countdown(interp: &mut Interpreter, n: i64) -> yat::YatResult<Value> {
    let mut scope = Scope::new();
    interp.evaluate(&countdown_definition(), &mut scope)?;
    interp.evaluate(&Node::call(Node::reference("down"), vec![Node::number(n)]), &mut scope)
}

#[test]
fn test_recursion_just_under_default_limit_completes() {
    let mut interp = Interpreter::silent();
    assert_eq!(interp.max_call_depth(), DEFAULT_MAX_CALL_DEPTH);
    // down(n) makes n + 1 nested calls
    let n = DEFAULT_MAX_CALL_DEPTH as i64 - 1;
    assert_eq!(run_countdown(&mut interp, n).unwrap(), Value::Number(n));
    assert!(interp.get_call_stack().is_empty());
}

#[test]
fn test_recursion_past_default_limit_is_an_error() {
    let mut interp = Interpreter::silent();
    let err = run_countdown(&mut interp, DEFAULT_MAX_CALL_DEPTH as i64 + 10).unwrap_err();
    assert_eq!(err.kind, ErrorKind::RecursionLimit);
    assert_eq!(err.call_stack.len(), DEFAULT_MAX_CALL_DEPTH);
    assert!(interp.get_call_stack().is_empty());
}

#[test]
fn test_deep_recursion_on_small_thread_stack() {
    // The evaluator grows its own stack, so a small thread still reaches the limit
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024)
        .spawn(|| {
            let mut interp = Interpreter::silent();
            interp.set_max_call_depth(5000);
            assert_eq!(interp.max_call_depth(), 5000);
            let ok = run_countdown(&mut interp, 4000).map(|value| value.as_number());
            let too_deep = run_countdown(&mut interp, 6000).map(|value| value.as_number());
            (ok.map_err(|err| err.kind), too_deep.map_err(|err| err.kind))
        })
        .unwrap();
    let (ok, too_deep) = handle.join().unwrap();
    assert_eq!(ok, Ok(Some(4000)));
    assert_eq!(too_deep.unwrap_err(), ErrorKind::RecursionLimit);
}

#[test]
fn test_output_and_input_can_be_swapped_between_runs() {
    let (mut interp, first) = interpreter_with(&["3"]);
    let mut scope = Scope::new();
    let echo = vec![Node::read("x"), Node::print(Node::reference("x"))];
    for node in &echo {
        interp.evaluate(node, &mut scope).unwrap();
    }

    let second = buffer_handler();
    interp.set_output(second.clone());
    interp.set_input(lines_handler(["-8"]));
    for node in &echo {
        interp.evaluate(node, &mut scope).unwrap();
    }

    assert_eq!(first.get_output(), "3\n");
    assert_eq!(second.get_output(), "-8\n");
    assert_eq!(interp.output().get_output(), "-8\n");
    assert_eq!(scope.get("x").unwrap(), Value::Number(-8));
}
