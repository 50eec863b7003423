// File: src/errors.rs
//
// Error handling and reporting for the Yat evaluator.
// Provides a structured error type with an explicit kind tag, optional
// "did you mean" suggestions and the call stack active when it was raised.

use colored::Colorize;
use std::fmt;

/// Result type used throughout the evaluator
pub type YatResult<T> = Result<T, Box<YatError>>;

/// Types of errors that can occur while building or evaluating a Yat tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Identifier absent through the whole scope chain
    NotFound(String),
    /// Operator symbol not recognized, raised when the node is built
    UnknownOperator(String),
    TypeMismatch,
    ArityMismatch,
    DivisionByZero,
    Overflow,
    /// `read` got end of input or a line that is not a base-10 integer
    InvalidInput,
    RecursionLimit,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::NotFound(_) => write!(f, "Name Not Found"),
            ErrorKind::UnknownOperator(_) => write!(f, "Unknown Operator"),
            ErrorKind::TypeMismatch => write!(f, "Type Mismatch"),
            ErrorKind::ArityMismatch => write!(f, "Arity Mismatch"),
            ErrorKind::DivisionByZero => write!(f, "Division By Zero"),
            ErrorKind::Overflow => write!(f, "Integer Overflow"),
            ErrorKind::InvalidInput => write!(f, "Invalid Input"),
            ErrorKind::RecursionLimit => write!(f, "Recursion Limit"),
        }
    }
}

/// A structured evaluation error
#[derive(Debug, Clone, PartialEq)]
pub struct YatError {
    pub kind: ErrorKind,
    pub message: String,
    pub suggestion: Option<String>,
    pub help: Option<String>,
    pub note: Option<String>,
    /// Innermost call last
    pub call_stack: Vec<String>,
}

impl YatError {
    pub fn new(kind: ErrorKind, message: String) -> Self {
        Self {
            kind,
            message,
            suggestion: None,
            help: None,
            note: None,
            call_stack: Vec::new(),
        }
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.note = Some(note);
        self
    }

    pub fn with_call_stack(mut self, call_stack: Vec<String>) -> Self {
        self.call_stack = call_stack;
        self
    }

    /// Create a missing identifier error
    pub fn not_found(name: &str) -> Self {
        Self::new(ErrorKind::NotFound(name.to_string()), format!("'{}' is not defined", name))
    }

    /// Create an unknown operator error
    pub fn unknown_operator(symbol: &str) -> Self {
        Self::new(
            ErrorKind::UnknownOperator(symbol.to_string()),
            format!("Unknown operation: {}", symbol),
        )
    }

    pub fn type_mismatch(message: String) -> Self {
        Self::new(ErrorKind::TypeMismatch, message)
    }

    pub fn arity_mismatch(expected: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityMismatch,
            format!("Expected {} argument(s), got {}", expected, got),
        )
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "Division by zero".to_string())
    }

    pub fn overflow(operation: &str) -> Self {
        Self::new(ErrorKind::Overflow, format!("Integer overflow in '{}'", operation))
    }

    pub fn invalid_input(message: String) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn recursion_limit(limit: usize) -> Self {
        Self::new(
            ErrorKind::RecursionLimit,
            format!("Maximum call depth of {} exceeded", limit),
        )
        .with_help("raise the limit with Interpreter::set_max_call_depth".to_string())
    }
}

impl fmt::Display for YatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind_str = format!("{}", self.kind);
        writeln!(f, "{}: {}", kind_str.red().bold(), self.message.bold())?;

        for frame in self.call_stack.iter().rev() {
            writeln!(f, "  {} {}", "in".bright_blue(), frame)?;
        }

        if let Some(ref help) = self.help {
            writeln!(
                f,
                "   {} {}",
                "=".bright_yellow(),
                format!("help: {}", help).bright_yellow()
            )?;
        }

        if let Some(ref suggestion) = self.suggestion {
            writeln!(
                f,
                "   {} {}",
                "=".bright_green(),
                format!("Did you mean '{}'?", suggestion).bright_green()
            )?;
        }

        if let Some(ref note) = self.note {
            writeln!(f, "   {} {}", "=".bright_cyan(), format!("note: {}", note).bright_cyan())?;
        }

        Ok(())
    }
}

impl std::error::Error for YatError {}

/// Computes the Levenshtein distance between two strings
/// Used for "Did you mean?" suggestions
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    if s1_chars.is_empty() {
        return s2_chars.len();
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    // Single rolling row instead of the full matrix
    let mut previous: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut current = vec![0; s2_chars.len() + 1];

    for (i, c1) in s1_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            current[j + 1] = (previous[j + 1] + 1).min(current[j] + 1).min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[s2_chars.len()]
}

/// Find the closest match from a list of candidates using Levenshtein distance
/// Returns None if no good match is found (distance > 3)
pub fn find_closest_match<'a>(target: &str, candidates: &'a [String]) -> Option<&'a str> {
    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for candidate in candidates {
        let distance = levenshtein_distance(target, candidate);
        if distance <= 3 && distance < best_distance {
            best_distance = distance;
            best_match = Some(candidate.as_str());
        }
    }

    best_match
}
