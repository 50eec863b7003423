// File: src/interpreter/io.rs
//
// Input and output channels for `read` and `print`.
//
// The interpreter holds handles to these channels instead of touching the
// process's stdin/stdout directly, so tests and the constant folder can
// substitute buffers or a silent sink.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::sync::Arc;

/// Where `print` output goes
pub enum PrintHandlerImpl {
    /// Writes to stdout (default)
    Stdout,
    /// Captures to a buffer for assertions
    Buffer(Mutex<String>),
    /// Discards all output (constant folding)
    Silent,
}

impl PrintHandlerImpl {
    /// Print a line (with newline)
    pub fn println(&self, msg: &str) {
        match self {
            Self::Stdout => println!("{}", msg),
            Self::Buffer(buf) => {
                let mut buf = buf.lock();
                buf.push_str(msg);
                buf.push('\n');
            }
            Self::Silent => {}
        }
    }

    /// Get all captured output. Empty for handlers that don't capture.
    pub fn get_output(&self) -> String {
        match self {
            Self::Buffer(buf) => buf.lock().clone(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(buf) = self {
            buf.lock().clear();
        }
    }
}

/// Shared print handler that can be passed around
pub type SharedPrintHandler = Arc<PrintHandlerImpl>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Buffer(Mutex::new(String::new())))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Silent)
}

/// Where `read` takes its lines from
pub enum InputHandlerImpl {
    /// Reads from stdin (default)
    Stdin,
    /// Pops pre-seeded lines, front first
    Buffer(Mutex<VecDeque<String>>),
}

impl InputHandlerImpl {
    /// Read one line without its terminator. `Ok(None)` at end of input.
    pub fn read_line(&self) -> io::Result<Option<String>> {
        match self {
            Self::Stdin => {
                let mut line = String::new();
                let read = io::stdin().lock().read_line(&mut line)?;
                if read == 0 {
                    return Ok(None);
                }
                let trimmed = line.trim_end_matches(['\n', '\r']).len();
                line.truncate(trimmed);
                Ok(Some(line))
            }
            Self::Buffer(lines) => Ok(lines.lock().pop_front()),
        }
    }

    /// Queue another line on a buffer handler. No-op for stdin.
    pub fn push_line(&self, line: impl Into<String>) {
        if let Self::Buffer(lines) = self {
            lines.lock().push_back(line.into());
        }
    }
}

/// Shared input handler that can be passed around
pub type SharedInputHandler = Arc<InputHandlerImpl>;

pub fn stdin_handler() -> SharedInputHandler {
    Arc::new(InputHandlerImpl::Stdin)
}

/// Create an input handler that replays `lines` in order
pub fn lines_handler<I, S>(lines: I) -> SharedInputHandler
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Arc::new(InputHandlerImpl::Buffer(Mutex::new(
        lines.into_iter().map(Into::into).collect(),
    )))
}
