//! Operator console.
//!
//! The machine talks to the outside world through three channels: a line
//! of input for GET, a line of output for PUT, and a separate error
//! stream for diagnostics. [`Console`] bundles them so the engine and the
//! debugger can be driven by a real terminal or by an in-memory script.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// The operator's side of the machine.
pub trait Console {
    /// Show `prompt` and read one line. `None` means end of input.
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    /// Write one line of program or debugger output.
    fn write_line(&mut self, line: &str);

    /// Write one line to the error stream.
    fn write_error(&mut self, line: &str);
}

/// A console over any reader and a pair of writers.
///
/// Write failures are ignored: the console is the last place output can go.
pub struct IoConsole<R, W, E> {
    input: R,
    output: W,
    error: E,
}

impl<R: BufRead, W: Write, E: Write> IoConsole<R, W, E> {
    /// Wrap an input and two output streams.
    pub fn new(input: R, output: W, error: E) -> Self {
        Self { input, output, error }
    }

    /// Take the streams back.
    pub fn into_parts(self) -> (R, W, E) {
        (self.input, self.output, self.error)
    }
}

/// A console on the process's stdin, stdout and stderr.
pub fn stdio() -> IoConsole<std::io::StdinLock<'static>, std::io::Stdout, std::io::Stderr> {
    IoConsole::new(std::io::stdin().lock(), std::io::stdout(), std::io::stderr())
}

impl<R: BufRead, W: Write, E: Write> Console for IoConsole<R, W, E> {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let _ = write!(self.output, "{}", prompt);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let trimmed = line.trim_end_matches(['\n', '\r']).len();
                line.truncate(trimmed);
                Some(line)
            }
            Err(e) => {
                let _ = writeln!(self.error, "input error: {}", e);
                None
            }
        }
    }

    fn write_line(&mut self, line: &str) {
        let _ = writeln!(self.output, "{}", line);
    }

    fn write_error(&mut self, line: &str) {
        let _ = writeln!(self.error, "{}", line);
    }
}

/// An in-memory console with scripted input and captured output.
#[derive(Debug, Clone, Default)]
pub struct BufferConsole {
    /// Lines still to be read.
    pub input: VecDeque<String>,
    /// Every prompt shown, in order.
    pub prompts: Vec<String>,
    /// Captured output lines.
    pub output: Vec<String>,
    /// Captured error lines.
    pub errors: Vec<String>,
}

impl BufferConsole {
    /// Create an empty console.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a console that will answer reads with `lines`, in order.
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Queue another line of input.
    pub fn push_input(&mut self, line: impl Into<String>) {
        self.input.push_back(line.into());
    }
}

impl Console for BufferConsole {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.input.pop_front()
    }

    fn write_line(&mut self, line: &str) {
        self.output.push(line.to_string());
    }

    fn write_error(&mut self, line: &str) {
        self.errors.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_io_console_reads_lines_and_separates_streams() {
        let mut console = IoConsole::new(Cursor::new("12\r\nabc\n"), Vec::new(), Vec::new());

        assert_eq!(console.read_line("> ").as_deref(), Some("12"));
        assert_eq!(console.read_line("> ").as_deref(), Some("abc"));
        assert_eq!(console.read_line("> "), None);

        console.write_line("00042");
        console.write_error("oops");

        let (_, out, err) = console.into_parts();
        assert_eq!(String::from_utf8(out).unwrap(), "> > > 00042\n");
        assert_eq!(String::from_utf8(err).unwrap(), "oops\n");
    }

    #[test]
    fn test_buffer_console() {
        let mut console = BufferConsole::with_input(["1"]);
        console.push_input("2");

        assert_eq!(console.read_line("? ").as_deref(), Some("1"));
        assert_eq!(console.read_line("? ").as_deref(), Some("2"));
        assert_eq!(console.read_line("? "), None);
        assert_eq!(console.prompts, vec!["? "; 3]);

        console.write_line("out");
        console.write_error("err");
        assert_eq!(console.output, vec!["out"]);
        assert_eq!(console.errors, vec!["err"]);
    }
}
