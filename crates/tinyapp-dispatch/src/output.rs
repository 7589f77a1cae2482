//! Line-oriented output for actions and the shell.
//!
//! Actions write user-facing lines through the application's [`OutputSink`]
//! instead of printing directly, so the destination can be swapped:
//!
//! - [`StdStreams`] writes to the process's stdout and stderr
//! - [`BufferedOutput`] keeps the lines in memory, for tests

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Destination for the lines an application prints.
pub trait OutputSink {
    /// Writes one line of regular output.
    fn stdout(&self, line: &str) -> io::Result<()>;

    /// Writes one line of diagnostic output.
    fn stderr(&self, line: &str) -> io::Result<()>;
}

/// Writes to the real standard streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdStreams;

impl OutputSink for StdStreams {
    fn stdout(&self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", line)?;
        out.flush()
    }

    fn stderr(&self, line: &str) -> io::Result<()> {
        writeln!(io::stderr().lock(), "{}", line)
    }
}

/// Which stream a captured line was written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Captures lines in memory.
///
/// Share it through an `Rc` to keep a handle after handing it to an app:
///
/// ```rust
/// use std::rc::Rc;
/// use tinyapp_dispatch::{BufferedOutput, OutputSink};
///
/// let buffer = Rc::new(BufferedOutput::new());
/// let sink: Box<dyn OutputSink> = Box::new(Rc::clone(&buffer));
/// sink.stdout("hello").unwrap();
/// assert_eq!(buffer.stdout_lines(), vec!["hello"]);
/// ```
#[derive(Debug, Default)]
pub struct BufferedOutput {
    lines: RefCell<Vec<(Stream, String)>>,
}

impl BufferedOutput {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines in write order, tagged with their stream.
    pub fn lines(&self) -> Vec<(Stream, String)> {
        self.lines.borrow().clone()
    }

    /// Lines written to stdout.
    pub fn stdout_lines(&self) -> Vec<String> {
        self.filtered(Stream::Stdout)
    }

    /// Lines written to stderr.
    pub fn stderr_lines(&self) -> Vec<String> {
        self.filtered(Stream::Stderr)
    }

    /// Captured stdout joined with newlines.
    pub fn stdout_text(&self) -> String {
        self.stdout_lines().join("\n")
    }

    /// Captured stderr joined with newlines.
    pub fn stderr_text(&self) -> String {
        self.stderr_lines().join("\n")
    }

    /// Drops everything captured so far.
    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }

    fn filtered(&self, stream: Stream) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, line)| line.clone())
            .collect()
    }
}

impl OutputSink for BufferedOutput {
    fn stdout(&self, line: &str) -> io::Result<()> {
        self.lines
            .borrow_mut()
            .push((Stream::Stdout, line.to_string()));
        Ok(())
    }

    fn stderr(&self, line: &str) -> io::Result<()> {
        self.lines
            .borrow_mut()
            .push((Stream::Stderr, line.to_string()));
        Ok(())
    }
}

impl<T: OutputSink + ?Sized> OutputSink for Rc<T> {
    fn stdout(&self, line: &str) -> io::Result<()> {
        (**self).stdout(line)
    }

    fn stderr(&self, line: &str) -> io::Result<()> {
        (**self).stderr(line)
    }
}

impl<T: OutputSink + ?Sized> OutputSink for Box<T> {
    fn stdout(&self, line: &str) -> io::Result<()> {
        (**self).stdout(line)
    }

    fn stderr(&self, line: &str) -> io::Result<()> {
        (**self).stderr(line)
    }
}
