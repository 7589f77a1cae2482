//! Interactive read-run-print loop.
//!
//! The shell reads one command per line, runs it through [`App::run`] and
//! prints the result. It is the outermost error boundary of an application:
//! a failing action is reported and the loop goes on.
//!
//! Line format:
//!
//! ```text
//! <action> <arg1> <arg2> ... <argN>
//! ```
//!
//! Runs of whitespace separate arguments; every argument is passed as a
//! string. `exit` or end of input ends the loop.

use std::io::{self, BufRead, IsTerminal, Write};

use console::style;
use tinyapp_dispatch::{App, Args};

/// Message printed for an empty line.
pub const USAGE: &str = r#"Usage: <action> <arg1> <arg2> ... <argN>, or "exit" to terminate"#;

/// Line that ends the loop.
pub const EXIT_COMMAND: &str = "exit";

/// Default prompt.
pub const DEFAULT_PROMPT: &str = "> ";

/// What a single input line amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The line was `exit`.
    Exit,
    /// The line was blank.
    Empty,
    /// An action with its arguments.
    Run { action: String, args: Vec<String> },
}

impl Command {
    /// Parses one input line.
    ///
    /// ```rust
    /// use tinyapp::shell::Command;
    ///
    /// assert_eq!(
    ///     Command::parse("  sum   1 2 "),
    ///     Command::Run { action: "sum".into(), args: vec!["1".into(), "2".into()] }
    /// );
    /// assert_eq!(Command::parse("   "), Command::Empty);
    /// assert_eq!(Command::parse("exit"), Command::Exit);
    /// ```
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            None => Command::Empty,
            Some(EXIT_COMMAND) if tokens.clone().next().is_none() => Command::Exit,
            Some(action) => Command::Run {
                action: action.to_string(),
                args: tokens.map(str::to_string).collect(),
            },
        }
    }
}

/// Interactive loop over an [`App`].
///
/// # Example
///
/// ```rust
/// use std::io::Cursor;
/// use std::rc::Rc;
/// use tinyapp::prelude::*;
/// use tinyapp::shell::Shell;
///
/// let output = Rc::new(BufferedOutput::new());
/// let app = App::builder()
///     .controller(
///         Controller::builder("main")
///             .action("echo", |_: &ActionContext<'_>, args: &Args| {
///                 Ok::<_, anyhow::Error>(args.required_str(0)?.to_uppercase())
///             })
///             .build(),
///     )
///     .output(Rc::clone(&output))
///     .build()?;
///
/// let ran = Shell::new(&app)
///     .run_with(Cursor::new("echo hi\nexit\necho never\n"), std::io::sink())?;
///
/// assert_eq!(ran, 1);
/// assert_eq!(output.stdout_lines(), vec!["HI"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Shell<'a> {
    app: &'a App,
    prompt: String,
    styled: bool,
}

impl<'a> Shell<'a> {
    /// Creates a shell with the default prompt. Styling follows the
    /// terminal's color support.
    pub fn new(app: &'a App) -> Self {
        Self {
            app,
            prompt: DEFAULT_PROMPT.to_string(),
            styled: console::colors_enabled_stderr(),
        }
    }

    /// Sets the prompt.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Forces styling of the prompt and error headers on or off.
    pub fn styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    /// Runs on the process's stdin. The prompt is shown only when stdin is a
    /// terminal.
    ///
    /// Returns the number of actions run.
    pub fn run(&self) -> io::Result<usize> {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            self.run_with(stdin.lock(), io::stdout())
        } else {
            self.run_with(stdin.lock(), io::sink())
        }
    }

    /// Runs on `input`, writing the prompt to `prompt_out` before each line.
    ///
    /// Results and errors go to the app's output sink. Only reading input
    /// or writing the prompt can fail this function.
    pub fn run_with<R, W>(&self, mut input: R, mut prompt_out: W) -> io::Result<usize>
    where
        R: BufRead,
        W: Write,
    {
        let mut ran = 0;
        let mut line = String::new();

        loop {
            write!(
                prompt_out,
                "{}",
                style(&self.prompt).bold().force_styling(self.styled)
            )?;
            prompt_out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                tracing::debug!("end of input, leaving shell");
                break;
            }

            match Command::parse(&line) {
                Command::Exit => break,
                Command::Empty => self.app.stderr(USAGE),
                Command::Run { action, args } => {
                    ran += 1;
                    self.execute(&action, args);
                }
            }
        }

        Ok(ran)
    }

    fn execute(&self, action: &str, args: Vec<String>) {
        tracing::debug!(action, args = ?args, "shell command");
        match self.app.run(action, Args::from(args)) {
            Ok(result) => self.app.stdout(&result.to_string()),
            Err(err) => {
                let err = anyhow::Error::from(err);
                tracing::debug!(action, error = %err, "action failed");
                let header = style("Unexpected error:").red().force_styling(self.styled);
                self.app.stderr(&format!("{}\n{:#}", header, err));
            }
        }
    }
}
