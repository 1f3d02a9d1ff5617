// Console seam for the menu. `ConsoleTerminal` is the real thing built on
// dialoguer, indicatif and crossterm; tests script their own `Terminal`.

use anyhow::{bail, Result};
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::time::Duration;

/// How a printed line should be emphasized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Error,
}

/// Line-oriented console used by the menu controller.
pub trait Terminal {
    /// Show `prompt` and read one line of input. Empty input is allowed;
    /// end of input is an error.
    fn prompt(&mut self, prompt: &str) -> Result<String>;

    /// Print a plain line.
    fn print(&mut self, line: &str);

    /// Print a line with emphasis. Defaults to a plain line.
    fn print_toned(&mut self, _tone: Tone, line: &str) {
        self.print(line);
    }

    /// Run a blocking job while showing `message` as progress.
    fn working<R>(&self, _message: &str, job: impl FnOnce() -> R) -> R {
        job()
    }
}

/// Plain line terminal over any reader/writer pair. Used when the console
/// is not interactive (piped stdin, redirected stderr).
pub struct LineTerminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineTerminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LineTerminal { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}

impl<R: BufRead, W: Write> Terminal for LineTerminal<R, W> {
    fn prompt(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("end of input while waiting for: {}", prompt);
        }
        // Only the line terminator is stripped; the rest is compared as typed.
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    fn print(&mut self, line: &str) {
        let _ = writeln!(self.output, "{}", line);
    }
}

/// The process console. Uses dialoguer prompts when attended, otherwise
/// reads stdin line by line.
pub struct ConsoleTerminal {
    piped: Option<LineTerminal<StdinLock<'static>, Stdout>>,
    styled: bool,
}

impl Default for ConsoleTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleTerminal {
    pub fn new() -> Self {
        // dialoguer draws on stderr and returns "" without reading when it
        // is not a terminal.
        let attended = io::stdin().is_tty() && io::stderr().is_tty();
        let piped = (!attended).then(|| LineTerminal::new(io::stdin().lock(), io::stdout()));
        tracing::debug!(attended, "console mode");
        ConsoleTerminal {
            piped,
            styled: io::stdout().is_tty(),
        }
    }
}

impl Terminal for ConsoleTerminal {
    fn prompt(&mut self, prompt: &str) -> Result<String> {
        if let Some(lines) = &mut self.piped {
            return lines.prompt(prompt);
        }
        // `Input::interact_text()` shows the prompt followed by ": ".
        let line: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(line)
    }

    fn print(&mut self, line: &str) {
        println!("{}", line);
    }

    fn print_toned(&mut self, tone: Tone, line: &str) {
        println!("{}", toned_line(tone, line, self.styled));
    }

    fn working<R>(&self, message: &str, job: impl FnOnce() -> R) -> R {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        let out = job();
        spinner.finish_and_clear();
        out
    }
}

/// Color `line` for `tone`, or leave it untouched when output is not a
/// terminal.
fn toned_line(tone: Tone, line: &str, styled: bool) -> String {
    if !styled {
        return line.to_string();
    }
    match tone {
        Tone::Success => line.green().to_string(),
        Tone::Warning => line.yellow().to_string(),
        Tone::Error => line.red().to_string(),
    }
}
