// Line-oriented console used by the handshake and the review loop

pub mod input;
pub mod render;

use std::io::{self, BufRead, Write};

pub use input::{ask_removal, parse_answer, removal_prompt, Answer};
pub use render::{render_summary, FollowerSummary};

/// Where summaries and prompts go, and where answers come from
pub trait Console {
    /// Print one informational line
    fn println(&mut self, line: &str) -> io::Result<()>;

    /// Present one follower awaiting a decision
    fn show_summary(&mut self, summary: &FollowerSummary<'_>) -> io::Result<()>;

    /// Print `prompt` and read one line without its line terminator.
    /// End of input is an `UnexpectedEof` error.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;
}

/// Console backed by stdin and stdout
#[derive(Debug)]
pub struct StdConsole {
    color: bool,
}

impl StdConsole {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl Console for StdConsole {
    fn println(&mut self, line: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{}", line)
    }

    fn show_summary(&mut self, summary: &FollowerSummary<'_>) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout)?;
        for line in render_summary(summary, self.color) {
            writeln!(stdout, "{}", line)?;
        }
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        {
            let mut stdout = io::stdout().lock();
            write!(stdout, "{}", prompt)?;
            stdout.flush()?;
        }

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }
}
