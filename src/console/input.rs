use std::io;

use super::Console;
use crate::domain::Decision;

/// A validated answer to the removal prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    /// Empty input: take the suggested default
    Default,
}

/// Maps a line of input to an answer; `None` means ask again
pub fn parse_answer(input: &str) -> Option<Answer> {
    let input = input.trim();
    if input.is_empty() {
        Some(Answer::Default)
    } else if input.eq_ignore_ascii_case("y") {
        Some(Answer::Yes)
    } else if input.eq_ignore_ascii_case("n") {
        Some(Answer::No)
    } else {
        None
    }
}

/// The capital letter marks the default
pub fn removal_prompt(default_remove: bool) -> &'static str {
    if default_remove {
        "Remove follower? (Y/n): "
    } else {
        "Remove follower? (y/N): "
    }
}

/// Ask until a valid answer arrives. The default is fixed by the caller
/// before the first prompt and never re-evaluated between attempts.
pub fn ask_removal<C: Console + ?Sized>(console: &mut C, default_remove: bool) -> io::Result<Decision> {
    let prompt = removal_prompt(default_remove);
    loop {
        let line = console.read_line(prompt)?;
        match parse_answer(&line) {
            Some(Answer::Yes) => return Ok(Decision::Remove),
            Some(Answer::No) => return Ok(Decision::Keep),
            Some(Answer::Default) => return Ok(Decision::from_remove(default_remove)),
            None => continue,
        }
    }
}
