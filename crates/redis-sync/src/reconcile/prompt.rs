//! Operator decisions for conflicts the flags do not settle.

use std::collections::VecDeque;
use std::io::{self, BufRead, Stderr, StdinLock, Write};

use crate::error::{Result, SyncError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

/// `y`/`Y` as the first non-blank character means yes; anything else,
/// including an empty line, means no.
pub fn parse_answer(line: &str) -> Answer {
    match line.trim_start().chars().next() {
        Some('y') | Some('Y') => Answer::Yes,
        _ => Answer::No,
    }
}

pub trait DecisionProvider {
    /// Asks a yes/no question. Failing to obtain an answer is an error,
    /// never an implicit "no".
    fn confirm(&mut self, question: &str) -> Result<Answer>;
}

/// Line-oriented prompt over any reader and writer.
pub struct InteractivePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractivePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl InteractivePrompt<StdinLock<'static>, Stderr> {
    /// Reads answers from stdin and asks on stderr, leaving stdout to the
    /// command output.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> DecisionProvider for InteractivePrompt<R, W> {
    fn confirm(&mut self, question: &str) -> Result<Answer> {
        write!(self.output, "{} [y/N] ", question)
            .and_then(|_| self.output.flush())
            .map_err(|e| SyncError::UserInput(e.to_string()))?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| SyncError::UserInput(e.to_string()))?;
        if read == 0 {
            return Err(SyncError::UserInput("end of input".to_string()));
        }

        Ok(parse_answer(&line))
    }
}

/// Answers from a fixed script, in order. Running out of answers is an
/// input failure.
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    answers: VecDeque<Answer>,
    questions: Vec<String>,
}

impl ScriptedDecisions {
    pub fn new<I>(answers: I) -> Self
    where
        I: IntoIterator<Item = Answer>,
    {
        Self {
            answers: answers.into_iter().collect(),
            questions: Vec::new(),
        }
    }

    /// Builds the script from raw input lines, parsed like typed answers.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(lines.into_iter().map(|line| parse_answer(line.as_ref())))
    }

    /// A script that fails as soon as a question is asked.
    pub fn none() -> Self {
        Self::default()
    }

    /// Questions asked so far.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn confirm(&mut self, question: &str) -> Result<Answer> {
        self.questions.push(question.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| SyncError::UserInput("no answer left".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("y\n"), Answer::Yes);
        assert_eq!(parse_answer("  Yes"), Answer::Yes);
        assert_eq!(parse_answer("n"), Answer::No);
        assert_eq!(parse_answer("N\n"), Answer::No);
        assert_eq!(parse_answer("x"), Answer::No);
        assert_eq!(parse_answer(""), Answer::No);
    }

    #[test]
    fn test_interactive_prompt_reads_one_line_per_question() {
        let mut output = Vec::new();
        {
            let mut prompt = InteractivePrompt::new(Cursor::new("y\nq\n"), &mut output);
            assert_eq!(prompt.confirm("first?").unwrap(), Answer::Yes);
            assert_eq!(prompt.confirm("second?").unwrap(), Answer::No);
        }
        let written = String::from_utf8(output).unwrap();
        assert_eq!(written, "first? [y/N] second? [y/N] ");
    }

    #[test]
    fn test_interactive_prompt_end_of_input_fails() {
        let mut prompt = InteractivePrompt::new(Cursor::new(""), Vec::new());
        let err = prompt.confirm("overwrite?").unwrap_err();
        assert!(matches!(err, SyncError::UserInput(_)));
        assert_eq!(err.code(), 17);
    }

    #[test]
    fn test_scripted_decisions() {
        let mut script = ScriptedDecisions::from_lines(["y", "nope"]);
        assert_eq!(script.confirm("a").unwrap(), Answer::Yes);
        assert_eq!(script.confirm("b").unwrap(), Answer::No);
        assert!(script.confirm("c").is_err());
        assert_eq!(script.questions(), ["a", "b", "c"]);
    }
}
