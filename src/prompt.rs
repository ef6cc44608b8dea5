//! Operator prompts
//!
//! The inventory only asks an operator for input in three places: the project
//! root, which dependency sections to export, and a repository link when a
//! package manifest has none. All three go through the [`Prompt`] trait so the
//! rest of the crate can run without a terminal.

use crate::error::{InventoryError, Result};
use std::io::{self, BufRead, Write};

/// Source of operator answers
pub trait Prompt {
    /// Ask a free-text question; the answer is returned trimmed
    fn input(&self, message: &str) -> Result<String>;

    /// Ask a single-choice question; returns the index of the chosen entry
    fn select(&self, message: &str, choices: &[&str]) -> Result<usize>;
}

/// Interactive prompt on stdin/stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn read_answer() -> Result<Option<String>> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl Prompt for TerminalPrompt {
    fn input(&self, message: &str) -> Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "? {} ", message)?;
        stdout.flush()?;
        drop(stdout);

        Ok(Self::read_answer()?.unwrap_or_default())
    }

    fn select(&self, message: &str, choices: &[&str]) -> Result<usize> {
        if choices.is_empty() {
            return Err(InventoryError::prompt("no choices to select from"));
        }

        loop {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "? {}", message)?;
            for (i, choice) in choices.iter().enumerate() {
                writeln!(stdout, "  {}) {}", i + 1, choice)?;
            }
            write!(stdout, "  Answer [1-{}]: ", choices.len())?;
            stdout.flush()?;
            drop(stdout);

            let Some(answer) = Self::read_answer()? else {
                return Err(InventoryError::prompt("input closed before a choice was made"));
            };

            match answer.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Ok(n - 1),
                _ => eprintln!("Please enter a number between 1 and {}", choices.len()),
            }
        }
    }
}

/// Prompt for unattended runs: free text is empty, selections take the first choice
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractivePrompt;

impl Prompt for NonInteractivePrompt {
    fn input(&self, _message: &str) -> Result<String> {
        Ok(String::new())
    }

    fn select(&self, _message: &str, choices: &[&str]) -> Result<usize> {
        if choices.is_empty() {
            return Err(InventoryError::prompt("no choices to select from"));
        }
        Ok(0)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned answers and records every question asked
    #[derive(Default)]
    pub struct ScriptedPrompt {
        answers: RefCell<VecDeque<String>>,
        pub asked: RefCell<Vec<String>>,
    }

    impl ScriptedPrompt {
        pub fn with_answers(answers: &[&str]) -> Self {
            Self {
                answers: RefCell::new(answers.iter().map(|a| a.to_string()).collect()),
                asked: RefCell::default(),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn input(&self, message: &str) -> Result<String> {
            self.asked.borrow_mut().push(message.to_string());
            Ok(self.answers.borrow_mut().pop_front().unwrap_or_default())
        }

        fn select(&self, message: &str, choices: &[&str]) -> Result<usize> {
            self.asked.borrow_mut().push(message.to_string());
            let answer = self.answers.borrow_mut().pop_front().unwrap_or_default();
            Ok(choices.iter().position(|c| *c == answer).unwrap_or(0))
        }
    }
}
