//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts behind the [`Prompter`] trait

use std::collections::VecDeque;
use std::io;
use std::sync::{Mutex, MutexGuard};

use console::{style, Term};

use crate::error::{FlowError, Result};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_choices, display_error, display_info, display_state,
    display_status, display_success, format_state,
};

/// Source of answers to interactive questions
pub trait Prompter: Send + Sync {
    /// Ask a free-text question. The answer is trimmed and may be empty.
    fn input(&self, question: &str) -> Result<String>;

    /// Ask the user to pick one of `choices`, returning the chosen value.
    fn select(&self, question: &str, choices: &[&str]) -> Result<String>;
}

/// Resolve a 1-based selection, with empty input meaning the first choice.
pub fn resolve_selection(answer: &str, choices: &[&str]) -> Result<String> {
    let answer = answer.trim();
    let index = if answer.is_empty() {
        1
    } else {
        match answer.parse::<usize>() {
            Ok(n) => n,
            // Typing the value itself is accepted too
            Err(_) => {
                return choices
                    .iter()
                    .find(|c| c.eq_ignore_ascii_case(answer))
                    .map(|c| c.to_string())
                    .ok_or_else(|| FlowError::prompt(format!("invalid selection '{}'", answer)));
            }
        }
    };

    if index > 0 && index <= choices.len() {
        Ok(choices[index - 1].to_string())
    } else {
        Err(FlowError::prompt(format!("invalid selection '{}'", answer)))
    }
}

/// Prompts on stderr and reads answers from stdin
#[derive(Debug, Clone)]
pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        TerminalPrompter {
            term: Term::stderr(),
        }
    }

    fn ask(&self, prompt: &str) -> Result<String> {
        self.term
            .write_str(prompt)
            .and_then(|_| self.term.flush())
            .map_err(|e| FlowError::prompt(e.to_string()))?;
        let mut line = String::new();
        let read = io::stdin()
            .read_line(&mut line)
            .map_err(|e| FlowError::prompt(e.to_string()))?;
        if read == 0 {
            return Err(FlowError::prompt("input closed before an answer was given"));
        }
        Ok(line.trim().to_string())
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn input(&self, question: &str) -> Result<String> {
        self.ask(&format!("{} {} ", style("?").green(), style(question).bold()))
    }

    fn select(&self, question: &str, choices: &[&str]) -> Result<String> {
        if choices.is_empty() {
            return Err(FlowError::prompt("nothing to choose from"));
        }
        if choices.len() == 1 {
            return Ok(choices[0].to_string());
        }

        display_choices(question, choices);
        let answer = self.ask(&format!("\nSelect (1-{}) [default: 1]: ", choices.len()))?;
        resolve_selection(&answer, choices)
    }
}

/// Answers questions from a fixed script, in order
///
/// Selections are answered with the value itself. Every question asked is
/// recorded so tests can check what the user would have seen.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompter {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        lock(&self.asked).clone()
    }

    /// Answers left unused
    pub fn remaining(&self) -> usize {
        lock(&self.answers).len()
    }

    fn next(&self, question: &str) -> Result<String> {
        lock(&self.asked).push(question.to_string());
        lock(&self.answers)
            .pop_front()
            .ok_or_else(|| FlowError::prompt(format!("no answer scripted for '{}'", question)))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Prompter for ScriptedPrompter {
    fn input(&self, question: &str) -> Result<String> {
        Ok(self.next(question)?.trim().to_string())
    }

    fn select(&self, question: &str, choices: &[&str]) -> Result<String> {
        let answer = self.next(question)?;
        resolve_selection(&answer, choices)
    }
}
