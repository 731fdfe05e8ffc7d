//! Interactive prompt seam
//!
//! The pipeline talks to the user through the `Prompter` trait so the
//! question flow can be driven by dialoguer in the terminal and by a
//! scripted queue in tests. Validation failures re-prompt at this layer
//! and never escape it.

use std::collections::VecDeque;
use std::sync::Mutex;

use dialoguer::{Confirm, Input, Select};

use crate::error::{Error, Result};

/// Per-answer validation; `Err` carries the message shown before re-prompting
pub type Validator<'v> = &'v dyn Fn(&str) -> std::result::Result<(), String>;

/// Declarative question surface used by the init pipeline
pub trait Prompter {
    /// Ask a yes/no question
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Ask for a line of input, re-prompting until `validate` accepts
    fn input(&self, message: &str, default: Option<&str>, validate: Validator<'_>) -> Result<String>;

    /// Ask the user to pick one of `items`, returning its index
    fn select(&self, message: &str, items: &[String]) -> Result<usize>;
}

/// Dialoguer-backed prompter for real terminal sessions
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(|e| Error::prompt(e.to_string()))
    }

    fn input(&self, message: &str, default: Option<&str>, validate: Validator<'_>) -> Result<String> {
        let result = match default {
            Some(default) => Input::<String>::new()
                .with_prompt(message)
                .default(default.to_string())
                .validate_with(|answer: &String| validate(answer))
                .interact_text(),
            None => Input::<String>::new()
                .with_prompt(message)
                .validate_with(|answer: &String| validate(answer))
                .interact_text(),
        };
        result.map_err(|e| Error::prompt(e.to_string()))
    }

    fn select(&self, message: &str, items: &[String]) -> Result<usize> {
        Select::new()
            .with_prompt(message)
            .items(items)
            .default(0)
            .interact()
            .map_err(|e| Error::prompt(e.to_string()))
    }
}

/// Queue-driven prompter for tests.
///
/// Answers are consumed in order. Invalid input answers are skipped the way
/// a re-prompt would skip them; running out of answers is an error. Every
/// question asked is recorded so tests can assert on the interaction shape.
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    /// Create a prompter that will answer with `answers`, in order
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Every question asked so far, in `kind: message` form
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().expect("prompt log lock").clone()
    }

    fn record(&self, kind: &str, message: &str) {
        self.asked
            .lock()
            .expect("prompt log lock")
            .push(format!("{kind}: {message}"));
    }

    fn next_answer(&self) -> Result<String> {
        self.answers
            .lock()
            .expect("prompt answers lock")
            .pop_front()
            .ok_or_else(|| Error::prompt("scripted answers exhausted"))
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        self.record("confirm", message);
        let answer = self.next_answer()?;
        Ok(matches!(answer.as_str(), "y" | "yes" | "true"))
    }

    fn input(&self, message: &str, default: Option<&str>, validate: Validator<'_>) -> Result<String> {
        self.record("input", message);
        loop {
            let answer = match self.next_answer() {
                Ok(answer) => answer,
                // An empty queue entry for a defaulted question takes the default
                Err(e) => match default {
                    Some(default) => return Ok(default.to_string()),
                    None => return Err(e),
                },
            };
            if answer.is_empty() {
                if let Some(default) = default {
                    return Ok(default.to_string());
                }
            }
            match validate(&answer) {
                Ok(()) => return Ok(answer),
                Err(_) => continue,
            }
        }
    }

    fn select(&self, message: &str, items: &[String]) -> Result<usize> {
        self.record("select", message);
        let answer = self.next_answer()?;
        if let Some(index) = items.iter().position(|item| *item == answer) {
            return Ok(index);
        }
        answer
            .parse::<usize>()
            .ok()
            .filter(|i| *i < items.len())
            .ok_or_else(|| Error::prompt(format!("no scripted match for '{answer}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_input_skips_invalid_answers() {
        let prompter = ScriptedPrompter::new(["bad!", "good"]);
        let answer = prompter
            .input("name", None, &|s| {
                if s.chars().all(char::is_alphanumeric) {
                    Ok(())
                } else {
                    Err("invalid".to_string())
                }
            })
            .unwrap();
        assert_eq!(answer, "good");
    }

    #[test]
    fn scripted_select_matches_labels_and_indices() {
        let items: Vec<String> = ["alpha", "beta"].map(String::from).to_vec();
        let prompter = ScriptedPrompter::new(["beta", "0"]);
        assert_eq!(prompter.select("pick", &items).unwrap(), 1);
        assert_eq!(prompter.select("pick", &items).unwrap(), 0);
    }

    #[test]
    fn empty_answer_takes_default() {
        let prompter = ScriptedPrompter::new([""]);
        let answer = prompter.input("version", Some("1.0.0"), &|_| Ok(())).unwrap();
        assert_eq!(answer, "1.0.0");
    }

    #[test]
    fn exhausted_answers_error() {
        let prompter = ScriptedPrompter::new(Vec::<String>::new());
        assert!(prompter.confirm("sure?", false).is_err());
    }

    #[test]
    fn questions_are_recorded() {
        let prompter = ScriptedPrompter::new(["y"]);
        prompter.confirm("continue?", false).unwrap();
        assert_eq!(prompter.asked(), ["confirm: continue?"]);
    }
}
