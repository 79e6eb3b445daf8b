//! Interactive report prompt.
//!
//! The default implementation walks the form on the terminal: prompts go
//! to stderr, answers come from stdin, so stdout stays clean for piping.
//! Input interpretation is split into pure helpers so it can be tested
//! without a terminal.

use crate::form::{FormDescriptor, ReportData};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use thiserror::Error;

/// Errors from showing a report form.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Shows a report form and collects the user's answers.
pub trait ReportPrompt {
    /// Displays the form. Resolves with `None` when the user cancels.
    async fn show(&self, form: &FormDescriptor) -> Result<Option<ReportData>, PromptError>;
}

/// How one line of input answers one field.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Answer {
    /// Abort the whole form.
    Cancel,
    /// Keep the field's pre-filled value, or leave it empty.
    Keep,
    /// Use this value.
    Value(String),
}

/// Interprets a raw input line as a field answer.
fn parse_answer(input: &str) -> Answer {
    let trimmed = input.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "cancel" | "quit" | "q" => Answer::Cancel,
        "" => Answer::Keep,
        _ => Answer::Value(trimmed.to_string()),
    }
}

/// Interprets a raw input line as the final confirmation. Empty input
/// confirms; anything but a yes does not.
fn parse_confirm(input: &str) -> bool {
    matches!(
        input.trim().to_ascii_lowercase().as_str(),
        "" | "y" | "yes"
    )
}

/// Terminal-based form renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn run(form: &FormDescriptor) -> Result<Option<ReportData>, PromptError> {
        let mut stderr = std::io::stderr().lock();
        let mut stdin = std::io::stdin().lock();

        writeln!(stderr, "\n{}", form.title)?;
        writeln!(stderr, "{}\n", form.description)?;
        writeln!(stderr, "Press Enter to keep a [default], type 'cancel' to abort.\n")?;

        let mut values = BTreeMap::new();
        for field in &form.fields {
            loop {
                match field.value.as_deref().or(field.placeholder.as_deref()) {
                    Some(hint) => write!(stderr, "{} [{hint}]: ", field.label)?,
                    None => write!(stderr, "{}: ", field.label)?,
                }
                stderr.flush()?;

                let mut line = String::new();
                if stdin.read_line(&mut line)? == 0 {
                    // EOF on stdin is a cancel, not an error.
                    return Ok(None);
                }
                match parse_answer(&line) {
                    Answer::Cancel => return Ok(None),
                    Answer::Value(value) => {
                        values.insert(field.name.clone(), value);
                        break;
                    }
                    Answer::Keep => {
                        if let Some(value) = &field.value {
                            values.insert(field.name.clone(), value.clone());
                            break;
                        }
                        if !field.required {
                            break;
                        }
                        writeln!(stderr, "  this field is required")?;
                    }
                }
            }
        }

        write!(stderr, "\n{} [Y/n]: ", form.confirm_label)?;
        stderr.flush()?;
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 || !parse_confirm(&line) {
            return Ok(None);
        }

        Ok(Some(ReportData {
            values,
            extra: form.extra.clone(),
        }))
    }
}

impl ReportPrompt for TerminalPrompt {
    async fn show(&self, form: &FormDescriptor) -> Result<Option<ReportData>, PromptError> {
        let form = form.clone();
        tokio::task::spawn_blocking(move || Self::run(&form)).await?
    }
}
