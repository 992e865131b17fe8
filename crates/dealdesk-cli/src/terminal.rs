use crate::{error::CliError, output::Output};
use dealdesk_core::{executor::ExecutionOutcome, interact::Presenter, schema::ColumnKind};
use rustyline::{Config, DefaultEditor, error::ReadlineError};

///
/// LineInput
///

#[derive(Debug, Eq, PartialEq)]
pub enum LineInput {
    Line(String),
    Interrupted,
    Eof,
}

///
/// TerminalPresenter
///
/// Line-edited prompts on stdin/stdout. Ctrl-C or Ctrl-D at any prompt
/// aborts the running operation.
///

pub struct TerminalPresenter {
    editor: DefaultEditor,
    output: Output,
}

impl TerminalPresenter {
    pub fn new(output: Output, history_size: usize) -> Result<Self, CliError> {
        let config = Config::builder()
            .max_history_size(history_size)?
            .auto_add_history(false)
            .build();
        let editor = DefaultEditor::with_config(config)?;

        Ok(Self { editor, output })
    }

    /// Read one line; only shell commands go into history.
    pub fn read_line(&mut self, prompt: &str, remember: bool) -> Result<LineInput, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if remember && !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(LineInput::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(LineInput::Interrupted),
            Err(ReadlineError::Eof) => Ok(LineInput::Eof),
            Err(err) => Err(err.into()),
        }
    }

    fn prompt(&mut self, prompt: &str) -> Option<String> {
        match self.read_line(prompt, false) {
            Ok(LineInput::Line(line)) => Some(line.trim().to_string()),
            Ok(LineInput::Interrupted | LineInput::Eof) => None,
            Err(err) => {
                tracing::warn!(error = %err, "prompt failed");
                None
            }
        }
    }
}

impl Presenter for TerminalPresenter {
    fn choose_one(&mut self, prompt: &str, options: &[String]) -> Option<usize> {
        println!("{prompt}");
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }

        loop {
            let answer = self.prompt("> ")?;

            let by_name = options.iter().position(|option| *option == answer);
            let by_number = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .filter(|index| *index < options.len());

            match by_name.or(by_number) {
                Some(index) => return Some(index),
                None => println!("Invalid choice. Please try again."),
            }
        }
    }

    fn prompt_value(&mut self, label: &str, kind: Option<ColumnKind>) -> Option<String> {
        let prompt = match kind {
            Some(kind) => format!("{label} [{}]: ", kind.hint()),
            None => format!("{label}: "),
        };

        self.prompt(&prompt)
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.prompt(&format!("{message} (yes/no): "))
            .is_some_and(|answer| {
                answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("y")
            })
    }

    fn report(&mut self, outcome: &ExecutionOutcome) {
        match self.output.outcome(outcome) {
            Ok(text) => println!("{text}"),
            Err(_) => println!("{}", outcome.summary()),
        }
    }

    fn notify(&mut self, message: &str) {
        println!("{message}");
    }
}
