use crate::{executor::ExecutionOutcome, interact::Presenter, schema::ColumnKind};
use std::collections::VecDeque;

///
/// Transcript
///
/// Everything a scripted session showed the operator.
///

#[derive(Clone, Debug, Default)]
pub struct Transcript {
    pub prompts: Vec<String>,
    pub notices: Vec<String>,
    pub outcomes: Vec<ExecutionOutcome>,
}

///
/// ScriptedPresenter
///
/// Presenter fed from a fixed list of answers, one per prompt. Choices
/// accept either the option text or its 1-based position; confirmation
/// accepts `yes`/`y`. Running out of answers aborts. Drives operations
/// without a terminal, as in tests.
///

#[derive(Clone, Debug, Default)]
pub struct ScriptedPresenter {
    answers: VecDeque<String>,
    transcript: Transcript,
}

impl ScriptedPresenter {
    pub fn new<I, T>(answers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Transcript::default(),
        }
    }

    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, prompt: impl Into<String>) -> Option<String> {
        self.transcript.prompts.push(prompt.into());
        self.answers.pop_front()
    }
}

impl Presenter for ScriptedPresenter {
    fn choose_one(&mut self, prompt: &str, options: &[String]) -> Option<usize> {
        loop {
            let answer = self.next_answer(prompt)?;
            let answer = answer.trim();

            let by_name = options.iter().position(|option| option == answer);
            let by_number = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .filter(|index| *index < options.len());

            match by_name.or(by_number) {
                Some(index) => return Some(index),
                None => self
                    .transcript
                    .notices
                    .push("Invalid choice. Please try again.".to_string()),
            }
        }
    }

    fn prompt_value(&mut self, label: &str, kind: Option<ColumnKind>) -> Option<String> {
        let prompt = match kind {
            Some(kind) => format!("{label} [{}]", kind.hint()),
            None => label.to_string(),
        };

        self.next_answer(prompt).map(|answer| answer.trim().to_string())
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.next_answer(message).is_some_and(|answer| {
            let answer = answer.trim();
            answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("y")
        })
    }

    fn report(&mut self, outcome: &ExecutionOutcome) {
        self.transcript.outcomes.push(outcome.clone());
    }

    fn notify(&mut self, message: &str) {
        self.transcript.notices.push(message.to_string());
    }
}
