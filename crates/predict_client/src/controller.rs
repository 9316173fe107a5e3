//! Idle/loading/result state behind the diagnosis form.

use survey_types::{FormState, Outcome};

use crate::{PredictConfig, Transport, submit};

/// Submit button text while idle.
pub const BUTTON_IDLE: &str = "Diagnose";

/// Submit button text while a submission is in flight.
pub const BUTTON_LOADING: &str = "Diagnosing...";

/// State transitions of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// One input changed.
    FieldChanged { key: String, value: String },
    /// The user pressed the submit button.
    SubmitStarted,
    /// The in-flight submission settled.
    Settled(Outcome),
}

/// Everything the form owns: answers, loading flag and last outcome.
///
/// Transitions go through [`FormController::apply`], which returns a new
/// snapshot so the view re-renders on every change. Settlement updates
/// the outcome and the loading flag in one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormController {
    form: FormState,
    loading: bool,
    outcome: Option<Outcome>,
}

impl FormController {
    /// Create a controller with an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle controller holding `form`.
    pub fn with_form(form: FormState) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Whether a submission is in flight. The submit control is disabled
    /// exactly while this is true.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Outcome of the last settled submission, if any.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Text for the result panel. `None` means no panel.
    pub fn result_text(&self) -> Option<&str> {
        self.outcome.as_ref().and_then(Outcome::display)
    }

    pub fn button_label(&self) -> &'static str {
        if self.loading {
            BUTTON_LOADING
        } else {
            BUTTON_IDLE
        }
    }

    /// Apply one action and return the next snapshot.
    ///
    /// A submit while loading and a settlement while idle are ignored.
    pub fn apply(&self, action: FormAction) -> Self {
        match action {
            FormAction::FieldChanged { key, value } => match self.form.with_value(&key, value) {
                Ok(form) => Self {
                    form,
                    ..self.clone()
                },
                Err(e) => {
                    tracing::debug!(error = %e, "ignoring change to unknown field");
                    self.clone()
                }
            },
            FormAction::SubmitStarted if self.loading => self.clone(),
            FormAction::SubmitStarted => Self {
                form: self.form.clone(),
                loading: true,
                outcome: None,
            },
            FormAction::Settled(outcome) if self.loading => Self {
                form: self.form.clone(),
                loading: false,
                outcome: Some(outcome),
            },
            FormAction::Settled(_) => self.clone(),
        }
    }

    /// Start a submission, returning the snapshot to send, or `None` if
    /// one is already in flight.
    pub fn begin_submit(&mut self) -> Option<FormState> {
        if self.loading {
            return None;
        }
        *self = self.apply(FormAction::SubmitStarted);
        Some(self.form.clone())
    }

    /// Run one full submission: start, send, settle.
    ///
    /// Returns the settled outcome, or `None` if a submission was already
    /// in flight.
    pub async fn run_submit<T: Transport>(
        &mut self,
        transport: &T,
        config: &PredictConfig,
    ) -> Option<Outcome> {
        let snapshot = self.begin_submit()?;
        let outcome = submit(transport, config, &snapshot).await;
        *self = self.apply(FormAction::Settled(outcome.clone()));
        Some(outcome)
    }
}
