//! Conversation state machine: the guided upload → budget → mood → verdict
//! flow.
//!
//! DESIGN
//! ======
//! `Session` owns the message log, the selections, and the current step.
//! `Session::apply` is a pure transition: it validates that the current step
//! accepts the event, mutates the session, and returns effect descriptors
//! (delayed prompts, advisor calls) for the runner to execute. Advisor
//! completions come back as `*Settled` events through the same function, so
//! every log mutation happens in one serialized place.
//!
//! LOADING PLACEHOLDERS
//! ====================
//! Before an advisor call starts, a loading message is appended and its id
//! is captured in a `Ticket`. The matching settle event removes that exact
//! message before appending any outcome. Only one ticket is in flight at a
//! time: analyze is only reachable from `SelectMood` and visualize only from
//! `Completed`.
//!
//! STALE EVENTS
//! ============
//! The epoch increments whenever the conversation restarts (reset or failed
//! analysis). Settle events and due prompts from an older epoch, or whose
//! ticket is no longer in flight, are dropped without touching the log.

use serde::Serialize;
use tracing::debug;

use crate::advisor::types::{ImageRef, Verdict};

use super::context::{ContextPatch, SessionContext};
use super::copy;
use super::log::MessageLog;
use super::message::{MessageDraft, MessageId};
use super::options::{Budget, Mood};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    UploadPhoto,
    SelectBudget,
    SelectMood,
    Analyzing,
    Completed,
    Visualizing,
}

impl Step {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UploadPhoto => "UPLOAD_PHOTO",
            Self::SelectBudget => "SELECT_BUDGET",
            Self::SelectMood => "SELECT_MOOD",
            Self::Analyzing => "ANALYZING",
            Self::Completed => "COMPLETED",
            Self::Visualizing => "VISUALIZING",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one in-flight advisor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub epoch: u64,
    pub loading_id: MessageId,
}

/// Assistant prompts appended after a short delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Budget,
    Mood,
}

/// The single failure kind an advisor call reports to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("advisory call failed")]
pub struct AdvisoryCallFailed;

pub type Outcome<T> = Result<T, AdvisoryCallFailed>;

#[derive(Debug, Clone)]
pub enum Event {
    PhotoSupplied(ImageRef),
    BudgetChosen(Budget),
    MoodChosen(Mood),
    AnalyzeSettled { ticket: Ticket, outcome: Outcome<Verdict> },
    VisualizeRequested,
    VisualizeSettled { ticket: Ticket, outcome: Outcome<ImageRef> },
    ResetRequested,
    PromptDue { epoch: u64, prompt: Prompt },
}

impl Event {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PhotoSupplied(_) => "photo",
            Self::BudgetChosen(_) => "budget",
            Self::MoodChosen(_) => "mood",
            Self::AnalyzeSettled { .. } => "analyze_settled",
            Self::VisualizeRequested => "visualize",
            Self::VisualizeSettled { .. } => "visualize_settled",
            Self::ResetRequested => "reset",
            Self::PromptDue { .. } => "prompt_due",
        }
    }
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SchedulePrompt { epoch: u64, prompt: Prompt },
    StartAnalyze { ticket: Ticket, image: ImageRef, budget: Budget, mood: Mood },
    StartVisualize { ticket: Ticket, image: ImageRef, verdict: Verdict, mood: Mood },
}

#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("'{event}' is not accepted while {step}")]
    NotAccepted { step: Step, event: &'static str },
    #[error("session has no {0} yet")]
    MissingContext(&'static str),
}

impl crate::error::ErrorCode for TransitionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotAccepted { .. } => "E_TRANSITION_REJECTED",
            Self::MissingContext(_) => "E_MISSING_CONTEXT",
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

#[derive(Debug, Clone)]
pub struct Session {
    step: Step,
    log: MessageLog,
    context: SessionContext,
    epoch: u64,
    in_flight: Option<Ticket>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: Step::UploadPhoto,
            log: MessageLog::new(MessageDraft::assistant_text(copy::GREETING)),
            context: SessionContext::default(),
            epoch: 0,
            in_flight: None,
        }
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight
    }

    /// Whether a presentation layer should offer the visualize action.
    /// False once a visualization has been shown.
    #[must_use]
    pub fn can_visualize(&self) -> bool {
        self.step == Step::Completed && self.has_visualize_inputs() && !self.log.has_visualization()
    }

    fn has_visualize_inputs(&self) -> bool {
        self.context.image.is_some() && self.context.verdict.is_some() && self.context.mood.is_some()
    }

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the current step does not accept the
    /// event or the selections it needs are missing. The session is left
    /// untouched in that case.
    pub fn apply(&mut self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        match (self.step, event) {
            (Step::UploadPhoto, Event::PhotoSupplied(image)) => Ok(self.on_photo(image)),
            (Step::SelectBudget, Event::BudgetChosen(budget)) => Ok(self.on_budget(budget)),
            (Step::SelectMood, Event::MoodChosen(mood)) => self.on_mood(mood),
            (Step::Completed, Event::VisualizeRequested) => self.on_visualize(),
            (Step::Completed, Event::ResetRequested) => Ok(self.on_reset()),
            (_, Event::AnalyzeSettled { ticket, outcome }) => Ok(self.on_analyze_settled(ticket, outcome)),
            (_, Event::VisualizeSettled { ticket, outcome }) => Ok(self.on_visualize_settled(ticket, outcome)),
            (_, Event::PromptDue { epoch, prompt }) => Ok(self.on_prompt_due(epoch, prompt)),
            (step, event) => Err(TransitionError::NotAccepted { step, event: event.name() }),
        }
    }

    fn on_photo(&mut self, image: ImageRef) -> Vec<Effect> {
        self.context.merge(ContextPatch { image: Some(image.clone()), ..Default::default() });
        self.log.append(MessageDraft::user_image(image));
        self.step = Step::SelectBudget;
        vec![Effect::SchedulePrompt { epoch: self.epoch, prompt: Prompt::Budget }]
    }

    fn on_budget(&mut self, budget: Budget) -> Vec<Effect> {
        self.context.merge(ContextPatch { budget: Some(budget), ..Default::default() });
        self.log.append(MessageDraft::user_text(budget.as_str()));
        self.step = Step::SelectMood;
        vec![Effect::SchedulePrompt { epoch: self.epoch, prompt: Prompt::Mood }]
    }

    fn on_mood(&mut self, mood: Mood) -> Result<Vec<Effect>, TransitionError> {
        let image = self.context.image.clone().ok_or(TransitionError::MissingContext("photo"))?;
        let budget = self.context.budget.ok_or(TransitionError::MissingContext("budget"))?;

        self.context.merge(ContextPatch { mood: Some(mood), ..Default::default() });
        self.log.append(MessageDraft::user_text(mood.as_str()));
        let ticket = self.begin_call(copy::ANALYZE_LOADING);
        self.step = Step::Analyzing;
        Ok(vec![Effect::StartAnalyze { ticket, image, budget, mood }])
    }

    fn on_visualize(&mut self) -> Result<Vec<Effect>, TransitionError> {
        let image = self.context.image.clone().ok_or(TransitionError::MissingContext("photo"))?;
        let verdict = self.context.verdict.clone().ok_or(TransitionError::MissingContext("verdict"))?;
        let mood = self.context.mood.ok_or(TransitionError::MissingContext("mood"))?;

        self.log.append(MessageDraft::user_text(copy::VISUALIZE_REQUEST));
        let ticket = self.begin_call(copy::VISUALIZE_LOADING);
        self.step = Step::Visualizing;
        Ok(vec![Effect::StartVisualize { ticket, image, verdict, mood }])
    }

    fn on_reset(&mut self) -> Vec<Effect> {
        self.restart();
        self.log.reset(MessageDraft::assistant_text(copy::RESET_GREETING));
        Vec::new()
    }

    fn on_analyze_settled(&mut self, ticket: Ticket, outcome: Outcome<Verdict>) -> Vec<Effect> {
        if self.step != Step::Analyzing || !self.settle_call(ticket) {
            debug!(epoch = ticket.epoch, loading_id = ticket.loading_id, "chat: dropping stale analyze settle");
            return Vec::new();
        }
        match outcome {
            Ok(verdict) => {
                self.log.append(MessageDraft::assistant_text(copy::ANALYZE_SUMMARY));
                self.log.append(MessageDraft::verdict(verdict.clone()));
                self.context.merge(ContextPatch { verdict: Some(verdict), ..Default::default() });
                self.step = Step::Completed;
            }
            Err(AdvisoryCallFailed) => {
                self.log.append(MessageDraft::assistant_text(copy::ANALYZE_APOLOGY));
                self.restart();
            }
        }
        Vec::new()
    }

    fn on_visualize_settled(&mut self, ticket: Ticket, outcome: Outcome<ImageRef>) -> Vec<Effect> {
        if self.step != Step::Visualizing || !self.settle_call(ticket) {
            debug!(epoch = ticket.epoch, loading_id = ticket.loading_id, "chat: dropping stale visualize settle");
            return Vec::new();
        }
        match outcome {
            Ok(image) => {
                self.log.append(MessageDraft::assistant_text(copy::VISUALIZE_CAPTION));
                self.log.append(MessageDraft::visualization(image));
            }
            Err(AdvisoryCallFailed) => {
                self.log.append(MessageDraft::assistant_text(copy::VISUALIZE_FALLBACK));
            }
        }
        self.step = Step::Completed;
        Vec::new()
    }

    fn on_prompt_due(&mut self, epoch: u64, prompt: Prompt) -> Vec<Effect> {
        let expected = match prompt {
            Prompt::Budget => Step::SelectBudget,
            Prompt::Mood => Step::SelectMood,
        };
        if epoch != self.epoch || self.step != expected {
            debug!(epoch, ?prompt, step = %self.step, "chat: dropping stale prompt");
            return Vec::new();
        }
        let draft = match prompt {
            Prompt::Budget => {
                MessageDraft::assistant_text(copy::BUDGET_PROMPT).with_options(Budget::ALL.map(Budget::as_str))
            }
            Prompt::Mood => MessageDraft::assistant_text(copy::MOOD_PROMPT).with_options(Mood::ALL.map(Mood::as_str)),
        };
        self.log.append(draft);
        Vec::new()
    }

    /// Append a loading placeholder and mark its call in flight.
    fn begin_call(&mut self, loading_text: &str) -> Ticket {
        let loading_id = self.log.append(MessageDraft::loading(loading_text));
        let ticket = Ticket { epoch: self.epoch, loading_id };
        self.in_flight = Some(ticket);
        ticket
    }

    /// Clear the in-flight ticket and its placeholder. Returns `false` when
    /// `ticket` is not the call currently in flight.
    fn settle_call(&mut self, ticket: Ticket) -> bool {
        if self.in_flight != Some(ticket) {
            return false;
        }
        self.in_flight = None;
        self.log.remove_by_id(ticket.loading_id);
        true
    }

    /// Back to the upload step with nothing carried over.
    fn restart(&mut self) {
        self.context.clear();
        self.epoch += 1;
        self.in_flight = None;
        self.step = Step::UploadPhoto;
    }
}

#[cfg(test)]
#[path = "machine_test.rs"]
mod tests;
