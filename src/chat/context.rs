//! Per-conversation selections: photo, budget, mood, and the last verdict.

use crate::advisor::types::{ImageRef, Verdict};

use super::options::{Budget, Mood};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub image: Option<ImageRef>,
    pub budget: Option<Budget>,
    pub mood: Option<Mood>,
    /// Kept so the visualize step can reuse the recommendations.
    pub verdict: Option<Verdict>,
}

/// Fields to overwrite; `None` leaves the current value alone.
#[derive(Debug, Default)]
pub struct ContextPatch {
    pub image: Option<ImageRef>,
    pub budget: Option<Budget>,
    pub mood: Option<Mood>,
    pub verdict: Option<Verdict>,
}

impl SessionContext {
    pub fn merge(&mut self, patch: ContextPatch) {
        if let Some(image) = patch.image {
            self.image = Some(image);
        }
        if let Some(budget) = patch.budget {
            self.budget = Some(budget);
        }
        if let Some(mood) = patch.mood {
            self.mood = Some(mood);
        }
        if let Some(verdict) = patch.verdict {
            self.verdict = Some(verdict);
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.budget.is_none() && self.mood.is_none() && self.verdict.is_none()
    }
}
