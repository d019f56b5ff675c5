//! Action log models.
//!
//! An [`Activity`] is the append-only, chronological record of everything a
//! client (or an operator on its behalf) did during onboarding. Each entry is
//! an immutable [`Action`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::template_models::StepNumber;

/// A single immutable entry in a client's action log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct Action {
    /// Position in the log, 0-based and strictly increasing per client.
    pub sequence_number: u64,

    /// When the action was recorded.
    pub taken_at: DateTime<Utc>,

    /// The step this action completed, if any.
    pub completed_step: Option<StepNumber>,

    /// The document this action submitted, if any.
    pub submitted_document: Option<String>,
}

/// The ordered action log of one onboarding.
///
/// Entries can only be appended; the sole way to remove them is a bulk
/// [`Activity::clear`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
pub struct Activity {
    actions: Vec<Action>,
}

impl Activity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new action and return it.
    ///
    /// The sequence number is assigned here so that numbering can never
    /// drift from the position in the log.
    pub fn append(
        &mut self,
        taken_at: DateTime<Utc>,
        completed_step: Option<StepNumber>,
        submitted_document: Option<String>,
    ) -> &Action {
        let sequence_number = self.actions.len() as u64;
        self.actions.push(Action {
            sequence_number,
            taken_at,
            completed_step,
            submitted_document,
        });
        &self.actions[self.actions.len() - 1]
    }

    pub fn first_action(&self) -> Option<&Action> {
        self.actions.first()
    }

    pub fn last_action(&self) -> Option<&Action> {
        self.actions.last()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// All actions in the order they were taken.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Drop every action. Only used by operational resets.
    pub fn clear(&mut self) {
        self.actions.clear();
    }
}
