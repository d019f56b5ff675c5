//! Queries over a client's action log.
//!
//! The [`Activity`] is the single source of truth for what a client has
//! done. Everything here derives its answer from the log on demand; no
//! separate completed-steps set is maintained that could drift from it.

use ob_protocol::activity_models::Activity;
use ob_protocol::template_models::StepNumber;
use std::collections::BTreeSet;

/// Steps with at least one completion action in the log.
pub fn completed_steps_so_far(activity: &Activity) -> BTreeSet<StepNumber> {
    activity
        .actions()
        .iter()
        .filter_map(|action| action.completed_step)
        .collect()
}
