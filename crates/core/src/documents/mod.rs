//! Document requirement tracking.
//!
//! Each onboarding starts with every document its template requires marked
//! as missing. Submitting a document moves it to the submitted set; the two
//! sets are disjoint at all times.

use crate::state::error::{OnboardError, OnboardResult};
use crate::template::StepGraph;
use ob_protocol::onboarding_models::OnboardingInstance;
use ob_protocol::template_models::StepNumber;
use std::collections::BTreeSet;

/// The initial missing set: process-level plus all step-level documents.
pub fn seed_missing_documents(graph: &StepGraph) -> BTreeSet<String> {
    graph
        .required_documents()
        .map(|document| document.document_id.clone())
        .collect()
}

/// Move `document_id` from missing to submitted.
///
/// Returns `Ok(true)` when the document was newly submitted and `Ok(false)`
/// when it had already been submitted; resubmission changes nothing.
///
/// # Errors
///
/// Returns [`OnboardError::UnknownDocument`] if the template does not
/// require the document.
pub fn submit_document(
    instance: &mut OnboardingInstance,
    graph: &StepGraph,
    document_id: &str,
) -> OnboardResult<bool> {
    if !graph.is_required_document(document_id) {
        return Err(OnboardError::UnknownDocument {
            process: graph.name().to_string(),
            document_id: document_id.to_string(),
        });
    }

    if instance.submitted_documents.contains(document_id) {
        return Ok(false);
    }

    instance.missing_documents.remove(document_id);
    instance.submitted_documents.insert(document_id.to_string());
    Ok(true)
}

pub fn missing_documents(instance: &OnboardingInstance) -> &BTreeSet<String> {
    &instance.missing_documents
}

pub fn submitted_documents(instance: &OnboardingInstance) -> &BTreeSet<String> {
    &instance.submitted_documents
}

/// Documents required by one step that are still missing.
pub fn missing_documents_for_step(
    instance: &OnboardingInstance,
    graph: &StepGraph,
    step_number: StepNumber,
) -> Option<BTreeSet<String>> {
    let required = graph.documents_required_for(step_number)?;
    Some(
        required
            .into_iter()
            .filter(|document| instance.missing_documents.contains(&document.document_id))
            .map(|document| document.document_id.clone())
            .collect(),
    )
}
