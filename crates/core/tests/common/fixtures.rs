//! Test fixtures for creating sample templates, managers and projects.

use ob_core::state::OnboardingManager;
use ob_core::template::StepGraph;
use ob_protocol::config_models::GlobalConfig;
use ob_protocol::document_models::DocumentSpec;
use ob_protocol::ipc::Event;
use ob_protocol::template_models::{ProcessTemplate, StepDefinition, StepNumber};
use std::collections::BTreeSet;
use tempfile::TempDir;
use tokio::sync::mpsc;

pub const STANDARD: &str = "standard";

/// Create a step with the given direct dependencies and documents.
pub fn create_step(
    step_number: StepNumber,
    depends_on: &[StepNumber],
    documents: &[&str],
) -> StepDefinition {
    StepDefinition {
        step_number,
        task_name: format!("task-{step_number}"),
        duration: step_number + 1,
        depends_on: depends_on.iter().copied().collect(),
        required_documents: documents.iter().map(|d| d.to_string()).collect(),
    }
}

/// The five-step template: 3 depends on {0,1,2}, 4 on {0,1,2,3}.
///
/// Step 1 requires `passport`, the process as a whole requires
/// `certificate-of-incorporation`.
pub fn create_standard_template() -> StepGraph {
    let template = ProcessTemplate {
        name: STANDARD.to_string(),
        description: "Five steps with a fan-in".to_string(),
        required_documents: BTreeSet::from(["certificate-of-incorporation".to_string()]),
        steps: vec![
            create_step(0, &[], &[]),
            create_step(1, &[], &["passport"]),
            create_step(2, &[], &[]),
            create_step(3, &[0, 1, 2], &[]),
            create_step(4, &[0, 1, 2, 3], &[]),
        ],
    };
    StepGraph::build(&template, &create_document_catalog())
        .unwrap_or_else(|e| panic!("standard template should build: {e}"))
}

/// A linear chain of `len` steps, each depending on its predecessor.
pub fn create_chain_template(name: &str, len: StepNumber) -> StepGraph {
    let template = ProcessTemplate {
        name: name.to_string(),
        description: String::new(),
        required_documents: BTreeSet::new(),
        steps: (0..len)
            .map(|n| {
                if n == 0 {
                    create_step(0, &[], &[])
                } else {
                    create_step(n, &[n - 1], &[])
                }
            })
            .collect(),
    };
    StepGraph::build(&template, &[]).unwrap_or_else(|e| panic!("chain should build: {e}"))
}

pub fn create_document_catalog() -> Vec<DocumentSpec> {
    vec![
        DocumentSpec::new("passport", "identity"),
        DocumentSpec::new("certificate-of-incorporation", "corporate"),
    ]
}

/// Manager over the standard and a 3-step chain template, standard as
/// default.
pub fn create_test_manager(lock_timeout_ms: u64) -> (OnboardingManager, mpsc::Receiver<Event>) {
    let (events_tx, events_rx) = mpsc::channel(1024);
    let global = GlobalConfig {
        lock_timeout_ms,
        default_process: Some(STANDARD.to_string()),
    };
    let manager = OnboardingManager::new(
        vec![create_standard_template(), create_chain_template("chain", 3)],
        &global,
        events_tx,
    );
    (manager, events_rx)
}

/// Create a temporary project directory with .onboard-kit configuration.
///
/// Returns a TempDir that must be kept alive for the test duration.
pub fn create_test_project() -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let ok_dir = temp_dir.path().join(".onboard-kit");
    std::fs::create_dir_all(ok_dir.join("processes"))?;
    std::fs::create_dir_all(ok_dir.join("documents"))?;

    std::fs::write(
        ok_dir.join("config.toml"),
        "lock-timeout-ms = 500\ndefault-process = \"kyc\"\n",
    )?;
    std::fs::write(
        ok_dir.join("processes/kyc.yaml"),
        r#"name: kyc
steps:
  - step-number: 0
    task-name: identify
    required-documents: [passport]
  - step-number: 1
    task-name: approve
    depends-on: [0]
"#,
    )?;
    std::fs::write(
        ok_dir.join("documents/passport.md"),
        "---\ndocument-id: passport\ndocument-type: identity\n---\n\nPassport copy.\n",
    )?;

    Ok(temp_dir)
}

/// Drain every event currently buffered on the channel.
pub fn drain_events(rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
