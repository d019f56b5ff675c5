//! Replays a YAML list of operations against a fresh manager.
//!
//! Each operation is applied in order. Its result and the events it
//! produced are printed before the next one runs.

use color_eyre::eyre::{bail, WrapErr};
use colored::Colorize;
use ob_core::config::load_config;
use ob_core::state::{OnboardError, OnboardingManager};
use ob_protocol::ipc::{Event, Op};
use serde_json::{json, Value};
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Run every operation in `file`. Returns the number that failed.
pub async fn run(dir: &Path, file: &Path, as_json: bool, fail_fast: bool) -> color_eyre::Result<usize> {
    let config = load_config(dir)
        .await
        .wrap_err_with(|| format!("failed to load configuration from {}", dir.display()))?;
    let templates = config.build_templates()?;
    if templates.is_empty() {
        bail!("no process templates found under {}", dir.join(".onboard-kit").display());
    }

    let yaml = tokio::fs::read_to_string(file)
        .await
        .wrap_err_with(|| format!("failed to read {}", file.display()))?;
    let ops: Vec<Op> = serde_yaml::from_str(&yaml)
        .wrap_err_with(|| format!("failed to parse operations in {}", file.display()))?;

    let (events_tx, mut events_rx) = mpsc::channel(1024);
    let manager = OnboardingManager::new(templates, &config.global, events_tx);
    info!(operations = ops.len(), file = %file.display(), "replaying operations");

    let mut failed = 0;
    for (index, op) in ops.iter().enumerate() {
        debug!(index, op = %describe(op), "applying operation");
        let result = apply(&manager, op).await;
        let events = drain(&mut events_rx);
        if let Err(e) = &result {
            warn!(index, error = %e, "operation failed");
        }

        if as_json {
            print_json(index, op, &result, &events)?;
        } else {
            print_text(index, op, &result, &events);
        }

        if result.is_err() {
            failed += 1;
            if fail_fast {
                break;
            }
        }
    }

    Ok(failed)
}

/// Apply one operation and render its result as JSON.
async fn apply(manager: &OnboardingManager, op: &Op) -> Result<Value, OnboardError> {
    let value = match op {
        Op::BeginOnboarding {
            client_id,
            process_name,
        } => {
            let onboarding_id = manager
                .begin_onboarding(client_id, process_name.as_deref())
                .await?;
            json!({ "onboarding_id": onboarding_id })
        }
        Op::CompleteStep {
            client_id,
            step_number,
        } => json!(manager.complete_step(client_id, *step_number).await?),
        Op::SubmitDocument {
            client_id,
            document_id,
        } => json!(manager.submit_document(client_id, document_id).await?),
        Op::RecordStepAccess {
            employee_id,
            client_id,
            step_number,
        } => {
            manager
                .record_step_access(employee_id, client_id, *step_number)
                .await?;
            json!({ "steps_accessed": manager.steps_accessed(employee_id, client_id).await })
        }
        Op::GetStatus { client_id } => json!(manager.status(client_id).await?),
        Op::ListCompliance => json!(manager.list_all_with_compliance_status().await?),
        Op::GetAverageTimeToCompletion => {
            let average = manager.average_time_to_completion().await?;
            json!({ "average_ms": average.map(|d| d.num_milliseconds()) })
        }
        Op::ResetActivity { client_id } => {
            manager.reset_activity(client_id).await?;
            Value::Null
        }
        Op::PurgeClient { client_id } => {
            manager.purge_client(client_id).await?;
            Value::Null
        }
    };
    Ok(value)
}

/// Every event produced so far. Operations emit before they return.
fn drain(events_rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = events_rx.try_recv() {
        events.push(event);
    }
    events
}

fn print_json(
    index: usize,
    op: &Op,
    result: &Result<Value, OnboardError>,
    events: &[Event],
) -> color_eyre::Result<()> {
    let line = match result {
        Ok(value) => json!({ "index": index, "op": op, "result": value, "events": events }),
        Err(e) => json!({ "index": index, "op": op, "error": e.to_string(), "events": events }),
    };
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}

fn print_text(index: usize, op: &Op, result: &Result<Value, OnboardError>, events: &[Event]) {
    let label = format!("[{index}] {}", describe(op));
    match result {
        Ok(Value::Null) => println!("{} {}", "✓".green(), label),
        Ok(value) => println!("{} {} {}", "✓".green(), label, value.to_string().dimmed()),
        Err(e) => println!("{} {} {}", "✗".red(), label, e.to_string().red()),
    }
    for event in events {
        println!("    {}", describe_event(event));
    }
}

fn describe(op: &Op) -> String {
    match op {
        Op::BeginOnboarding {
            client_id,
            process_name,
        } => format!(
            "begin {client_id} ({})",
            process_name.as_deref().unwrap_or("default process")
        ),
        Op::CompleteStep {
            client_id,
            step_number,
        } => format!("complete {client_id} step {step_number}"),
        Op::SubmitDocument {
            client_id,
            document_id,
        } => format!("submit {client_id} {document_id}"),
        Op::RecordStepAccess {
            employee_id,
            client_id,
            step_number,
        } => format!("access {employee_id} viewed {client_id} step {step_number}"),
        Op::GetStatus { client_id } => format!("status {client_id}"),
        Op::ListCompliance => "list compliance".to_string(),
        Op::GetAverageTimeToCompletion => "average time to completion".to_string(),
        Op::ResetActivity { client_id } => format!("reset {client_id}"),
        Op::PurgeClient { client_id } => format!("purge {client_id}"),
    }
}

fn describe_event(event: &Event) -> String {
    match event {
        Event::OnboardingStarted {
            client_id,
            process_name,
            ..
        } => format!("{} {client_id} on {process_name}", "started".cyan()),
        Event::ActionRecorded {
            client_id,
            sequence_number,
        } => format!("{} {client_id} #{sequence_number}", "action".dimmed()),
        Event::StepCompleted {
            client_id,
            step_number,
        } => format!("{} {client_id} step {step_number}", "completed".green()),
        Event::StepInvalidated {
            client_id,
            step_number,
            missing_dependencies,
        } => format!(
            "{} {client_id} step {step_number} missing {missing_dependencies:?}",
            "out of order".yellow()
        ),
        Event::OnboardingInvalidated { client_id } => {
            format!("{} {client_id}", "invalidated".red())
        }
        Event::OnboardingCompleted { client_id, valid } => {
            let validity = if *valid { "valid" } else { "invalid" };
            format!("{} {client_id} ({validity})", "onboarding complete".green().bold())
        }
        Event::DocumentSubmitted {
            client_id,
            document_id,
        } => format!("{} {client_id} {document_id}", "document".cyan()),
        Event::ActivityReset { client_id } => format!("{} {client_id}", "reset".yellow()),
        Event::ClientPurged { client_id } => format!("{} {client_id}", "purged".yellow()),
    }
}
