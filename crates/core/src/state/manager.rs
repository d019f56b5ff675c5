//! Onboarding manager coordinating every client's onboarding.
//!
//! The OnboardingManager is the public surface of the core. It owns the
//! registered templates and the onboarding store, and it serializes all
//! operations on one client through that client's own lock. Operations on
//! different clients never wait on each other beyond the brief store
//! lookup.

use crate::engine::{CompletionEngine, StepOutcome, SubmissionOutcome};
use crate::reporting;
use crate::state::error::{OnboardError, OnboardResult};
use crate::state::onboarding::{announce_onboarding, create_onboarding, emit, reset_activity};
use crate::state::store::{MemoryStore, OnboardingStore, SharedOnboarding};
use crate::template::StepGraph;
use chrono::Duration as TimeDelta;
use ob_protocol::activity_models::Action;
use ob_protocol::config_models::GlobalConfig;
use ob_protocol::ipc::Event;
use ob_protocol::onboarding_models::{
    ClientOnboarding, ComplianceStatus, OnboardingInstance, OnboardingStatus,
};
use ob_protocol::template_models::StepNumber;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, MutexGuard};
use tracing::info;
use uuid::Uuid;

/// Manages the onboardings of all clients.
///
/// The OnboardingManager provides a centralized interface for:
/// - Beginning onboarding against a named template
/// - Completing steps and submitting documents
/// - Recording which steps an employee viewed
/// - Querying per-client status and aggregate reports
pub struct OnboardingManager {
    /// Registered templates, indexed by process name.
    templates: HashMap<String, Arc<StepGraph>>,

    default_process: Option<String>,

    store: Arc<dyn OnboardingStore>,

    /// Steps viewed per (employee, client).
    access: Mutex<HashMap<(String, String), BTreeSet<StepNumber>>>,

    /// Upper bound on waiting for one client's lock.
    lock_timeout: Duration,

    /// Channel for sending events to observers.
    events_tx: mpsc::Sender<Event>,
}

impl OnboardingManager {
    /// Create a new OnboardingManager backed by a [`MemoryStore`].
    ///
    /// # Arguments
    ///
    /// * `templates` - Validated templates clients may onboard against
    /// * `global` - Lock timeout and default process settings
    /// * `events_tx` - Channel for sending events to observers
    pub fn new(templates: Vec<StepGraph>, global: &GlobalConfig, events_tx: mpsc::Sender<Event>) -> Self {
        Self::with_store(templates, global, Arc::new(MemoryStore::new()), events_tx)
    }

    /// Create a new OnboardingManager over an explicit store.
    pub fn with_store(
        templates: Vec<StepGraph>,
        global: &GlobalConfig,
        store: Arc<dyn OnboardingStore>,
        events_tx: mpsc::Sender<Event>,
    ) -> Self {
        let templates = templates
            .into_iter()
            .map(|graph| (graph.name().to_string(), Arc::new(graph)))
            .collect();

        Self {
            templates,
            default_process: global.default_process.clone(),
            store,
            access: Mutex::new(HashMap::new()),
            lock_timeout: Duration::from_millis(global.lock_timeout_ms),
            events_tx,
        }
    }

    /// Look up a registered template by name.
    pub fn template(&self, process_name: &str) -> Option<Arc<StepGraph>> {
        self.templates.get(process_name).cloned()
    }

    /// Names of all registered templates, sorted.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn engine_for(&self, process_name: &str) -> OnboardResult<CompletionEngine> {
        self.template(process_name)
            .map(CompletionEngine::new)
            .ok_or_else(|| OnboardError::UnknownProcess(process_name.to_string()))
    }

    /// Acquire a client's lock, waiting no longer than the configured bound.
    async fn lock<'a>(
        &self,
        client_id: &str,
        shared: &'a SharedOnboarding,
    ) -> OnboardResult<MutexGuard<'a, ClientOnboarding>> {
        tokio::time::timeout(self.lock_timeout, shared.lock())
            .await
            .map_err(|_| OnboardError::LockTimeout {
                client_id: client_id.to_string(),
                waited_ms: self.lock_timeout.as_millis() as u64,
            })
    }

    /// Acquire the lock of a client that must still be registered.
    ///
    /// A handle fetched before a concurrent purge fails with
    /// [`OnboardError::MissingStructure`] once its lock is won.
    async fn lock_existing<'a>(
        &self,
        client_id: &str,
        shared: &'a SharedOnboarding,
    ) -> OnboardResult<MutexGuard<'a, ClientOnboarding>> {
        let guard = self.lock(client_id, shared).await?;
        if !self.is_current(client_id, shared).await {
            return Err(OnboardError::MissingStructure {
                client_id: client_id.to_string(),
            });
        }
        Ok(guard)
    }

    /// Whether `shared` is still the store's handle for the client.
    async fn is_current(&self, client_id: &str, shared: &SharedOnboarding) -> bool {
        self.store
            .get(client_id)
            .await
            .is_some_and(|current| Arc::ptr_eq(&current, shared))
    }

    /// Handle for a client that must already exist.
    async fn existing(&self, client_id: &str) -> OnboardResult<SharedOnboarding> {
        self.store
            .get(client_id)
            .await
            .ok_or_else(|| OnboardError::MissingStructure {
                client_id: client_id.to_string(),
            })
    }

    /// Create the onboarding instance and action log for a client.
    ///
    /// Without `process_name` the configured default template is used.
    ///
    /// # Returns
    ///
    /// The id of the new onboarding.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is unknown, no default is
    /// configured, or the client is already onboarding.
    pub async fn begin_onboarding(&self, client_id: &str, process_name: Option<&str>) -> OnboardResult<Uuid> {
        let process_name = process_name
            .or(self.default_process.as_deref())
            .ok_or(OnboardError::NoDefaultProcess)?;
        let graph = self
            .template(process_name)
            .ok_or_else(|| OnboardError::UnknownProcess(process_name.to_string()))?;

        let onboarding = create_onboarding(client_id, &graph);
        let instance = onboarding.instance.clone();
        self.store.insert(onboarding).await?;
        announce_onboarding(&instance, &self.events_tx);

        Ok(instance.id)
    }

    /// Record that a client completed a step.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardError::MissingStructure`] if the client has not
    /// begun onboarding, or [`OnboardError::UnknownStep`] if the step is not
    /// part of the client's template.
    pub async fn complete_step(&self, client_id: &str, step_number: StepNumber) -> OnboardResult<StepOutcome> {
        let shared = self.existing(client_id).await?;
        let mut onboarding = self.lock_existing(client_id, &shared).await?;
        let engine = self.engine_for(&onboarding.instance.process_name)?;
        engine.mark_step_complete(&mut onboarding, step_number, &self.events_tx)
    }

    /// Record that a client supplied a required document.
    pub async fn submit_document(&self, client_id: &str, document_id: &str) -> OnboardResult<SubmissionOutcome> {
        let shared = self.existing(client_id).await?;
        let mut onboarding = self.lock_existing(client_id, &shared).await?;
        let engine = self.engine_for(&onboarding.instance.process_name)?;
        engine.submit_document(&mut onboarding, document_id, &self.events_tx)
    }

    /// Record that an employee viewed one of a client's steps.
    pub async fn record_step_access(
        &self,
        employee_id: &str,
        client_id: &str,
        step_number: StepNumber,
    ) -> OnboardResult<()> {
        let shared = self.existing(client_id).await?;
        let onboarding = self.lock_existing(client_id, &shared).await?;
        let process_name = onboarding.instance.process_name.clone();
        let graph = self
            .template(&process_name)
            .ok_or_else(|| OnboardError::UnknownProcess(process_name.clone()))?;
        if !graph.contains(step_number) {
            return Err(OnboardError::UnknownStep {
                process: process_name,
                step: step_number,
            });
        }

        let mut access = self.access.lock().await;
        access
            .entry((employee_id.to_string(), client_id.to_string()))
            .or_default()
            .insert(step_number);
        // The client lock is held until here so a purge cannot miss the record.
        drop(access);
        drop(onboarding);
        Ok(())
    }

    /// Steps an employee has viewed for a client.
    pub async fn steps_accessed(&self, employee_id: &str, client_id: &str) -> BTreeSet<StepNumber> {
        let access = self.access.lock().await;
        access
            .get(&(employee_id.to_string(), client_id.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the client has an onboarding instance and action log.
    pub async fn is_onboarding_built(&self, client_id: &str) -> bool {
        self.store.get(client_id).await.is_some()
    }

    /// Number of actions in a client's log.
    ///
    /// Returns `Ok(None)` for an unknown client rather than an error.
    pub async fn num_actions(&self, client_id: &str) -> OnboardResult<Option<usize>> {
        let Some(shared) = self.store.get(client_id).await else {
            return Ok(None);
        };
        let onboarding = self.lock(client_id, &shared).await?;
        if !self.is_current(client_id, &shared).await {
            return Ok(None);
        }
        Ok(Some(onboarding.activity.len()))
    }

    /// Every action in a client's log, in the order taken.
    pub async fn all_actions(&self, client_id: &str) -> OnboardResult<Option<Vec<Action>>> {
        let Some(shared) = self.store.get(client_id).await else {
            return Ok(None);
        };
        let onboarding = self.lock(client_id, &shared).await?;
        if !self.is_current(client_id, &shared).await {
            return Ok(None);
        }
        Ok(Some(onboarding.activity.actions().to_vec()))
    }

    /// Status view of a client's onboarding, or `None` for an unknown client.
    pub async fn status(&self, client_id: &str) -> OnboardResult<Option<OnboardingStatus>> {
        let Some(shared) = self.store.get(client_id).await else {
            return Ok(None);
        };
        let onboarding = self.lock(client_id, &shared).await?;
        if !self.is_current(client_id, &shared).await {
            return Ok(None);
        }
        let graph = self
            .template(&onboarding.instance.process_name)
            .ok_or_else(|| OnboardError::UnknownProcess(onboarding.instance.process_name.clone()))?;
        Ok(Some(reporting::status_of(&onboarding, &graph)))
    }

    async fn snapshot_instances(&self) -> OnboardResult<Vec<OnboardingInstance>> {
        let mut instances = Vec::new();
        for (client_id, shared) in self.store.all().await {
            let onboarding = self.lock(&client_id, &shared).await?;
            if self.is_current(&client_id, &shared).await {
                instances.push(onboarding.instance.clone());
            }
        }
        Ok(instances)
    }

    /// The completed and valid flags of every client, ordered by client id.
    pub async fn list_all_with_compliance_status(&self) -> OnboardResult<Vec<ComplianceStatus>> {
        Ok(self
            .snapshot_instances()
            .await?
            .iter()
            .map(reporting::compliance_status)
            .collect())
    }

    /// Average time from start to completion over completed onboardings.
    ///
    /// Returns `Ok(None)` when no onboarding has completed.
    pub async fn average_time_to_completion(&self) -> OnboardResult<Option<TimeDelta>> {
        let instances = self.snapshot_instances().await?;
        Ok(reporting::average_time_to_completion(&instances))
    }

    /// Clear a client's action log. Operational use only.
    pub async fn reset_activity(&self, client_id: &str) -> OnboardResult<()> {
        let shared = self.existing(client_id).await?;
        let mut onboarding = self.lock_existing(client_id, &shared).await?;
        reset_activity(&mut onboarding, &self.events_tx);
        Ok(())
    }

    /// Remove every record of a client, including employee access records.
    ///
    /// Waits for in-flight operations on the client to finish first.
    pub async fn purge_client(&self, client_id: &str) -> OnboardResult<()> {
        let shared = self.existing(client_id).await?;
        let _guard = self.lock_existing(client_id, &shared).await?;
        self.store.remove(client_id).await;

        let mut access = self.access.lock().await;
        access.retain(|(_, accessed_client), _| accessed_client != client_id);
        drop(access);

        info!(client_id, "client purged");
        emit(
            &self.events_tx,
            Event::ClientPurged {
                client_id: client_id.to_string(),
            },
        );
        Ok(())
    }

    /// Get the number of clients with an onboarding.
    pub async fn client_count(&self) -> usize {
        self.store.len().await
    }
}
