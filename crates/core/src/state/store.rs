//! Storage seam for client onboardings.
//!
//! The manager works exclusively through [`OnboardingStore`], so a durable
//! backend can replace [`MemoryStore`] without touching the engine. A
//! backend must create an onboarding and its action log atomically and
//! hand out one shared handle per client, so that the per-client mutex
//! serializes every mutation of that client.

use crate::state::error::{OnboardError, OnboardResult};
use async_trait::async_trait;
use ob_protocol::onboarding_models::ClientOnboarding;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared, independently lockable handle to one client's onboarding.
pub type SharedOnboarding = Arc<Mutex<ClientOnboarding>>;

#[async_trait]
pub trait OnboardingStore: Send + Sync {
    /// Store a new onboarding and return its handle.
    ///
    /// Fails with [`OnboardError::AlreadyOnboarding`] if the client exists.
    async fn insert(&self, onboarding: ClientOnboarding) -> OnboardResult<SharedOnboarding>;

    /// Point lookup by client id.
    async fn get(&self, client_id: &str) -> Option<SharedOnboarding>;

    /// Remove a client and return its handle, if it existed.
    async fn remove(&self, client_id: &str) -> Option<SharedOnboarding>;

    /// Every client id with its handle, ordered by client id.
    async fn all(&self) -> Vec<(String, SharedOnboarding)>;

    async fn len(&self) -> usize;
}

/// In-memory [`OnboardingStore`].
///
/// The outer map lock is held only for lookups and inserts, never while a
/// client's own lock is awaited.
#[derive(Debug, Default)]
pub struct MemoryStore {
    onboardings: Mutex<BTreeMap<String, SharedOnboarding>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OnboardingStore for MemoryStore {
    async fn insert(&self, onboarding: ClientOnboarding) -> OnboardResult<SharedOnboarding> {
        let mut onboardings = self.onboardings.lock().await;
        let client_id = onboarding.instance.client_id.clone();

        if onboardings.contains_key(&client_id) {
            return Err(OnboardError::AlreadyOnboarding { client_id });
        }

        let shared = Arc::new(Mutex::new(onboarding));
        onboardings.insert(client_id, Arc::clone(&shared));
        Ok(shared)
    }

    async fn get(&self, client_id: &str) -> Option<SharedOnboarding> {
        let onboardings = self.onboardings.lock().await;
        onboardings.get(client_id).cloned()
    }

    async fn remove(&self, client_id: &str) -> Option<SharedOnboarding> {
        let mut onboardings = self.onboardings.lock().await;
        onboardings.remove(client_id)
    }

    async fn all(&self) -> Vec<(String, SharedOnboarding)> {
        let onboardings = self.onboardings.lock().await;
        onboardings
            .iter()
            .map(|(client_id, shared)| (client_id.clone(), Arc::clone(shared)))
            .collect()
    }

    async fn len(&self) -> usize {
        self.onboardings.lock().await.len()
    }
}
