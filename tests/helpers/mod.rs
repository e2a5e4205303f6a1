#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use vecsearch::embedding::{ProviderError, VectorProvider};
use vecsearch::matching::MatchEngine;

pub const QUERY: &str = "Yellow fruit";
pub const FRUITS: [&str; 3] = ["apple", "orange", "banana"];

/// In-process provider with scripted vectors, scripted failures, per-text call
/// counts, and an optional gate that holds every call in flight until opened.
pub struct ScriptedProvider {
    vectors: Mutex<HashMap<String, Vec<f32>>>,
    failures: Mutex<HashMap<String, ProviderError>>,
    calls: Mutex<HashMap<String, usize>>,
    gate: Option<Semaphore>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            vectors: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            gate: None,
        }
    }

    /// Calls block until [`open_gate`](Self::open_gate) is called.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn with(self, text: &str, vector: &[f32]) -> Self {
        self.script(text, vector);
        self
    }

    pub fn failing(self, text: &str, err: ProviderError) -> Self {
        self.failures.lock().unwrap().insert(text.into(), err);
        self
    }

    pub fn script(&self, text: &str, vector: &[f32]) {
        self.vectors.lock().unwrap().insert(text.into(), vector.to_vec());
    }

    /// Stop failing for `text`.
    pub fn heal(&self, text: &str) {
        self.failures.lock().unwrap().remove(text);
    }

    pub fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn calls(&self, text: &str) -> usize {
        self.calls.lock().unwrap().get(text).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl VectorProvider for ScriptedProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        *self.calls.lock().unwrap().entry(text.to_owned()).or_insert(0) += 1;

        if let Some(gate) = &self.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| ProviderError::Transport(e.to_string()))?;
        }

        if let Some(err) = self.failures.lock().unwrap().get(text) {
            return Err(err.clone());
        }
        self.vectors
            .lock()
            .unwrap()
            .get(text)
            .cloned()
            .ok_or_else(|| ProviderError::Malformed(format!("no vector scripted for {text:?}")))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Query and fruit vectors where banana is closest to the query, then apple, then orange.
pub fn fruit_provider() -> ScriptedProvider {
    ScriptedProvider::new()
        .with(QUERY, &[1.0, 0.2, 0.0])
        .with("apple", &[0.3, 1.0, 0.1])
        .with("orange", &[0.2, 0.1, 1.0])
        .with("banana", &[0.9, 0.3, 0.1])
}

pub fn fruit_engine(provider: &Arc<ScriptedProvider>) -> MatchEngine {
    MatchEngine::with_candidates(provider.clone(), QUERY, FRUITS)
}

/// Yield until the provider has received at least `n` calls.
pub async fn wait_for_calls(provider: &ScriptedProvider, n: usize) {
    for _ in 0..1000 {
        if provider.total_calls() >= n {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("provider saw {} calls, expected {n}", provider.total_calls());
}

/// Give every other branch of a `join!` a few chances to run.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
