// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The recent-contacts fetch boundary.
//!
//! The engine only knows how to *start* and *abort* fetches; outcomes come
//! back through `ConnectionEngine::fetch_completed`, tagged with the data
//! generation they were issued under so a reset can never be repopulated by a
//! stale response. [`SpawnFetcher`] adapts any async fetch closure onto that
//! shape with tokio tasks.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::model::{ContactVisit, EdgeKey, FlowId};

/// Endpoint path for one edge's recent contacts.
pub fn recent_contacts_path(flow: &FlowId, key: &EdgeKey) -> String {
    format!("/flow/recent_contacts/{}/{}/{}/", flow, key.source(), key.target())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub flow: FlowId,
    pub key: EdgeKey,
}

impl FetchRequest {
    pub fn path(&self) -> String {
        recent_contacts_path(&self.flow, &self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub generation: u64,
    pub key: EdgeKey,
    pub result: Result<Vec<ContactVisit>, FetchError>,
}

/// An abort is not a failure: it never logs and never touches the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    Failed(String),
    Aborted,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(msg) => write!(f, "recent-contacts fetch failed: {msg}"),
            Self::Aborted => f.write_str("recent-contacts fetch aborted"),
        }
    }
}

impl std::error::Error for FetchError {}

/// How the engine issues fetches. Object-safe so hosts can inject anything
/// from a tokio adapter to a recording double.
pub trait ContactFetch {
    fn start(&mut self, request: FetchRequest);
    /// Aborts everything in flight; outcomes from aborted work are either
    /// dropped by the adapter or discarded by the engine's generation check.
    fn abort_all(&mut self);
}

/// A fetcher that never fetches; popups fed by it stay in the loading state.
#[derive(Debug, Default)]
pub struct NullFetcher;

impl ContactFetch for NullFetcher {
    fn start(&mut self, _request: FetchRequest) {}

    fn abort_all(&mut self) {}
}

/// A recording double for tests: remembers every request, counts aborts.
#[derive(Debug, Default)]
pub struct RecordingFetcher {
    started: Vec<FetchRequest>,
    aborts: usize,
}

impl RecordingFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> &[FetchRequest] {
        &self.started
    }

    pub fn aborts(&self) -> usize {
        self.aborts
    }
}

impl ContactFetch for RecordingFetcher {
    fn start(&mut self, request: FetchRequest) {
        self.started.push(request);
    }

    fn abort_all(&mut self) {
        self.aborts += 1;
    }
}

/// Runs each fetch as a spawned tokio task.
///
/// The host supplies the actual transport as an async closure (typically an
/// HTTP GET of [`FetchRequest::path`]) and drains the outcome channel into
/// `ConnectionEngine::fetch_completed`. `abort_all` aborts the join handles;
/// an aborted task simply never delivers.
pub struct SpawnFetcher<F> {
    fetch: Arc<F>,
    outcomes: mpsc::UnboundedSender<FetchOutcome>,
    tasks: Vec<tokio::task::JoinHandle<()>>,
}

impl<F, Fut> SpawnFetcher<F>
where
    F: Fn(FetchRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<ContactVisit>, FetchError>> + Send + 'static,
{
    pub fn new(fetch: F) -> (Self, mpsc::UnboundedReceiver<FetchOutcome>) {
        let (outcomes, rx) = mpsc::unbounded_channel();
        (Self { fetch: Arc::new(fetch), outcomes, tasks: Vec::new() }, rx)
    }
}

impl<F, Fut> ContactFetch for SpawnFetcher<F>
where
    F: Fn(FetchRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<ContactVisit>, FetchError>> + Send + 'static,
{
    fn start(&mut self, request: FetchRequest) {
        self.tasks.retain(|task| !task.is_finished());

        let fetch = Arc::clone(&self.fetch);
        let outcomes = self.outcomes.clone();
        self.tasks.push(tokio::spawn(async move {
            let generation = request.generation;
            let key = request.key.clone();
            let result = fetch(request).await;
            // The receiver may already be gone during teardown.
            let _ = outcomes.send(FetchOutcome { generation, key, result });
        }));
    }

    fn abort_all(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{ContactVisit, EdgeKey, FlowId};

    use super::{recent_contacts_path, ContactFetch, FetchError, FetchRequest, SpawnFetcher};

    #[test]
    fn path_follows_the_endpoint_convention() {
        let flow = FlowId::new("f1").expect("flow id");
        let key: EdgeKey = "e1:n1".parse().expect("key");
        assert_eq!(recent_contacts_path(&flow, &key), "/flow/recent_contacts/f1/e1/n1/");
    }

    #[tokio::test]
    async fn spawn_fetcher_delivers_outcomes() {
        let (mut fetcher, mut rx) =
            SpawnFetcher::new(|_request: FetchRequest| async { Ok(Vec::<ContactVisit>::new()) });

        fetcher.start(FetchRequest {
            generation: 3,
            flow: FlowId::new("f1").expect("flow id"),
            key: "e1:n1".parse().expect("key"),
        });

        let outcome = rx.recv().await.expect("outcome");
        assert_eq!(outcome.generation, 3);
        assert_eq!(outcome.key.to_string(), "e1:n1");
        assert_eq!(outcome.result, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn abort_all_abandons_in_flight_work() {
        let (mut fetcher, mut rx) = SpawnFetcher::new(|_request: FetchRequest| async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Err::<Vec<ContactVisit>, _>(FetchError::Failed("unreachable".to_owned()))
        });

        fetcher.start(FetchRequest {
            generation: 1,
            flow: FlowId::new("f1").expect("flow id"),
            key: "e1:n1".parse().expect("key"),
        });
        fetcher.abort_all();
        drop(fetcher);

        // The sender side is gone and the task was aborted: no outcome arrives.
        assert!(rx.recv().await.is_none());
    }
}
