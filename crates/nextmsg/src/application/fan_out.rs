//! Fan-out Orchestrator
//!
//! Runs one rewrite per selected relationship concurrently and folds the
//! results into a single aggregate keyed by relationship.
//!
//! ## Failure policy
//!
//! The first failure seen by the join loop fails the whole batch. Tasks still
//! in flight are detached rather than aborted: they run to completion and
//! their results are dropped. Successes collected so far are discarded too,
//! so callers only ever see a complete aggregate or an error.
//!
//! The same holds when the caller stops waiting (a timeout, or a dropped
//! request handler): started calls are never cancelled.

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::domain::entities::{RewriteRequest, RewriteResult};
use crate::domain::errors::FanOutError;
use crate::domain::value_objects::{Mode, Relationship};
use crate::ports::RewriteGenerator;

/// Variants per relationship
pub type ResultAggregate = BTreeMap<Relationship, Vec<RewriteResult>>;

/// Input for a fan-out: one draft, many relationships
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOutRequest {
    pub mode: Mode,
    pub draft: String,
    pub received_message: Option<String>,
    pub relationships: Vec<Relationship>,
}

impl FanOutRequest {
    pub fn new(mode: Mode, draft: impl Into<String>, relationships: Vec<Relationship>) -> Self {
        Self {
            mode,
            draft: draft.into(),
            received_message: None,
            relationships,
        }
    }

    pub fn with_received_message(mut self, message: impl Into<String>) -> Self {
        self.received_message = Some(message.into());
        self
    }

    /// Whether there is enough input to start.
    ///
    /// Needs a non-blank draft, at least one relationship, and in reply mode
    /// a non-blank received message.
    pub fn is_ready(&self) -> bool {
        let received_ok = match self.mode {
            Mode::New => true,
            Mode::Reply => self
                .received_message
                .as_deref()
                .is_some_and(|m| !m.trim().is_empty()),
        };

        !self.draft.trim().is_empty() && !self.relationships.is_empty() && received_ok
    }

    /// Relationships with duplicates removed
    pub fn distinct_relationships(&self) -> Vec<Relationship> {
        let mut relationships = self.relationships.clone();
        relationships.sort();
        relationships.dedup();
        relationships
    }

    fn request_for(&self, relationship: Relationship) -> RewriteRequest {
        let request = RewriteRequest::new(self.mode, self.draft.clone(), relationship);
        match &self.received_message {
            Some(message) => request.with_received_message(message.clone()),
            None => request,
        }
    }
}

/// Join set that detaches its remaining tasks when dropped
struct DetachedTasks<T: 'static>(JoinSet<T>);

impl<T: 'static> Deref for DetachedTasks<T> {
    type Target = JoinSet<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: 'static> DerefMut for DetachedTasks<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T: 'static> Drop for DetachedTasks<T> {
    fn drop(&mut self) {
        self.0.detach_all();
    }
}

/// Concurrent per-relationship rewriter
#[derive(Clone)]
pub struct FanOut {
    generator: Arc<dyn RewriteGenerator>,
}

impl FanOut {
    pub fn new(generator: Arc<dyn RewriteGenerator>) -> Self {
        Self { generator }
    }

    /// Rewrite the draft for every relationship in the request.
    ///
    /// Returns `Ok(None)` without calling the generator when the request is
    /// not ready (see [`FanOutRequest::is_ready`]).
    pub async fn run(
        &self,
        request: &FanOutRequest,
    ) -> Result<Option<ResultAggregate>, FanOutError> {
        if !request.is_ready() {
            tracing::debug!("Fan-out declined: incomplete input");
            return Ok(None);
        }

        let relationships = request.distinct_relationships();
        tracing::info!(
            "Fan-out over {} relationship(s) via {} ({}) - mode: {}",
            relationships.len(),
            self.generator.provider_name(),
            self.generator.model_id(),
            request.mode
        );

        let mut join_set = DetachedTasks(JoinSet::new());
        for relationship in relationships {
            let generator = Arc::clone(&self.generator);
            let rewrite = request.request_for(relationship);
            join_set.spawn(async move { (relationship, generator.generate(&rewrite).await) });
        }

        let mut aggregate = ResultAggregate::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((relationship, Ok(results))) => {
                    aggregate.insert(relationship, results);
                }
                Ok((relationship, Err(source))) => {
                    tracing::error!("Failed to rewrite for {}: {}", relationship, source);
                    return Err(FanOutError::Relationship {
                        relationship,
                        source,
                    });
                }
                Err(e) => {
                    tracing::error!("Rewrite task did not finish: {}", e);
                    return Err(FanOutError::TaskFailed {
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(Some(aggregate))
    }
}

/// What happened to a submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input incomplete; previous state left as is
    Declined,
    Completed,
    Failed,
}

/// Presentation state across repeated submits
///
/// Holds the last published aggregate or the last error message, never both.
pub struct FanOutSession {
    fan_out: FanOut,
    results: ResultAggregate,
    error: Option<String>,
}

impl FanOutSession {
    pub fn new(fan_out: FanOut) -> Self {
        Self {
            fan_out,
            results: ResultAggregate::new(),
            error: None,
        }
    }

    /// Clear prior state and run a new fan-out
    pub async fn submit(&mut self, request: &FanOutRequest) -> SubmitOutcome {
        if !request.is_ready() {
            return SubmitOutcome::Declined;
        }

        self.results.clear();
        self.error = None;

        match self.fan_out.run(request).await {
            Ok(Some(results)) => {
                self.results = results;
                SubmitOutcome::Completed
            }
            Ok(None) => SubmitOutcome::Declined,
            Err(e) => {
                self.error = Some(e.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    pub fn results(&self) -> &ResultAggregate {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
