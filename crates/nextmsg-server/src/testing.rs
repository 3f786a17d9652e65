//! Test doubles shared by the server's unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use nextmsg::{Relationship, RewriteError, RewriteGenerator, RewriteRequest, RewriteResult, Tone};

type Outcome = Box<dyn Fn(&RewriteRequest) -> Result<Vec<RewriteResult>, RewriteError> + Send + Sync>;

/// Generator with a scripted outcome that counts its calls
pub struct StubGenerator {
    calls: AtomicUsize,
    last_request: Mutex<Option<RewriteRequest>>,
    outcome: Outcome,
}

impl StubGenerator {
    fn with_outcome(
        outcome: impl Fn(&RewriteRequest) -> Result<Vec<RewriteResult>, RewriteError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            outcome: Box::new(outcome),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_outcome(|_| Ok(Self::variants()))
    }

    pub fn failing(error: impl Fn() -> RewriteError + Send + Sync + 'static) -> Self {
        Self::with_outcome(move |_| Err(error()))
    }

    /// Fails only for the given relationship
    pub fn failing_for(relationship: Relationship) -> Self {
        Self::with_outcome(move |request| {
            if request.relationship == relationship {
                Err(RewriteError::EmptyResponse)
            } else {
                Ok(Self::variants())
            }
        })
    }

    /// Canned output, not in Soft/Standard/Short order
    pub fn variants() -> Vec<RewriteResult> {
        vec![
            RewriteResult::new(Tone::Standard, "了解！明日行くね"),
            RewriteResult::new(Tone::Short, "了解、明日行く"),
            RewriteResult::new(Tone::Soft, "わかりました😊 明日伺いますね"),
        ]
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<RewriteRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl RewriteGenerator for StubGenerator {
    async fn generate(&self, request: &RewriteRequest) -> Result<Vec<RewriteResult>, RewriteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        (self.outcome)(request)
    }

    fn provider_name(&self) -> &str {
        "stub"
    }

    fn model_id(&self) -> &str {
        "stub-model"
    }
}
