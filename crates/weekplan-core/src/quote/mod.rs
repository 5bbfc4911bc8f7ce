//! Motivational quote generation.
//!
//! The provider itself is an injectable collaborator ([`QuoteProvider`]).
//! [`QuoteService`] wraps it with the two guarantees callers rely on: at most
//! one request in flight, and a fixed fallback string instead of any error.

pub mod gemini;

pub use gemini::GeminiProvider;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::error::{QuoteError, QuoteRequestError};
use crate::model::WeekData;

/// Used when generation fails and the week had tasks.
pub const FALLBACK_WITH_TASKS: &str = "تلاش امروز، موفقیت فرداست.";
/// Used when generation fails and the week had no tasks.
pub const FALLBACK_NO_TASKS: &str = "هر روز یک فرصت تازه است.";

/// Most task texts sent along with a quote request.
pub const MAX_CONTEXT_TASKS: usize = 10;

/// Something that turns a list of tasks into a short motivational line.
pub trait QuoteProvider {
    fn generate(&self, tasks: &[String]) -> impl Future<Output = Result<String, QuoteError>> + Send;
}

/// Non-empty task texts of the week in day order, capped at [`MAX_CONTEXT_TASKS`].
pub fn quote_context(week: &WeekData) -> Vec<String> {
    week.all_tasks()
        .filter(|t| !t.text.is_empty())
        .take(MAX_CONTEXT_TASKS)
        .map(|t| t.text.clone())
        .collect()
}

pub fn fallback_for(tasks: &[String]) -> &'static str {
    if tasks.is_empty() {
        FALLBACK_NO_TASKS
    } else {
        FALLBACK_WITH_TASKS
    }
}

/// Single-flight wrapper around a [`QuoteProvider`].
pub struct QuoteService<P> {
    provider: P,
    busy: AtomicBool,
}

/// Clears the busy flag when the request finishes, however it finishes.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<P: QuoteProvider> QuoteService<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            busy: AtomicBool::new(false),
        }
    }

    /// Whether a request is currently outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Ask the provider for a quote.
    ///
    /// Provider failures never escape: they resolve to
    /// [`FALLBACK_WITH_TASKS`] or [`FALLBACK_NO_TASKS`].
    ///
    /// # Errors
    /// [`QuoteRequestError::Busy`] if another request is still in flight.
    pub async fn request(&self, tasks: &[String]) -> Result<String, QuoteRequestError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("quote request rejected, one already in flight");
            return Err(QuoteRequestError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        let tasks = &tasks[..tasks.len().min(MAX_CONTEXT_TASKS)];
        match self.provider.generate(tasks).await {
            Ok(quote) => Ok(quote),
            Err(e) => {
                warn!(error = %e, tasks = tasks.len(), "quote generation failed, using fallback");
                Ok(fallback_for(tasks).to_string())
            }
        }
    }

    /// [`Self::request`] driven to completion on a fresh current-thread runtime.
    pub fn request_blocking(&self, tasks: &[String]) -> Result<String, QuoteRequestError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| QuoteRequestError::Runtime(e.to_string()))?;
        runtime.block_on(self.request(tasks))
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}
