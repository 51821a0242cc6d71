//! Sequential publishing of tracked changes.
//!
//! Each change becomes one or more contract calls. Calls are awaited one at a
//! time, so dispatch order equals drain order. A failing call abandons the
//! rest of its change; the run continues with the next change.

use std::future::Future;

use tracing::{debug, warn};
use worldsmith_foundation::{Error, Result};

use crate::calls::{ContractCall, calls_for};
use crate::changes::Change;

/// Sends contract calls to the external system.
pub trait CallDispatcher {
    /// Submits one call and waits for it to be accepted.
    ///
    /// # Errors
    ///
    /// Any transport or contract failure.
    fn dispatch(&mut self, call: &ContractCall) -> impl Future<Output = Result<()>>;
}

/// Collects calls instead of sending them.
#[derive(Clone, Debug, Default)]
pub struct RecordingDispatcher {
    calls: Vec<ContractCall>,
}

impl RecordingDispatcher {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls seen so far.
    #[must_use]
    pub fn calls(&self) -> &[ContractCall] {
        &self.calls
    }

    /// Consumes the recorder, returning the calls.
    #[must_use]
    pub fn into_calls(self) -> Vec<ContractCall> {
        self.calls
    }
}

impl CallDispatcher for RecordingDispatcher {
    async fn dispatch(&mut self, call: &ContractCall) -> Result<()> {
        self.calls.push(call.clone());
        Ok(())
    }
}

/// A change that could not be published.
#[derive(Debug)]
pub struct PublishFailure {
    /// The change, unmodified, ready to requeue.
    pub change: Change,
    /// The first call failure.
    pub error: Error,
}

/// Outcome of one publish run.
#[derive(Debug, Default)]
pub struct PublishReport {
    /// Changes whose every call succeeded.
    pub published: Vec<Change>,
    /// Changes that stopped on a failing call.
    pub failed: Vec<PublishFailure>,
}

impl PublishReport {
    /// True if every change was published.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Takes the failed changes out of the report.
    pub fn take_failed_changes(&mut self) -> Vec<Change> {
        self.failed.drain(..).map(|f| f.change).collect()
    }
}

/// Publishes changes through a dispatcher.
#[derive(Clone, Debug, Default)]
pub struct Publisher {
    calls_sent: u64,
}

impl Publisher {
    /// Creates a publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls accepted by dispatchers over this publisher's lifetime.
    #[must_use]
    pub fn calls_sent(&self) -> u64 {
        self.calls_sent
    }

    /// Publishes each change in order.
    pub async fn publish<D: CallDispatcher>(
        &mut self,
        dispatcher: &mut D,
        changes: Vec<Change>,
    ) -> PublishReport {
        let mut report = PublishReport::default();
        for change in changes {
            match self.publish_one(dispatcher, &change).await {
                Ok(()) => report.published.push(change),
                Err(error) => {
                    warn!(entity_id = %change.entity_id, kind = %change.kind, %error, "publish failed");
                    report.failed.push(PublishFailure { change, error });
                }
            }
        }
        debug!(
            published = report.published.len(),
            failed = report.failed.len(),
            "publish finished"
        );
        report
    }

    async fn publish_one<D: CallDispatcher>(
        &mut self,
        dispatcher: &mut D,
        change: &Change,
    ) -> Result<()> {
        for call in calls_for(change) {
            dispatcher.dispatch(&call).await?;
            self.calls_sent += 1;
            debug!(entity_id = %change.entity_id, entrypoint = %call.entrypoint, "call dispatched");
        }
        Ok(())
    }
}
