// Copyright 2025 Stratus Cloud, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Types and functions to wait for Stratus Cloud mutations to complete.
//!
//! Most mutating operations in the Stratus Cloud control plane are
//! asynchronous. The service accepts the request and completes it in the
//! background, in one of two ways:
//!
//! - **Work request tracking**: the response carries the identifier of a
//!   [work request][workrequest::model::WorkRequest] in the
//!   [`opc-work-request-id`][WORK_REQUEST_ID_HEADER] header. The application
//!   polls the work request until it succeeds or fails. Use
//!   [wait_for_work_request] for these operations.
//! - **Lifecycle tracking**: the mutated resource itself carries a
//!   `lifecycle_state` field that the service updates as the mutation makes
//!   progress. The application polls the resource until it reaches the
//!   desired state. Use [wait_for_resource] (create and update) or
//!   [wait_for_deleted] (delete) for these operations.
//!
//! Which form applies is a fixed property of each operation, documented by
//! the service; the generated `*_and_wait_for_state` methods select the
//! right one at the call site.
//!
//! Waits and mutations fail differently. Errors in the mutating call itself
//! are returned unwrapped, as no state has been created yet. Errors during
//! the wait are always wrapped in a [CompositeOperationError] carrying the
//! response of the already-applied mutation, so the application never loses
//! the identifier of the resource it just created or mutated.
//!
//! A wait is a single future performing strictly sequential polls. It only
//! suspends on the poll itself and on the inter-poll sleep, so wrapping the
//! future in [tokio::time::timeout] or dropping it from a `select!` cancels
//! the wait promptly.

use gax::response::Response;
use std::sync::Arc;
use std::time::Duration;

mod details;
mod error;

pub use error::{CompositeOperationError, WaitError};

/// The response header carrying the identifier of the work request that
/// tracks an asynchronous mutation.
pub const WORK_REQUEST_ID_HEADER: &str = "opc-work-request-id";

/// The default ceiling for the interval between polls.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(30);

/// The default limit on the total time spent waiting.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(1200);

/// A snapshot that a waiter can poll.
///
/// Implemented by [work requests][workrequest::model::WorkRequest] and by
/// resources carrying a `lifecycle_state` field. The waiter compares
/// [status][Waitable::status] against the requested states, ignoring case.
pub trait Waitable {
    /// The current status or lifecycle state.
    fn status(&self) -> &str;

    /// True if the snapshot is in a state it can never leave.
    fn is_terminal(&self) -> bool;

    /// True if the snapshot is in a terminal state that indicates the tracked
    /// operation failed, e.g. `FAILED` or `CANCELED`.
    fn is_failure(&self) -> bool {
        false
    }
}

impl Waitable for workrequest::model::WorkRequest {
    fn status(&self) -> &str {
        &self.status
    }

    fn is_terminal(&self) -> bool {
        workrequest::model::WorkRequest::is_terminal(self)
    }

    fn is_failure(&self) -> bool {
        workrequest::model::WorkRequest::is_failure(self)
    }
}

/// A payload carrying its own resource identifier.
///
/// [wait_for_resource] uses this to read the identifier of the resource to
/// poll from the create or update response.
pub trait Identified {
    /// The resource identifier.
    fn id(&self) -> &str;
}

/// Caller-supplied configuration for one wait.
///
/// The defaults match the service recommendations: polls no more than
/// [30 seconds][DEFAULT_MAX_INTERVAL] apart, for at most
/// [20 minutes][DEFAULT_MAX_WAIT] overall.
///
/// # Example
/// ```
/// # use stratus_cloud_waiter::WaitSpec;
/// use std::time::Duration;
/// let spec = WaitSpec::new()
///     .with_states(["SUCCEEDED"])
///     .with_max_interval(Duration::from_secs(10))
///     .with_max_wait(Duration::from_secs(300));
/// ```
#[derive(Clone, Debug, Default)]
pub struct WaitSpec {
    wait_for_states: Vec<String>,
    max_interval: Option<Duration>,
    max_wait: Option<Duration>,
    succeed_on_not_found: bool,
    always_poll: bool,
    polling_error_policy: Option<Arc<dyn gax::polling_error_policy::PollingErrorPolicy>>,
}

impl WaitSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the states the caller considers "done waiting".
    ///
    /// States compare case-insensitively. With an empty set the wait is a
    /// no-op, unless [with_always_poll][WaitSpec::with_always_poll] is set.
    pub fn with_states<I, V>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.wait_for_states = v.into_iter().map(|s| s.into().to_lowercase()).collect();
        self
    }

    /// Sets the ceiling for the interval between polls.
    ///
    /// The interval starts small and grows toward this ceiling, it never
    /// exceeds it.
    pub fn with_max_interval(mut self, v: Duration) -> Self {
        self.max_interval = Some(std::cmp::max(v, Duration::from_millis(1)));
        self
    }

    /// Sets the limit on the total time spent waiting, measured from the
    /// first call into the waiter.
    pub fn with_max_wait(mut self, v: Duration) -> Self {
        self.max_wait = Some(v);
        self
    }

    /// Treat "not found" while polling as success.
    ///
    /// Only delete-family waits set this: once the delete completes, the read
    /// accessor reports the resource as gone.
    pub fn with_succeed_on_not_found(mut self, v: bool) -> Self {
        self.succeed_on_not_found = v;
        self
    }

    /// Poll even when no states were requested, until any successful terminal
    /// state.
    ///
    /// Some services treat every mutation as tracked and expect clients to
    /// wait regardless of requested states. This makes that behavior an
    /// explicit opt-in rather than something inferred at runtime.
    pub fn with_always_poll(mut self, v: bool) -> Self {
        self.always_poll = v;
        self
    }

    /// Overrides the policy applied to errors encountered while polling.
    ///
    /// The default tolerates transient errors (connection failures, timeouts,
    /// HTTP 429 and 5xx) until the wait expires, and stops on anything else.
    pub fn with_polling_error_policy<V>(mut self, v: V) -> Self
    where
        V: Into<gax::polling_error_policy::PollingErrorPolicyArg>,
    {
        self.polling_error_policy = Some(v.into().into());
        self
    }

    /// The normalized (lowercased) requested states.
    pub fn states(&self) -> &[String] {
        &self.wait_for_states
    }

    /// The ceiling for the interval between polls.
    pub fn max_interval(&self) -> Duration {
        self.max_interval.unwrap_or(DEFAULT_MAX_INTERVAL)
    }

    /// The limit on the total time spent waiting.
    pub fn max_wait(&self) -> Duration {
        self.max_wait.unwrap_or(DEFAULT_MAX_WAIT)
    }

    /// True if "not found" while polling counts as success.
    pub fn succeed_on_not_found(&self) -> bool {
        self.succeed_on_not_found
    }

    /// True if the wait polls even without requested states.
    pub fn always_poll(&self) -> bool {
        self.always_poll
    }

    fn matches(&self, lowercased_state: &str) -> bool {
        self.wait_for_states.iter().any(|s| s == lowercased_state)
    }

    fn skip_wait(&self) -> bool {
        self.wait_for_states.is_empty() && !self.always_poll
    }

    fn polling_backoff(&self) -> gax::exponential_backoff::ExponentialBackoff {
        let ceiling = self.max_interval();
        let initial = std::cmp::min(Duration::from_secs(1), ceiling);
        gax::exponential_backoff::ExponentialBackoffBuilder::new()
            .with_initial_delay(initial)
            .with_maximum_delay(ceiling)
            .with_scaling(2.0)
            .build()
            .unwrap_or_default()
    }

    fn effective_polling_error_policy(
        &self,
    ) -> Arc<dyn gax::polling_error_policy::PollingErrorPolicy> {
        self.polling_error_policy
            .clone()
            .unwrap_or_else(|| Arc::new(gax::polling_error_policy::TransientOnly))
    }
}

/// How a completed wait ended.
#[derive(Clone, Debug)]
pub enum FinalState<S> {
    /// A poll observed one of the requested states; the snapshot is included.
    Reached(S),

    /// The resource is gone and the wait spec treats absence as success.
    /// Reported by delete-family waits.
    Gone,

    /// No states were requested, the wait returned without polling.
    Skipped,
}

impl<S> FinalState<S> {
    /// The final snapshot, when one was observed.
    pub fn reached(&self) -> Option<&S> {
        match self {
            FinalState::Reached(s) => Some(s),
            _ => None,
        }
    }
}

/// The result of a mutation and its completed wait.
#[derive(Clone, Debug)]
pub struct CompletedOperation<T, S> {
    result: Response<T>,
    state: FinalState<S>,
}

impl<T, S> CompletedOperation<T, S> {
    /// The response of the mutating call.
    pub fn result(&self) -> &Response<T> {
        &self.result
    }

    /// How the wait ended.
    pub fn state(&self) -> &FinalState<S> {
        &self.state
    }

    /// Consumes the operation, returning the mutation response and the final
    /// state.
    pub fn into_parts(self) -> (Response<T>, FinalState<S>) {
        (self.result, self.state)
    }
}

/// Extracts the work request identifier from a mutation response.
///
/// The header name lookup is case-insensitive. Returns `None` when the
/// operation did not start an asynchronous job.
pub fn work_request_id<T>(result: &Response<T>) -> Option<String> {
    result
        .headers()
        .get(WORK_REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Waits for the work request started by a mutation to reach a requested
/// state.
///
/// The work request identifier is read from the
/// [`opc-work-request-id`][WORK_REQUEST_ID_HEADER] response header and passed
/// to `query` on every poll. The waiter never re-issues the mutation, it
/// only observes.
///
/// With an empty [WaitSpec::with_states] set the wait is skipped and the
/// original response is returned unchanged, without a single poll.
///
/// # Parameters
/// * `result` - the response of the just-issued mutating operation.
/// * `spec` - the wait configuration.
/// * `query` - the read accessor, typically a thin wrapper around the
///   service's `GetWorkRequest` operation. It is retried internally per the
///   executor's retry policy; the waiter adds no retries of its own beyond
///   the polling loop.
pub async fn wait_for_work_request<T, S, Q, QF>(
    result: Response<T>,
    spec: WaitSpec,
    query: Q,
) -> std::result::Result<CompletedOperation<T, S>, CompositeOperationError<T>>
where
    S: Waitable,
    Q: Fn(String) -> QF,
    QF: Future<Output = gax::Result<S>>,
{
    if spec.skip_wait() {
        return Ok(CompletedOperation {
            result,
            state: FinalState::Skipped,
        });
    }
    let Some(id) = work_request_id(&result) else {
        return Err(CompositeOperationError::new(
            result,
            WaitError::MissingWorkRequestId,
        ));
    };
    run(result, &spec, || query(id.clone())).await
}

/// Waits for a created or updated resource to reach a requested lifecycle
/// state.
///
/// The resource identifier is read from the mutation response payload, and
/// passed to `query` on every poll.
pub async fn wait_for_resource<T, S, Q, QF>(
    result: Response<T>,
    spec: WaitSpec,
    query: Q,
) -> std::result::Result<CompletedOperation<T, S>, CompositeOperationError<T>>
where
    T: Identified,
    S: Waitable,
    Q: Fn(String) -> QF,
    QF: Future<Output = gax::Result<S>>,
{
    if spec.skip_wait() {
        return Ok(CompletedOperation {
            result,
            state: FinalState::Skipped,
        });
    }
    let id = result.body().id().to_string();
    run(result, &spec, || query(id.clone())).await
}

/// Waits for a deleted resource to reach a requested lifecycle state, or to
/// disappear.
///
/// Delete responses usually carry no payload, so the caller supplies the
/// resource identifier, captured by reading the resource *before* issuing
/// the delete. Set [WaitSpec::with_succeed_on_not_found] to treat "not
/// found" while polling as completion of the delete.
pub async fn wait_for_deleted<T, S, Q, QF>(
    result: Response<T>,
    resource_id: impl Into<String>,
    spec: WaitSpec,
    query: Q,
) -> std::result::Result<CompletedOperation<T, S>, CompositeOperationError<T>>
where
    S: Waitable,
    Q: Fn(String) -> QF,
    QF: Future<Output = gax::Result<S>>,
{
    if spec.skip_wait() {
        return Ok(CompletedOperation {
            result,
            state: FinalState::Skipped,
        });
    }
    let id = resource_id.into();
    run(result, &spec, || query(id.clone())).await
}

async fn run<T, S, Q, QF>(
    result: Response<T>,
    spec: &WaitSpec,
    query: Q,
) -> std::result::Result<CompletedOperation<T, S>, CompositeOperationError<T>>
where
    S: Waitable,
    Q: Fn() -> QF,
    QF: Future<Output = gax::Result<S>>,
{
    let sleep = async |d| tokio::time::sleep(d).await;
    match details::poll_loop(spec, query, sleep).await {
        Ok(details::PollOutcome::Reached(snapshot)) => Ok(CompletedOperation {
            result,
            state: FinalState::Reached(snapshot),
        }),
        Ok(details::PollOutcome::Gone) => Ok(CompletedOperation {
            result,
            state: FinalState::Gone,
        }),
        Err(error) => Err(CompositeOperationError::new(result, error)),
    }
}
