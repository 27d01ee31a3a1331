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

use gax::response::Response;
use std::time::Duration;

/// The reason a wait failed.
///
/// Callers use this to tell "the client gave up waiting" apart from "the
/// operation failed remotely".
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WaitError {
    /// The wait expired before the operation reached a requested state.
    #[error(
        "the wait expired after {waited:?} without reaching a requested state, last observed state: {last_state:?}"
    )]
    Timeout {
        /// How long the waiter polled before giving up.
        waited: Duration,
        /// The last state observed before the timeout, if any poll succeeded.
        last_state: Option<String>,
    },

    /// The operation reached a terminal state that is not one of the
    /// requested states, e.g. `FAILED` when waiting for `SUCCEEDED`.
    #[error("the operation reached the terminal state {state:?}, which is not a requested state")]
    TerminalMismatch {
        /// The terminal state reported by the service.
        state: String,
    },

    /// Polling failed before the operation reached a requested state.
    #[error("polling failed before reaching a requested state")]
    Polling(#[source] gax::error::Error),

    /// The operation did not return a work request identifier. Either the
    /// operation does not support waiting, or the call site selected the
    /// wrong polling strategy.
    #[error("the response carries no work request id, the operation does not support waiting")]
    MissingWorkRequestId,
}

/// The error returned when a mutation succeeded but the subsequent wait
/// failed.
///
/// By the time the waiter runs, the mutation has already been applied (or at
/// least accepted) by the service. Discarding its response would discard the
/// identifier of the resource that was just created or mutated, so this error
/// always carries the original response as a partial result.
///
/// # Example
/// ```
/// # use stratus_cloud_waiter::{CompositeOperationError, WaitError};
/// # use gax::response::Response;
/// fn report(err: CompositeOperationError<String>) {
///     if err.is_timeout() {
///         // The mutation may still complete, the resource id remains usable.
///         println!("still in progress: {}", err.partial_result().body());
///     }
/// }
/// ```
#[derive(Debug)]
pub struct CompositeOperationError<T> {
    partial_result: Response<T>,
    error: WaitError,
}

impl<T> CompositeOperationError<T> {
    pub(crate) fn new(partial_result: Response<T>, error: WaitError) -> Self {
        Self {
            partial_result,
            error,
        }
    }

    /// The response of the mutation that preceded the failed wait.
    pub fn partial_result(&self) -> &Response<T> {
        &self.partial_result
    }

    /// Consumes the error, returning the response of the mutation.
    pub fn into_partial_result(self) -> Response<T> {
        self.partial_result
    }

    /// The reason the wait failed.
    pub fn error(&self) -> &WaitError {
        &self.error
    }

    /// Consumes the error, returning the partial result and the reason.
    pub fn into_parts(self) -> (Response<T>, WaitError) {
        (self.partial_result, self.error)
    }

    /// The waiter gave up after the configured maximum wait.
    pub fn is_timeout(&self) -> bool {
        matches!(self.error, WaitError::Timeout { .. })
    }

    /// The operation failed remotely: it reached a terminal state that is not
    /// one of the requested states.
    pub fn is_terminal_mismatch(&self) -> bool {
        matches!(self.error, WaitError::TerminalMismatch { .. })
    }

    /// Polling failed with a non-retryable error, or exhausted the polling
    /// error policy.
    pub fn is_polling(&self) -> bool {
        matches!(self.error, WaitError::Polling(_))
    }

    /// The operation does not support waiting.
    pub fn is_missing_work_request_id(&self) -> bool {
        matches!(self.error, WaitError::MissingWorkRequestId)
    }
}

impl<T> std::fmt::Display for CompositeOperationError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "the operation was applied but waiting for completion failed: {}",
            self.error
        )
    }
}

impl<T> std::error::Error for CompositeOperationError<T>
where
    T: std::fmt::Debug,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
