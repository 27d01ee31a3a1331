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

//! The retry loop used by the request executor.

use super::Result;
use super::backoff_policy::BackoffPolicy;
use super::error::Error;
use super::loop_state::LoopState;
use super::retry_policy::RetryPolicy;
use std::sync::Arc;
use std::time::Duration;

enum Attempt {
    // The first attempt.
    Initial,
    // (Attempt count, backoff delay, previous error)
    Retry(u32, Duration, Error),
}

impl Attempt {
    fn count(&self) -> u32 {
        match self {
            Attempt::Initial => 0,
            Attempt::Retry(count, _, _) => *count,
        }
    }
}

/// Runs the retry loop for a given function.
///
/// This function calls an inner function as long as (1) the retry policy has
/// not expired, and (2) the inner function has not returned a successful
/// result.
///
/// In between attempts the function waits the amount of time prescribed by
/// the backoff policy, using `sleep` to implement any wait.
///
/// Each attempt receives the time remaining in the retry policy, so it can
/// bound its own timeout.
pub async fn retry_loop<F, S, Response>(
    mut inner: F,
    sleep: S,
    idempotent: bool,
    retry_policy: Arc<dyn RetryPolicy>,
    backoff_policy: Arc<dyn BackoffPolicy>,
) -> Result<Response>
where
    F: AsyncFnMut(Option<Duration>) -> Result<Response> + Send,
    S: AsyncFn(Duration) -> () + Send,
{
    let loop_start = tokio::time::Instant::now().into_std();
    let mut attempt = Attempt::Initial;
    loop {
        let mut attempt_count = attempt.count();
        let remaining_time = retry_policy.remaining_time(loop_start, attempt_count);

        if let Attempt::Retry(_, delay, prev_error) = attempt {
            if remaining_time.is_some_and(|remaining| remaining < delay) {
                return Err(Error::exhausted(prev_error));
            }
            sleep(delay).await;
        }
        attempt_count += 1;
        match inner(remaining_time).await {
            Ok(r) => return Ok(r),
            Err(e) => {
                let delay = backoff_policy.on_failure(loop_start, attempt_count);
                match retry_policy.on_error(loop_start, attempt_count, idempotent, e) {
                    LoopState::Permanent(e) | LoopState::Exhausted(e) => return Err(e),
                    LoopState::Continue(e) => {
                        attempt = Attempt::Retry(attempt_count, delay, e);
                    }
                }
            }
        }
    }
}

/// Computes the timeout for the next attempt, given the per-attempt timeout
/// and the time remaining in the retry policy.
pub fn effective_timeout(
    options: &crate::options::RequestOptions,
    remaining_time: Option<Duration>,
) -> Option<Duration> {
    match (options.attempt_timeout(), remaining_time) {
        (None, None) => None,
        (None, Some(t)) => Some(t),
        (Some(t), None) => Some(*t),
        (Some(a), Some(r)) => Some(*std::cmp::min(a, &r)),
    }
}
