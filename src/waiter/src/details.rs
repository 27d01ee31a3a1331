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

//! The polling loop shared by all waiters.

use crate::{WaitError, WaitSpec, Waitable};
use gax::loop_state::LoopState;
use gax::polling_backoff_policy::PollingBackoffPolicy;

/// How a successful wait ended.
pub(crate) enum PollOutcome<S> {
    /// A poll observed one of the requested states.
    Reached(S),
    /// A poll observed that the resource is gone, and the wait spec treats
    /// absence as success.
    Gone,
}

/// Polls `query` until a requested state is reached, a terminal state rules
/// it out, or the wait expires.
///
/// Polls are strictly sequential: no poll is issued before the previous one
/// resolves. The only suspension points are the query itself and the
/// inter-poll sleep, so callers can abandon a wait promptly by dropping the
/// future.
///
/// The elapsed time is measured from entry into this function. Between polls
/// the loop sleeps the period prescribed by the spec's backoff, and it fails
/// with [WaitError::Timeout] instead of starting a sleep that cannot finish
/// within the budget.
pub(crate) async fn poll_loop<S, Q, QF, Sleep>(
    spec: &WaitSpec,
    query: Q,
    sleep: Sleep,
) -> std::result::Result<PollOutcome<S>, WaitError>
where
    S: Waitable,
    Q: Fn() -> QF,
    QF: Future<Output = gax::Result<S>>,
    Sleep: AsyncFn(std::time::Duration) -> (),
{
    let loop_start = tokio::time::Instant::now().into_std();
    let backoff = spec.polling_backoff();
    let error_policy = spec.effective_polling_error_policy();
    let mut attempt: u32 = 0;
    let mut last_state: Option<String> = None;
    loop {
        attempt += 1;
        match query().await {
            Ok(snapshot) => {
                let state = snapshot.status().to_lowercase();
                if spec.matches(&state) {
                    return Ok(PollOutcome::Reached(snapshot));
                }
                if snapshot.is_terminal() {
                    // With no requested states the caller asked to wait for
                    // any successful terminal state.
                    if spec.states().is_empty() && !snapshot.is_failure() {
                        return Ok(PollOutcome::Reached(snapshot));
                    }
                    return Err(WaitError::TerminalMismatch {
                        state: snapshot.status().to_string(),
                    });
                }
                last_state = Some(state);
            }
            Err(e) if e.is_not_found() && spec.succeed_on_not_found() => {
                return Ok(PollOutcome::Gone);
            }
            Err(e) => match error_policy.on_error(loop_start, attempt, e) {
                LoopState::Continue(_) => {}
                LoopState::Permanent(e) | LoopState::Exhausted(e) => {
                    return Err(WaitError::Polling(e));
                }
            },
        }
        let elapsed = tokio::time::Instant::now().into_std().duration_since(loop_start);
        let delay = backoff.wait_period(loop_start, attempt);
        if elapsed >= spec.max_wait() || spec.max_wait() - elapsed < delay {
            return Err(WaitError::Timeout {
                waited: elapsed,
                last_state,
            });
        }
        sleep(delay).await;
    }
}
