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

//! Defines the trait for polling error policies and some common
//! implementations.
//!
//! Waiters poll long-running operations until they reach a requested state,
//! and need to (1) distinguish between transient and permanent errors while
//! polling, and (2) provide a mechanism to stop a polling loop that cannot
//! make progress.
//!
//! # Example
//! ```
//! # use stratus_cloud_gax::polling_error_policy::*;
//! use std::time::Duration;
//! // Tolerate transient polling errors for at most 15 minutes or at most 50
//! // attempts: whichever limit is reached first stops the polling loop.
//! let policy = TransientOnly
//!     .with_time_limit(Duration::from_secs(15 * 60))
//!     .with_attempt_limit(50);
//! ```

use crate::error::Error;
use crate::loop_state::LoopState;
use std::sync::Arc;

/// Determines how errors are handled in the polling loop.
///
/// Implementations of this trait determine if polling errors may resolve in
/// future attempts, and for how long the polling loop may continue.
pub trait PollingErrorPolicy: Send + Sync + std::fmt::Debug {
    /// Query the polling policy after an error.
    ///
    /// # Parameters
    /// * `loop_start` - when the polling loop started.
    /// * `attempt_count` - the number of polls, including the one that just
    ///   failed. Always non-zero.
    /// * `error` - the error returned by the poll.
    fn on_error(
        &self,
        loop_start: std::time::Instant,
        attempt_count: u32,
        error: Error,
    ) -> LoopState;
}

/// A helper type to use [PollingErrorPolicy] in client and request options.
#[derive(Clone)]
pub struct PollingErrorPolicyArg(pub(crate) Arc<dyn PollingErrorPolicy>);

impl<T> std::convert::From<T> for PollingErrorPolicyArg
where
    T: PollingErrorPolicy + 'static,
{
    fn from(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl std::convert::From<Arc<dyn PollingErrorPolicy>> for PollingErrorPolicyArg {
    fn from(value: Arc<dyn PollingErrorPolicy>) -> Self {
        Self(value)
    }
}

impl std::convert::From<PollingErrorPolicyArg> for Arc<dyn PollingErrorPolicy> {
    fn from(value: PollingErrorPolicyArg) -> Self {
        value.0
    }
}

/// Extension trait for [PollingErrorPolicy].
pub trait PollingErrorPolicyExt: PollingErrorPolicy + Sized {
    /// Decorate a [PollingErrorPolicy] to limit the total elapsed time in the
    /// polling loop.
    fn with_time_limit(self, maximum_duration: std::time::Duration) -> LimitedElapsedTime<Self> {
        LimitedElapsedTime::custom(self, maximum_duration)
    }

    /// Decorate a [PollingErrorPolicy] to limit the number of failed polls.
    fn with_attempt_limit(self, maximum_attempts: u32) -> LimitedAttemptCount<Self> {
        LimitedAttemptCount::custom(self, maximum_attempts)
    }
}

impl<T: PollingErrorPolicy> PollingErrorPolicyExt for T {}

/// A polling policy that only continues on transient errors.
///
/// The policy continues when the poll failed before reaching the service
/// (connection errors, client-side timeouts) or when the service asked the
/// client to slow down or reported a server-side problem (HTTP 429 and 5xx).
/// All other errors stop the polling loop.
#[derive(Clone, Debug)]
pub struct TransientOnly;

impl PollingErrorPolicy for TransientOnly {
    fn on_error(
        &self,
        _loop_start: std::time::Instant,
        _attempt_count: u32,
        error: Error,
    ) -> LoopState {
        if error.is_io() || error.is_timeout() {
            return LoopState::Continue(error);
        }
        match error.http_status_code() {
            Some(429) => LoopState::Continue(error),
            Some(code) if code >= 500 => LoopState::Continue(error),
            _ => LoopState::Permanent(error),
        }
    }
}

/// A polling policy that continues on any error.
///
/// This policy must be decorated to limit the number of polling attempts or
/// the duration of the polling loop.
#[derive(Clone, Debug)]
pub struct AlwaysContinue;

impl PollingErrorPolicy for AlwaysContinue {
    fn on_error(
        &self,
        _loop_start: std::time::Instant,
        _attempt_count: u32,
        error: Error,
    ) -> LoopState {
        LoopState::Continue(error)
    }
}

/// A polling policy decorator that limits the total time in the polling loop.
///
/// While the time spent in the polling loop (including time in backoff) is
/// less than the prescribed duration, `on_error()` returns the results of the
/// inner policy. After that time it returns
/// [Exhausted][LoopState::Exhausted] if the inner policy returns
/// [Continue][LoopState::Continue].
///
/// # Parameters
/// * `P` - the inner polling policy, defaults to [TransientOnly].
#[derive(Clone, Debug)]
pub struct LimitedElapsedTime<P = TransientOnly>
where
    P: PollingErrorPolicy,
{
    inner: P,
    maximum_duration: std::time::Duration,
}

impl LimitedElapsedTime {
    /// Creates a new instance, with the default inner policy.
    pub fn new(maximum_duration: std::time::Duration) -> Self {
        Self {
            inner: TransientOnly,
            maximum_duration,
        }
    }
}

impl<P> LimitedElapsedTime<P>
where
    P: PollingErrorPolicy,
{
    /// Creates a new instance with a custom inner policy.
    pub fn custom(inner: P, maximum_duration: std::time::Duration) -> Self {
        Self {
            inner,
            maximum_duration,
        }
    }
}

impl<P> PollingErrorPolicy for LimitedElapsedTime<P>
where
    P: PollingErrorPolicy,
{
    fn on_error(
        &self,
        loop_start: std::time::Instant,
        attempt_count: u32,
        error: Error,
    ) -> LoopState {
        match self.inner.on_error(loop_start, attempt_count, error) {
            LoopState::Continue(e)
                if std::time::Instant::now() >= loop_start + self.maximum_duration =>
            {
                LoopState::Exhausted(e)
            }
            state => state,
        }
    }
}

/// A polling policy decorator that limits the number of failed polls.
///
/// The policy passes through the results from the inner policy as long as
/// `attempt_count < maximum_attempts`. Once the maximum number of attempts is
/// reached, the policy returns [Exhausted][LoopState::Exhausted] if the inner
/// policy returns [Continue][LoopState::Continue].
///
/// # Parameters
/// * `P` - the inner polling policy, defaults to [TransientOnly].
#[derive(Clone, Debug)]
pub struct LimitedAttemptCount<P = TransientOnly>
where
    P: PollingErrorPolicy,
{
    inner: P,
    maximum_attempts: u32,
}

impl LimitedAttemptCount {
    /// Creates a new instance, with the default inner policy.
    pub fn new(maximum_attempts: u32) -> Self {
        Self {
            inner: TransientOnly,
            maximum_attempts,
        }
    }
}

impl<P> LimitedAttemptCount<P>
where
    P: PollingErrorPolicy,
{
    /// Creates a new instance with a custom inner policy.
    pub fn custom(inner: P, maximum_attempts: u32) -> Self {
        Self {
            inner,
            maximum_attempts,
        }
    }
}

impl<P> PollingErrorPolicy for LimitedAttemptCount<P>
where
    P: PollingErrorPolicy,
{
    fn on_error(
        &self,
        loop_start: std::time::Instant,
        attempt_count: u32,
        error: Error,
    ) -> LoopState {
        match self.inner.on_error(loop_start, attempt_count, error) {
            LoopState::Continue(e) if attempt_count >= self.maximum_attempts => {
                LoopState::Exhausted(e)
            }
            state => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceErrorBody;
    use std::time::{Duration, Instant};
    use test_case::test_case;

    fn http_error(code: u16) -> Error {
        Error::service(
            code,
            http::HeaderMap::new(),
            ServiceErrorBody::new()
                .set_code("TestOnly")
                .set_message("test only"),
        )
    }

    #[test_case(Error::io("reset"), true; "io error")]
    #[test_case(Error::timeout("deadline"), true; "timeout")]
    #[test_case(http_error(429), true; "throttled")]
    #[test_case(http_error(503), true; "unavailable")]
    #[test_case(http_error(500), true; "internal")]
    #[test_case(http_error(404), false; "not found")]
    #[test_case(http_error(400), false; "bad request")]
    #[test_case(Error::deser("bad body"), false; "deserialization")]
    fn transient_only(error: Error, want_continue: bool) {
        let p = TransientOnly;
        let got = p.on_error(Instant::now(), 1, error);
        assert_eq!(got.is_continue(), want_continue, "{got:?}");
    }

    #[test]
    fn always_continue() {
        let p = AlwaysContinue;
        let got = p.on_error(Instant::now(), 1, http_error(400));
        assert!(got.is_continue(), "{got:?}");
    }

    #[test]
    fn limited_elapsed_time() {
        let p = LimitedElapsedTime::new(Duration::from_secs(10));

        let got = p.on_error(Instant::now(), 1, Error::io("reset"));
        assert!(got.is_continue(), "{got:?}");

        let expired = Instant::now() - Duration::from_secs(20);
        let got = p.on_error(expired, 1, Error::io("reset"));
        assert!(got.is_exhausted(), "{got:?}");

        let got = p.on_error(expired, 1, http_error(400));
        assert!(got.is_permanent(), "{got:?}");
    }

    #[test]
    fn limited_attempt_count() {
        let p = AlwaysContinue.with_attempt_limit(3);
        let now = Instant::now();
        for attempt in 1..3 {
            let got = p.on_error(now, attempt, Error::io("reset"));
            assert!(got.is_continue(), "attempt {attempt}: {got:?}");
        }
        let got = p.on_error(now, 3, Error::io("reset"));
        assert!(got.is_exhausted(), "{got:?}");
    }

    #[test]
    fn composition() {
        let p = TransientOnly
            .with_time_limit(Duration::from_secs(10))
            .with_attempt_limit(5);
        let got = p.on_error(Instant::now(), 1, http_error(503));
        assert!(got.is_continue(), "{got:?}");
        let got = p.on_error(Instant::now(), 1, http_error(404));
        assert!(got.is_permanent(), "{got:?}");
    }

    #[test]
    fn arg_conversions() {
        let _arg = PollingErrorPolicyArg::from(TransientOnly);
        let policy: Arc<dyn PollingErrorPolicy> = Arc::new(AlwaysContinue);
        let _arg = PollingErrorPolicyArg::from(policy);
    }
}
