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

//! Stratus Cloud API helpers.
//!
//! This crate contains the types and functions shared by all the Stratus Cloud
//! client libraries for Rust: the error model, the retry and polling policy
//! traits with their common implementations, the retry loop, and the request
//! and response envelope types.
//!
//! None of the types in this crate issue network calls. The HTTP transport
//! lives in `stratus-cloud-gax-internal`, and the long-running operation
//! helpers in `stratus-cloud-waiter`.

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
///
/// This is the result type used by all functions wrapping service calls.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// The core error types used by the client libraries.
pub mod error;

/// Loop control decisions shared by retry and polling policies.
pub mod loop_state;

/// The retry policy trait and common implementations.
pub mod retry_policy;

/// The backoff policy trait used between retry attempts.
pub mod backoff_policy;

/// The backoff policy trait used between polling attempts.
pub mod polling_backoff_policy;

/// Truncated exponential backoff, usable for both retries and polling.
pub mod exponential_backoff;

/// The polling error policy trait and common implementations.
pub mod polling_error_policy;

/// The retry loop used by the request executor.
pub mod retry_loop;

/// Client configuration and per-request options.
pub mod options;

/// Response types.
pub mod response;
