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

//! Implementation details for the Stratus Cloud client libraries.
//!
//! This crate contains the HTTP transport shared by the generated clients:
//! a thin wrapper over `reqwest` that applies the configured retry policy,
//! attaches idempotency tokens to mutating requests, and converts responses
//! and error documents into the `stratus-cloud-gax` types.
//!
//! Types and functions in this crate may be changed or removed without
//! notice. Applications should use the types re-exported by the generated
//! clients instead.

/// The HTTP client and the request/response conversion helpers.
pub mod http;

/// Client configuration.
pub mod options;

/// Idempotency token generation.
pub mod retry_token;
