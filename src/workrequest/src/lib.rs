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

//! Stratus Cloud work requests.
//!
//! Mutating operations on many Stratus Cloud services are asynchronous: the
//! service accepts the request, returns the identifier of a *work request*
//! tracking the job, and completes the mutation in the background. This crate
//! contains the work request resource model. The helpers to wait for a work
//! request to complete live in the `stratus-cloud-waiter` crate.

/// The resource messages for work requests.
pub mod model;
