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

/// The error body returned by Stratus Cloud services.
///
/// When a request fails, the services return a small JSON document with a
/// symbolic error code and a human readable message:
///
/// ```json
/// { "code": "NotAuthorizedOrNotFound", "message": "resource does not exist" }
/// ```
///
/// The client libraries parse this document and attach it to the
/// [Error][crate::error::Error] returned to the application.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct ServiceErrorBody {
    /// The symbolic error code, e.g. `InvalidParameter` or `TooManyRequests`.
    pub code: String,

    /// A human readable description of the problem.
    pub message: String,
}

impl ServiceErrorBody {
    /// Creates a new, empty error body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the symbolic error code.
    pub fn set_code<T: Into<String>>(mut self, v: T) -> Self {
        self.code = v.into();
        self
    }

    /// Sets the human readable message.
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = v.into();
        self
    }
}

impl std::fmt::Display for ServiceErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl TryFrom<&bytes::Bytes> for ServiceErrorBody {
    type Error = serde_json::Error;

    fn try_from(value: &bytes::Bytes) -> std::result::Result<Self, Self::Error> {
        serde_json::from_slice(value)
    }
}
