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

//! Response types.
//!
//! This module contains types related to Stratus Cloud service responses.
//! Notably it contains the [Response] type itself: the success payload of a
//! request, paired with the response metadata.

/// Represents a Stratus Cloud service response.
///
/// A response consists of a body (potentially the unit type) and some
/// metadata, currently just headers. The headers matter even on success: for
/// asynchronous mutations the services return the identifier of the tracking
/// work request in a response header, see
/// [work_request_id][Response::headers].
///
/// Typically you get a response as the result of making a request via some
/// client in the Stratus Cloud client libraries. You may also create
/// responses directly when mocking clients in your own tests.
///
/// # Example
/// ```
/// # use stratus_cloud_gax::response::Response;
/// #[derive(Clone, Default)]
/// pub struct Resource {
///   // ...
/// }
///
/// let response = Response::from(Resource::default());
/// assert!(response.headers().is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct Response<T> {
    parts: Parts,
    body: T,
}

impl<T> Response<T> {
    /// Creates a response from the body, with empty metadata.
    pub fn from(body: T) -> Self {
        Self {
            parts: Parts::default(),
            body,
        }
    }

    /// Creates a response from the given parts.
    ///
    /// # Example
    /// ```
    /// # use stratus_cloud_gax::response::{Parts, Response};
    /// let mut headers = http::HeaderMap::new();
    /// headers.insert("opc-request-id", http::HeaderValue::from_static("1234"));
    /// let response: Response<()> = Response::from_parts(Parts::new().set_headers(headers), ());
    /// assert!(response.headers().get("opc-request-id").is_some());
    /// ```
    pub fn from_parts(parts: Parts, body: T) -> Self {
        Self { parts, body }
    }

    /// Returns the headers associated with this response.
    pub fn headers(&self) -> &http::HeaderMap<http::HeaderValue> {
        &self.parts.headers
    }

    /// Returns the body associated with this response.
    pub fn body(&self) -> &T {
        &self.body
    }

    /// Consumes the response returning the metadata and the body.
    pub fn into_parts(self) -> (Parts, T) {
        (self.parts, self.body)
    }

    /// Consumes the response returning only its body.
    pub fn into_body(self) -> T {
        self.body
    }
}

/// Component parts of a response.
///
/// The response parts, other than the body, consist of just headers. We
/// anticipate the addition of new fields over time.
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct Parts {
    /// The HTTP response headers.
    pub headers: http::HeaderMap<http::HeaderValue>,
}

impl Parts {
    /// Creates a new, empty instance.
    pub fn new() -> Self {
        Parts::default()
    }

    /// Sets the headers.
    pub fn set_headers<V>(mut self, v: V) -> Self
    where
        V: Into<http::HeaderMap>,
    {
        self.headers = v.into();
        self
    }
}
