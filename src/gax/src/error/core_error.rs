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

use super::ServiceErrorBody;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The core error returned by all client libraries.
///
/// The client libraries report errors from multiple sources. The service may
/// return an error document, the transport may be unable to complete the
/// request, the retry policy may be exhausted, or the library may reject the
/// request before sending it because a required argument is missing.
///
/// Most applications just return or log the error. Applications that need to
/// interrogate the details can use the predicates to determine the error kind
/// and the accessors to query the most common details. The error
/// [source][std::error::Error::source] provides deeper information.
///
/// # Example
/// ```
/// use stratus_cloud_gax::error::Error;
/// match example_call() {
///     Err(e) if e.is_not_found() => { println!("it is not there: {e}"); },
///     Err(e) if e.is_timeout() => { println!("not enough time: {e}"); },
///     Err(e) => { println!("some other error: {e}"); },
///     Ok(_) => { println!("success"); },
/// }
///
/// fn example_call() -> Result<String, Error> {
///     # use stratus_cloud_gax::error::ServiceErrorBody;
///     # Err(Error::service(404, http::HeaderMap::new(),
///     #     ServiceErrorBody::new().set_code("NotFound").set_message("nope")))
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error for a required argument that is missing or invalid.
    ///
    /// These errors are detected before any request is sent. They are never
    /// transient: retrying the same call produces the same result.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self {
            kind: ErrorKind::Validation(message.into()),
            source: None,
        }
    }

    /// The request was rejected by the client library before it was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::Validation(_))
    }

    /// Creates an error from the error document returned by the service.
    ///
    /// # Example
    /// ```
    /// use stratus_cloud_gax::error::{Error, ServiceErrorBody};
    /// let body = ServiceErrorBody::new().set_code("NotFound").set_message("nope");
    /// let error = Error::service(404, http::HeaderMap::new(), body.clone());
    /// assert_eq!(error.service_error(), Some(&body));
    /// ```
    pub fn service(status_code: u16, headers: http::HeaderMap, body: ServiceErrorBody) -> Self {
        Self {
            kind: ErrorKind::Service(Box::new(ServiceDetails {
                status_code,
                headers,
                body,
            })),
            source: None,
        }
    }

    /// Creates an error for a non-2xx response whose body could not be parsed
    /// as a service error document.
    pub fn http(status_code: u16, headers: http::HeaderMap, payload: bytes::Bytes) -> Self {
        Self {
            kind: ErrorKind::Transport(Box::new(TransportDetails {
                status_code,
                headers,
                payload,
            })),
            source: None,
        }
    }

    /// Creates an error representing a problem sending or completing the
    /// request, e.g. a connection reset.
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Io,
            source: Some(source.into()),
        }
    }

    /// The request could not be sent, or the response could not be received.
    ///
    /// Note that the request may or may not have started, and it may or may
    /// not have completed in the service.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io)
    }

    /// Creates an error representing a timeout.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use stratus_cloud_gax::error::Error;
    /// let error = Error::timeout("simulated timeout");
    /// assert!(error.is_timeout());
    /// assert!(error.source().is_some());
    /// ```
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            source: Some(source.into()),
        }
    }

    /// The request could not be completed before its deadline.
    ///
    /// This is always a client-side generated error. The request may or may
    /// not have completed in the service.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Creates an error representing an exhausted retry policy.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use stratus_cloud_gax::error::Error;
    /// let error = Error::exhausted(Error::timeout("simulated timeout"));
    /// assert!(error.is_exhausted());
    /// assert!(error.source().is_some());
    /// ```
    pub fn exhausted<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Exhausted,
            source: Some(source.into()),
        }
    }

    /// The request could not complete before the retry policy expired.
    ///
    /// This is always a client-side generated error, though it is usually the
    /// result of multiple errors received from the service. The last of those
    /// errors is available via [source][std::error::Error::source].
    pub fn is_exhausted(&self) -> bool {
        matches!(self.kind, ErrorKind::Exhausted)
    }

    /// Creates an error representing a serialization problem.
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Serialization,
            source: Some(source.into()),
        }
    }

    /// The request could not be serialized.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Serialization)
    }

    /// Creates an error representing a deserialization problem.
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// The response could not be deserialized.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// Creates an error that does not fit any other category.
    pub fn other<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Other,
            source: Some(source.into()),
        }
    }

    /// The parsed error document associated with this error, if any.
    pub fn service_error(&self) -> Option<&ServiceErrorBody> {
        match &self.kind {
            ErrorKind::Service(d) => Some(&d.body),
            _ => None,
        }
    }

    /// The HTTP status code, if any, associated with this error.
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Service(d) => Some(d.status_code),
            ErrorKind::Transport(d) => Some(d.status_code),
            _ => None,
        }
    }

    /// The response headers, if any, associated with this error.
    pub fn http_headers(&self) -> Option<&http::HeaderMap> {
        match &self.kind {
            ErrorKind::Service(d) => Some(&d.headers),
            ErrorKind::Transport(d) => Some(&d.headers),
            _ => None,
        }
    }

    /// The raw response payload, when the error body could not be parsed.
    pub fn http_payload(&self) -> Option<&bytes::Bytes> {
        match &self.kind {
            ErrorKind::Transport(d) => Some(&d.payload),
            _ => None,
        }
    }

    /// The service reported that the target resource does not exist.
    ///
    /// Delete-family waiters treat this as a terminal success; everywhere else
    /// it is a permanent error.
    pub fn is_not_found(&self) -> bool {
        self.http_status_code() == Some(404)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ErrorKind::Validation(m) => {
                write!(f, "a required argument is missing or invalid: {m}")
            }
            ErrorKind::Io => write!(f, "cannot send or complete the request"),
            ErrorKind::Timeout => write!(f, "the request exceeded its deadline"),
            ErrorKind::Exhausted => write!(f, "the retry policy was exhausted"),
            ErrorKind::Serialization => write!(f, "cannot serialize the request"),
            ErrorKind::Deserialization => write!(f, "cannot deserialize the response"),
            ErrorKind::Service(d) => write!(
                f,
                "the service reports an error with http status code {}: {}",
                d.status_code, d.body
            ),
            ErrorKind::Transport(d) => {
                write!(f, "the request failed with http status code {}", d.status_code)?;
                if !d.payload.is_empty() {
                    write!(f, ", payload={:?}", d.payload)?;
                }
                Ok(())
            }
            ErrorKind::Other => write!(f, "the request failed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[derive(Debug)]
enum ErrorKind {
    Validation(String),
    Io,
    Timeout,
    Exhausted,
    Serialization,
    Deserialization,
    Service(Box<ServiceDetails>),
    Transport(Box<TransportDetails>),
    Other,
}

#[derive(Debug)]
struct ServiceDetails {
    status_code: u16,
    headers: http::HeaderMap,
    body: ServiceErrorBody,
}

#[derive(Debug)]
struct TransportDetails {
    status_code: u16,
    headers: http::HeaderMap,
    payload: bytes::Bytes,
}
