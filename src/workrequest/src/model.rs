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

/// An asynchronous job tracked by the service.
///
/// Work requests are created by the service when it accepts an asynchronous
/// mutation. They are owned by the service: clients only read them, typically
/// to find out whether the mutation completed.
///
/// The `status` field is a string rather than an enum: services add statuses
/// over time, and the client libraries must not fail to parse a work request
/// with an unknown status. The well-known values are listed in
/// [work_request_status].
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct WorkRequest {
    /// The identifier of the work request.
    pub id: String,

    /// The asynchronous operation tracked by this work request, e.g.
    /// `CREATE_ADDRESS_LIST`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub operation_type: String,

    /// The status of the work request.
    pub status: String,

    /// The percentage of the request that has completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<f32>,

    /// When the service accepted the request.
    #[serde(with = "time::serde::rfc3339::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_accepted: Option<time::OffsetDateTime>,

    /// When the service started processing the request.
    #[serde(with = "time::serde::rfc3339::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_started: Option<time::OffsetDateTime>,

    /// When the request reached a terminal status.
    #[serde(with = "time::serde::rfc3339::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_finished: Option<time::OffsetDateTime>,
}

impl WorkRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [id][WorkRequest::id].
    pub fn set_id<T: Into<String>>(mut self, v: T) -> Self {
        self.id = v.into();
        self
    }

    /// Sets the value of [operation_type][WorkRequest::operation_type].
    pub fn set_operation_type<T: Into<String>>(mut self, v: T) -> Self {
        self.operation_type = v.into();
        self
    }

    /// Sets the value of [status][WorkRequest::status].
    pub fn set_status<T: Into<String>>(mut self, v: T) -> Self {
        self.status = v.into();
        self
    }

    /// Sets the value of [percent_complete][WorkRequest::percent_complete].
    pub fn set_percent_complete<T: Into<f32>>(mut self, v: T) -> Self {
        self.percent_complete = Some(v.into());
        self
    }

    /// Sets the value of [time_accepted][WorkRequest::time_accepted].
    pub fn set_time_accepted<T: Into<time::OffsetDateTime>>(mut self, v: T) -> Self {
        self.time_accepted = Some(v.into());
        self
    }

    /// Sets the value of [time_started][WorkRequest::time_started].
    pub fn set_time_started<T: Into<time::OffsetDateTime>>(mut self, v: T) -> Self {
        self.time_started = Some(v.into());
        self
    }

    /// Sets the value of [time_finished][WorkRequest::time_finished].
    pub fn set_time_finished<T: Into<time::OffsetDateTime>>(mut self, v: T) -> Self {
        self.time_finished = Some(v.into());
        self
    }

    /// Returns true if the work request reached a terminal status.
    ///
    /// The comparison is case-insensitive, as the services are not consistent
    /// about the case of status values.
    pub fn is_terminal(&self) -> bool {
        use work_request_status::*;
        [SUCCEEDED, FAILED, CANCELED]
            .iter()
            .any(|s| self.status.eq_ignore_ascii_case(s))
    }

    /// Returns true if the work request reached a terminal status other than
    /// success.
    pub fn is_failure(&self) -> bool {
        use work_request_status::*;
        [FAILED, CANCELED]
            .iter()
            .any(|s| self.status.eq_ignore_ascii_case(s))
    }
}

/// The well-known values for [WorkRequest::status].
pub mod work_request_status {
    /// The request is in the work queue.
    pub const ACCEPTED: &str = "ACCEPTED";

    /// The request is being processed.
    pub const IN_PROGRESS: &str = "IN_PROGRESS";

    /// The request completed successfully.
    pub const SUCCEEDED: &str = "SUCCEEDED";

    /// The request completed with an error.
    pub const FAILED: &str = "FAILED";

    /// The request was canceled before it completed.
    pub const CANCELED: &str = "CANCELED";
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn builders() {
        let wr = WorkRequest::new()
            .set_id("wr-001")
            .set_operation_type("CREATE_ADDRESS_LIST")
            .set_status(work_request_status::ACCEPTED)
            .set_percent_complete(25.0f32);
        assert_eq!(wr.id, "wr-001");
        assert_eq!(wr.operation_type, "CREATE_ADDRESS_LIST");
        assert_eq!(wr.status, "ACCEPTED");
        assert_eq!(wr.percent_complete, Some(25.0));
    }

    #[test_case("ACCEPTED", false, false)]
    #[test_case("IN_PROGRESS", false, false)]
    #[test_case("SUCCEEDED", true, false)]
    #[test_case("succeeded", true, false)]
    #[test_case("FAILED", true, true)]
    #[test_case("failed", true, true)]
    #[test_case("CANCELED", true, true)]
    #[test_case("SOMETHING_NEW", false, false)]
    fn status_predicates(status: &str, terminal: bool, failure: bool) {
        let wr = WorkRequest::new().set_status(status);
        assert_eq!(wr.is_terminal(), terminal, "{status}");
        assert_eq!(wr.is_failure(), failure, "{status}");
    }

    #[test]
    fn deserialize_full() -> anyhow::Result<()> {
        let json = serde_json::json!({
            "id": "wr-001",
            "operationType": "CREATE_ADDRESS_LIST",
            "status": "IN_PROGRESS",
            "percentComplete": 50.0,
            "timeAccepted": "2025-03-01T12:00:00Z",
            "timeStarted": "2025-03-01T12:00:05Z",
        });
        let got = serde_json::from_value::<WorkRequest>(json)?;
        assert_eq!(got.id, "wr-001");
        assert_eq!(got.status, "IN_PROGRESS");
        assert_eq!(got.percent_complete, Some(50.0));
        assert!(got.time_accepted.is_some());
        assert!(got.time_started.is_some());
        assert!(got.time_finished.is_none());
        Ok(())
    }

    #[test]
    fn deserialize_ignores_missing_fields() -> anyhow::Result<()> {
        let json = serde_json::json!({
            "id": "wr-001",
            "status": "ACCEPTED",
        });
        let got = serde_json::from_value::<WorkRequest>(json)?;
        assert_eq!(got, WorkRequest::new().set_id("wr-001").set_status("ACCEPTED"));
        Ok(())
    }

    #[test]
    fn serialize_skips_empty() -> anyhow::Result<()> {
        let wr = WorkRequest::new().set_id("wr-001").set_status("ACCEPTED");
        let got = serde_json::to_value(&wr)?;
        let want = serde_json::json!({
            "id": "wr-001",
            "status": "ACCEPTED",
        });
        assert_eq!(got, want);
        Ok(())
    }
}
