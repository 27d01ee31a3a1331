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

//! End-to-end tests for the waiters, driving a fake service over HTTP.
//!
//! These exercise the full composite-operation flow: issue a mutation through
//! the executor, hand the response to a waiter, and poll the fake service
//! until the tracked state is reached.

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use serde_json::json;
    use std::time::Duration;
    use gaxi::http::{NoBody, ReqwestClient};
    use gaxi::options::ClientConfig;
    use stratus_cloud_waiter as waiter;
    use waiter::{FinalState, WaitSpec, Waitable};
    use workrequest::model::WorkRequest;

    type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

    #[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
    #[serde(default, rename_all = "camelCase")]
    struct AddressList {
        id: String,
        display_name: String,
        lifecycle_state: String,
    }

    impl waiter::Identified for AddressList {
        fn id(&self) -> &str {
            &self.id
        }
    }

    impl Waitable for AddressList {
        fn status(&self) -> &str {
            &self.lifecycle_state
        }

        fn is_terminal(&self) -> bool {
            ["FAILED", "DELETED"]
                .iter()
                .any(|s| self.lifecycle_state.eq_ignore_ascii_case(s))
        }

        fn is_failure(&self) -> bool {
            self.lifecycle_state.eq_ignore_ascii_case("FAILED")
        }
    }

    fn fast_spec() -> WaitSpec {
        WaitSpec::new().with_max_interval(Duration::from_millis(1))
    }

    fn json_responder(status: StatusCode, body: serde_json::Value) -> Box<dyn Responder> {
        Box::new(
            status_code(status.as_u16())
                .insert_header("Content-Type", "application/json")
                .body(body.to_string()),
        )
    }

    async fn get_work_request(
        client: &ReqwestClient,
        id: String,
    ) -> gax::Result<WorkRequest> {
        let builder = client.builder(reqwest::Method::GET, format!("/workRequests/{id}"));
        client
            .execute::<NoBody, WorkRequest>(builder, None, gax::options::RequestOptions::default())
            .await
            .map(|r| r.into_body())
    }

    async fn get_address_list(
        client: &ReqwestClient,
        id: String,
    ) -> gax::Result<AddressList> {
        let builder = client.builder(reqwest::Method::GET, format!("/addressLists/{id}"));
        client
            .execute::<NoBody, AddressList>(builder, None, gax::options::RequestOptions::default())
            .await
            .map(|r| r.into_body())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn create_and_wait_on_work_request() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/addressLists")).respond_with(
                status_code(200)
                    .insert_header("Content-Type", "application/json")
                    .insert_header("opc-work-request-id", "wr-001")
                    .body(
                        json!({
                            "id": "res-001",
                            "displayName": "allow-list",
                            "lifecycleState": "CREATING",
                        })
                        .to_string(),
                    ),
            ),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/workRequests/wr-001"))
                .times(3)
                .respond_with(cycle(vec![
                    json_responder(
                        StatusCode::OK,
                        json!({"id": "wr-001", "status": "ACCEPTED"}),
                    ),
                    json_responder(
                        StatusCode::OK,
                        json!({"id": "wr-001", "status": "IN_PROGRESS"}),
                    ),
                    json_responder(
                        StatusCode::OK,
                        json!({"id": "wr-001", "status": "SUCCEEDED"}),
                    ),
                ])),
        );
        let endpoint = format!("http://{}", server.addr());
        let client = ReqwestClient::new(ClientConfig::default(), &endpoint);

        // The mutating call.
        let builder = client.builder(reqwest::Method::POST, "/addressLists".into());
        let options = gax::options::RequestOptions::default()
            .set_default_retry_token()
            .set_default_idempotency(true);
        let response = client
            .execute::<serde_json::Value, AddressList>(
                builder,
                Some(json!({"displayName": "allow-list"})),
                options,
            )
            .await?;
        assert_eq!(response.body().lifecycle_state, "CREATING");

        // The wait.
        let c = client.clone();
        let done = waiter::wait_for_work_request(
            response,
            fast_spec().with_states(["SUCCEEDED"]),
            move |id| {
                let client = c.clone();
                async move { get_work_request(&client, id).await }
            },
        )
        .await
        .map_err(|e| format!("{e}"))?;

        match done.state() {
            FinalState::Reached(wr) => assert_eq!(wr.status, "SUCCEEDED"),
            state => panic!("{state:?}"),
        }
        // The original mutation response is still available.
        assert_eq!(done.result().body().id, "res-001");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn create_and_wait_on_work_request_failure() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/addressLists")).respond_with(
                status_code(200)
                    .insert_header("Content-Type", "application/json")
                    .insert_header("opc-work-request-id", "wr-002")
                    .body(json!({"id": "res-002", "lifecycleState": "CREATING"}).to_string()),
            ),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/workRequests/wr-002"))
                .respond_with(cycle(vec![json_responder(
                    StatusCode::OK,
                    json!({"id": "wr-002", "status": "FAILED"}),
                )])),
        );
        let endpoint = format!("http://{}", server.addr());
        let client = ReqwestClient::new(ClientConfig::default(), &endpoint);

        let builder = client.builder(reqwest::Method::POST, "/addressLists".into());
        let response = client
            .execute::<serde_json::Value, AddressList>(
                builder,
                Some(json!({"displayName": "deny-list"})),
                gax::options::RequestOptions::default(),
            )
            .await?;

        let c = client.clone();
        let err = waiter::wait_for_work_request::<_, WorkRequest, _, _>(
            response,
            fast_spec().with_states(["SUCCEEDED"]),
            move |id| {
                let client = c.clone();
                async move { get_work_request(&client, id).await }
            },
        )
        .await
        .expect_err("a FAILED work request is a terminal mismatch");

        assert!(err.is_terminal_mismatch(), "{err}");
        // The created resource remains reachable through the partial result.
        assert_eq!(err.partial_result().body().id, "res-002");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn update_and_wait_on_lifecycle_state() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("PUT", "/addressLists/res-001"))
                .respond_with(json_responder(
                    StatusCode::OK,
                    json!({"id": "res-001", "displayName": "allow-list", "lifecycleState": "UPDATING"}),
                )),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/addressLists/res-001"))
                .times(2)
                .respond_with(cycle(vec![
                    json_responder(
                        StatusCode::OK,
                        json!({"id": "res-001", "lifecycleState": "UPDATING"}),
                    ),
                    json_responder(
                        StatusCode::OK,
                        json!({"id": "res-001", "lifecycleState": "ACTIVE"}),
                    ),
                ])),
        );
        let endpoint = format!("http://{}", server.addr());
        let client = ReqwestClient::new(ClientConfig::default(), &endpoint);

        let builder = client.builder(reqwest::Method::PUT, "/addressLists/res-001".into());
        let response = client
            .execute::<serde_json::Value, AddressList>(
                builder,
                Some(json!({"displayName": "allow-list"})),
                gax::options::RequestOptions::default(),
            )
            .await?;

        let c = client.clone();
        let done = waiter::wait_for_resource(
            response,
            fast_spec().with_states(["ACTIVE"]),
            move |id| {
                let client = c.clone();
                async move { get_address_list(&client, id).await }
            },
        )
        .await
        .map_err(|e| format!("{e}"))?;

        match done.state() {
            FinalState::Reached(got) => assert_eq!(got.lifecycle_state, "ACTIVE"),
            state => panic!("{state:?}"),
        }
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn delete_and_wait_for_not_found() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("DELETE", "/addressLists/res-001"))
                .respond_with(status_code(204)),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/addressLists/res-001"))
                .times(2)
                .respond_with(cycle(vec![
                    json_responder(
                        StatusCode::OK,
                        json!({"id": "res-001", "lifecycleState": "DELETING"}),
                    ),
                    json_responder(
                        StatusCode::NOT_FOUND,
                        json!({"code": "NotAuthorizedOrNotFound", "message": "resource does not exist"}),
                    ),
                ])),
        );
        let endpoint = format!("http://{}", server.addr());
        let client = ReqwestClient::new(ClientConfig::default(), &endpoint);

        let builder = client.builder(reqwest::Method::DELETE, "/addressLists/res-001".into());
        let response = client
            .execute::<NoBody, serde_json::Value>(
                builder,
                None,
                gax::options::RequestOptions::default(),
            )
            .await?;

        let c = client.clone();
        let done = waiter::wait_for_deleted::<_, AddressList, _, _>(
            response,
            "res-001",
            fast_spec()
                .with_states(["DELETED"])
                .with_succeed_on_not_found(true),
            move |id| {
                let client = c.clone();
                async move { get_address_list(&client, id).await }
            },
        )
        .await
        .map_err(|e| format!("{e}"))?;

        assert!(matches!(done.state(), FinalState::Gone));
        Ok(())
    }
}
