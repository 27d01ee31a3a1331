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

//! These tests verify the HTTP client uses the retry and backoff policies as
//! expected. They do not test the policy implementations, that is done in the
//! unit tests.
//!
//! The tests use an HTTP server that returns a sequence of responses. The
//! sequence is specific to each test, intended to drive the retry loop as
//! needed for that test.

#[cfg(test)]
mod tests {
    use gax::backoff_policy::BackoffPolicy;
    use gax::exponential_backoff::ExponentialBackoffBuilder;
    use gax::options::RequestOptions;
    use gax::retry_policy::{RetryPolicyExt, TransientErrors};
    use http::StatusCode;
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use serde_json::json;
    use std::time::Duration;
    use stratus_cloud_gax_internal::http::ReqwestClient;
    use stratus_cloud_gax_internal::options::ClientConfig;

    type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn no_retry_immediate_success() -> Result<()> {
        let server = start(vec![success()]);
        let endpoint = format!("http://{}", server.addr());

        let client = ReqwestClient::new(ClientConfig::default(), &endpoint);
        let builder = client.builder(reqwest::Method::GET, "/retry".into());
        let options = test_options();

        let response = client
            .execute::<serde_json::Value, serde_json::Value>(builder, Some(json!({})), options)
            .await?;
        assert_eq!(response.into_body(), json!({"status": "done"}));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn no_retry_immediate_failure() -> Result<()> {
        // Without a retry policy the error propagates unwrapped after one
        // attempt.
        let server = start(vec![permanent()]);
        let endpoint = format!("http://{}", server.addr());

        let client = ReqwestClient::new(ClientConfig::default(), &endpoint);
        let builder = client.builder(reqwest::Method::GET, "/retry".into());
        let options = test_options();

        let response = client
            .execute::<serde_json::Value, serde_json::Value>(builder, Some(json!({})), options)
            .await;
        let err = response.unwrap_err();
        assert_eq!(err.http_status_code(), Some(400));
        assert_eq!(
            err.service_error().map(|b| b.code.as_str()),
            Some("InvalidParameter")
        );
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn retry_success() -> Result<()> {
        // The server returns two transient errors and then succeeds.
        let server = start(vec![transient(), transient(), success()]);
        let endpoint = format!("http://{}", server.addr());

        let client = ReqwestClient::new(ClientConfig::default(), &endpoint);
        let builder = client.builder(reqwest::Method::GET, "/retry".into());
        let mut options = test_options();
        options.set_retry_policy(TransientErrors.with_attempt_limit(5));
        options.set_idempotency(true);

        let response = client
            .execute::<serde_json::Value, serde_json::Value>(builder, Some(json!({})), options)
            .await?;
        assert_eq!(response.into_body(), json!({"status": "done"}));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn retry_too_many_transients() -> Result<()> {
        let server = start(vec![transient(), transient(), transient()]);
        let endpoint = format!("http://{}", server.addr());

        let client = ReqwestClient::new(ClientConfig::default(), &endpoint);
        let builder = client.builder(reqwest::Method::GET, "/retry".into());
        let mut options = test_options();
        options.set_retry_policy(TransientErrors.with_attempt_limit(3));
        options.set_idempotency(true);

        let response = client
            .execute::<serde_json::Value, serde_json::Value>(builder, Some(json!({})), options)
            .await;
        let err = response.unwrap_err();
        // The policy stops the loop with the last error seen.
        assert_eq!(err.http_status_code(), Some(503));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn retry_transient_then_permanent() -> Result<()> {
        let server = start(vec![transient(), permanent()]);
        let endpoint = format!("http://{}", server.addr());

        let client = ReqwestClient::new(ClientConfig::default(), &endpoint);
        let builder = client.builder(reqwest::Method::GET, "/retry".into());
        let mut options = test_options();
        options.set_retry_policy(TransientErrors.with_attempt_limit(5));
        options.set_idempotency(true);

        let response = client
            .execute::<serde_json::Value, serde_json::Value>(builder, Some(json!({})), options)
            .await;
        let err = response.unwrap_err();
        assert_eq!(err.http_status_code(), Some(400));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn non_idempotent_requests_are_not_retried() -> Result<()> {
        let server = start(vec![transient()]);
        let endpoint = format!("http://{}", server.addr());

        let client = ReqwestClient::new(ClientConfig::default(), &endpoint);
        let builder = client.builder(reqwest::Method::GET, "/retry".into());
        let mut options = test_options();
        options.set_retry_policy(TransientErrors.with_attempt_limit(5));
        options.set_idempotency(false);

        let response = client
            .execute::<serde_json::Value, serde_json::Value>(builder, Some(json!({})), options)
            .await;
        let err = response.unwrap_err();
        assert_eq!(err.http_status_code(), Some(503));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn client_default_retry_policy_applies() -> Result<()> {
        let server = start(vec![transient(), success()]);
        let endpoint = format!("http://{}", server.addr());

        let config =
            ClientConfig::default().set_retry_policy(TransientErrors.with_attempt_limit(5));
        let client = ReqwestClient::new(config, &endpoint);
        let builder = client.builder(reqwest::Method::GET, "/retry".into());
        let mut options = test_options();
        options.set_idempotency(true);

        let response = client
            .execute::<serde_json::Value, serde_json::Value>(builder, Some(json!({})), options)
            .await?;
        assert_eq!(response.into_body(), json!({"status": "done"}));
        Ok(())
    }

    fn success() -> (StatusCode, String) {
        let response = json!({
            "status": "done"
        });
        (StatusCode::OK, response.to_string())
    }

    fn transient() -> (StatusCode, String) {
        let body = json!({
            "code": "InternalServerError",
            "message": "try-again",
        });
        (StatusCode::SERVICE_UNAVAILABLE, body.to_string())
    }

    fn permanent() -> (StatusCode, String) {
        let body = json!({
            "code": "InvalidParameter",
            "message": "uh-oh",
        });
        (StatusCode::BAD_REQUEST, body.to_string())
    }

    fn test_options() -> RequestOptions {
        let mut options = RequestOptions::default();
        options.set_backoff_policy(test_backoff());
        options
    }

    fn test_backoff() -> impl BackoffPolicy {
        ExponentialBackoffBuilder::new()
            .with_initial_delay(Duration::from_millis(1))
            .with_maximum_delay(Duration::from_millis(1))
            .clamp()
    }

    fn start(responses: Vec<(StatusCode, String)>) -> Server {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/retry"))
                .times(responses.len())
                .respond_with(cycle(
                    responses
                        .into_iter()
                        .map(|(status, body)| to_responder(status, body))
                        .collect(),
                )),
        );
        server
    }

    fn to_responder(status: StatusCode, response: String) -> Box<dyn Responder> {
        Box::new(
            status_code(status.as_u16())
                .insert_header("Content-Type", "application/json")
                .body(response),
        )
    }
}
