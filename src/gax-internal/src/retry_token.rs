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

//! Idempotency token generation.
//!
//! The services deduplicate mutating requests carrying the same
//! `opc-retry-token` header value. The executor attaches a token to every
//! mutating request, generating one when the application did not supply its
//! own, so transport-level retries of the same logical call do not apply the
//! mutation twice.

/// The header carrying the idempotency token.
pub const RETRY_TOKEN_HEADER: &str = "opc-retry-token";

/// Generates a new idempotency token.
pub fn generate() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn tokens_are_valid_header_values() {
        let token = generate();
        let value = http::HeaderValue::from_str(&token);
        assert!(value.is_ok(), "{value:?}");
    }
}
