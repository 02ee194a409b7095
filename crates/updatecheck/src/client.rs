use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use updatecheck_platform::HostPlatform;

use crate::application::Application;

pub const PRODUCTION_ENDPOINT: &str = "https://update.commonfate.io/check";
pub const DEVELOPMENT_ENDPOINT: &str = "https://update-dev.commonfate.io/check";

/// Placeholder used in the `User-Agent` when the host does not name itself.
pub const UNKNOWN_CALLER: &str = "unknown";

const LIBRARY_NAME: &str = "updatecheck-rs";
const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to encode update check request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to reach update checker API: {0}")]
    Network(#[source] reqwest::Error),
    #[error("got invalid response from update checker API: HTTP {status}{body_snippet}")]
    Protocol {
        status: StatusCode,
        body_snippet: String,
    },
    #[error("failed to parse update checker response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Identity of the running program, sent as the body of a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRequest {
    pub application: Application,
    pub version: String,
    pub arch: String,
    pub os: String,
}

impl CheckRequest {
    #[must_use]
    pub fn new(application: Application, version: impl Into<String>) -> Self {
        let platform = HostPlatform::current();
        Self {
            application,
            version: version.into(),
            arch: platform.arch,
            os: platform.os,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub update_required: bool,
    /// Shown to the user verbatim. May carry security notices.
    #[serde(default)]
    pub message: String,
}

#[must_use]
pub fn endpoint_for(production: bool) -> &'static str {
    if production {
        PRODUCTION_ENDPOINT
    } else {
        DEVELOPMENT_ENDPOINT
    }
}

#[must_use]
pub fn user_agent(caller: &str, os: &str) -> String {
    let caller = if caller.trim().is_empty() {
        UNKNOWN_CALLER
    } else {
        caller
    };
    format!("{LIBRARY_NAME}/{LIBRARY_VERSION} {caller} ({os})")
}

/// Ask the update checker API whether `request` describes an outdated build.
///
/// A single attempt is made; there is no retry.
///
/// # Errors
/// Returns an error when the request cannot be sent, the API answers with
/// anything other than HTTP 200, or the body is not a valid check response.
pub async fn check_for_update(
    client: &reqwest::Client,
    endpoint: &str,
    request: &CheckRequest,
    caller: &str,
) -> Result<CheckResponse, CheckError> {
    let body = serde_json::to_vec(request).map_err(CheckError::Encode)?;

    let response = client
        .post(endpoint)
        .header(CONTENT_TYPE, "application/json")
        .header(USER_AGENT, user_agent(caller, &request.os))
        .body(body)
        .send()
        .await
        .map_err(CheckError::Network)?;

    let status = response.status();
    if status != StatusCode::OK {
        let body_snippet = response
            .text()
            .await
            .ok()
            .map(|body| response_snippet(&body, 160))
            .unwrap_or_default();
        return Err(CheckError::Protocol {
            status,
            body_snippet,
        });
    }

    let bytes = response.bytes().await.map_err(CheckError::Network)?;
    serde_json::from_slice(&bytes).map_err(CheckError::Decode)
}

fn response_snippet(body: &str, max_chars: usize) -> String {
    let snippet: String = body.chars().take(max_chars).collect();
    if snippet.is_empty() {
        String::new()
    } else {
        format!(": {snippet}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_follows_production_flag() {
        assert_eq!(endpoint_for(true), PRODUCTION_ENDPOINT);
        assert_eq!(endpoint_for(false), DEVELOPMENT_ENDPOINT);
    }

    #[test]
    fn user_agent_names_library_caller_and_os() {
        assert_eq!(
            user_agent("granted", "linux"),
            format!("updatecheck-rs/{LIBRARY_VERSION} granted (linux)")
        );
    }

    #[test]
    fn user_agent_falls_back_to_unknown_caller() {
        assert_eq!(
            user_agent("  ", "darwin"),
            format!("updatecheck-rs/{LIBRARY_VERSION} unknown (darwin)")
        );
    }

    #[test]
    fn request_serializes_wire_field_names() {
        let request = CheckRequest {
            application: Application::new("granted"),
            version: "0.9.0".to_string(),
            arch: "amd64".to_string(),
            os: "linux".to_string(),
        };

        let value = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "application": "granted",
                "version": "0.9.0",
                "arch": "amd64",
                "os": "linux",
            })
        );
    }

    #[test]
    fn response_reads_camel_case_fields() {
        let response: CheckResponse =
            serde_json::from_str(r#"{"updateRequired":true,"message":"v2 available"}"#)
                .expect("response should parse");
        assert!(response.update_required);
        assert_eq!(response.message, "v2 available");
    }

    #[test]
    fn response_without_update_flag_is_rejected() {
        assert!(serde_json::from_str::<CheckResponse>(r#"{"message":"hi"}"#).is_err());
    }

    #[test]
    fn response_snippet_truncates_and_prefixes() {
        assert_eq!(response_snippet("", 10), "");
        assert_eq!(response_snippet("abcdef", 3), ": abc");
    }
}
