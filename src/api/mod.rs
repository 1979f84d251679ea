use crate::models::RepoStatus;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub ws_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let mut api_url = "http://localhost:4000".to_string();
        let mut ws_url = "ws://localhost:4000/session".to_string();

        // Deployment injects `window.ENV = { API_URL, WS_URL }`; missing keys
        // keep the localhost defaults.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    if let Ok(v) = js_sys::Reflect::get(&env, &"API_URL".into()) {
                        if let Some(s) = v.as_string() {
                            api_url = s;
                        }
                    }

                    if let Ok(v) = js_sys::Reflect::get(&env, &"WS_URL".into()) {
                        if let Some(s) = v.as_string() {
                            ws_url = s;
                        }
                    }
                }
            }
        }

        Self { api_url, ws_url }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Path (plus query) for the repository status endpoint.
///
/// The `project_path` query parameter is appended only for a non-empty path;
/// an empty or absent attribute means "whatever the server considers the
/// default project".
pub(crate) fn git_info_path(project_path: Option<&str>) -> String {
    match project_path {
        Some(p) if !p.is_empty() => {
            format!("/api/git/info?project_path={}", urlencoding::encode(p))
        }
        _ => "/api/git/info".to_string(),
    }
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url)
    }

    /// Single GET against the git-info endpoint. No retry, no timeout; the
    /// caller decides what a failure means (the panel logs and stays closed).
    pub async fn get_repo_status(&self, project_path: Option<&str>) -> ApiResult<RepoStatus> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, git_info_path(project_path));

        let res = client.get(url).send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Git info request failed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_info_path_without_project() {
        assert_eq!(git_info_path(None), "/api/git/info");
    }

    #[test]
    fn test_git_info_path_empty_project_is_omitted() {
        assert_eq!(git_info_path(Some("")), "/api/git/info");
    }

    #[test]
    fn test_git_info_path_encodes_project() {
        assert_eq!(
            git_info_path(Some("/repo/a")),
            "/api/git/info?project_path=%2Frepo%2Fa"
        );
    }

    #[test]
    fn test_git_info_path_encodes_spaces() {
        assert_eq!(
            git_info_path(Some("/my repo")),
            "/api/git/info?project_path=%2Fmy%20repo"
        );
    }

    #[test]
    fn test_api_client_new() {
        let client = ApiClient::new("http://localhost:4000".to_string());
        assert_eq!(client.base_url, "http://localhost:4000");
    }
}
