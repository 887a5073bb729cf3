use crate::config::EnvConfig;
use crate::models::{SearchResponse, UploadResponse};
use crate::search::SearchQuery;
use crate::upload::{UploadOutcome, UploadPayload};

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

impl std::error::Error for ApiError {}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
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

const CSRF_HEADER: &str = "X-CSRFToken";

/// Thin client over the two server endpoints the widgets talk to.
#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) search_url: String,
    pub(crate) upload_url: String,
    pub(crate) csrf_token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String, config: &EnvConfig) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            search_url: config.search_url.clone(),
            upload_url: config.upload_url.clone(),
            csrf_token: config.csrf_token.clone(),
        }
    }

    /// Build a client for the current page origin.
    pub fn from_config(config: &EnvConfig) -> Self {
        let origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        Self::new(origin, config)
    }

    /// Join a configured endpoint onto the page origin; absolute URLs pass through.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub(crate) fn search_endpoint(&self, query: &SearchQuery) -> String {
        let url = self.endpoint(&self.search_url);
        let sep = if url.contains('?') { '&' } else { '?' };
        format!("{url}{sep}{}", query.to_query_string())
    }

    pub async fn search_users(&self, query: &SearchQuery) -> ApiResult<SearchResponse> {
        let client = reqwest::Client::new();
        let res = client
            .get(self.search_endpoint(query))
            .header("Accept", "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "User search failed"))
        }
    }

    pub async fn upload_document(&self, payload: &UploadPayload) -> ApiResult<UploadOutcome> {
        let client = reqwest::Client::new();
        let form = reqwest::multipart::Form::new()
            .text("file_content", payload.file_content.clone())
            .text("title", payload.title.clone());

        let mut req = client.post(self.endpoint(&self.upload_url)).multipart(form);
        if let Some(token) = &self.csrf_token {
            req = req.header(CSRF_HEADER, token);
        }

        let res = req.send().await.map_err(ApiError::network)?;
        let status = res.status().as_u16();
        let body = res.text().await.map_err(ApiError::network)?;
        interpret_upload_response(status, &body)
    }
}

/// Classify an upload response: 2xx must carry `{redirect_url}`, anything else is an HTTP failure.
pub(crate) fn interpret_upload_response(status: u16, body: &str) -> ApiResult<UploadOutcome> {
    if (200..300).contains(&status) {
        let parsed: UploadResponse = serde_json::from_str(body).map_err(ApiError::parse)?;
        Ok(UploadOutcome::Redirect(parsed.redirect_url))
    } else {
        Ok(UploadOutcome::HttpFailure {
            status,
            body: body.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("https://docs.example.com/".to_string(), &EnvConfig::default())
    }

    #[test]
    fn test_api_client_new_trims_trailing_slash() {
        let c = client();
        assert_eq!(c.base_url, "https://docs.example.com");
        assert!(c.csrf_token.is_none());
    }

    #[test]
    fn test_endpoint_joins_relative_paths() {
        let c = client();
        assert_eq!(c.endpoint("/documents/upload/"), "https://docs.example.com/documents/upload/");
        assert_eq!(c.endpoint("documents/upload/"), "https://docs.example.com/documents/upload/");
        assert_eq!(c.endpoint("http://other/x"), "http://other/x");
    }

    #[test]
    fn test_search_endpoint_appends_query() {
        let mut c = client();
        let q = SearchQuery { q: "ann".to_string(), page: 2 };
        assert_eq!(
            c.search_endpoint(&q),
            "https://docs.example.com/documents/user-search/?q=ann&page=2"
        );

        c.search_url = "/search/?scope=doc".to_string();
        assert_eq!(
            c.search_endpoint(&q),
            "https://docs.example.com/search/?scope=doc&q=ann&page=2"
        );
    }

    #[test]
    fn test_interpret_upload_success() {
        let out = interpret_upload_response(200, r#"{"redirect_url": "/documents/42/"}"#)
            .expect("should be ok");
        assert_eq!(out, UploadOutcome::Redirect("/documents/42/".to_string()));
    }

    #[test]
    fn test_interpret_upload_http_failure_keeps_body() {
        let out = interpret_upload_response(500, "Internal Server Error").expect("should be ok");
        assert_eq!(
            out,
            UploadOutcome::HttpFailure {
                status: 500,
                body: "Internal Server Error".to_string()
            }
        );
    }

    #[test]
    fn test_interpret_upload_bad_json_is_parse_error() {
        let err = interpret_upload_response(200, "<html>ok</html>").expect_err("should fail");
        assert_eq!(err.kind, ApiErrorKind::Parse);

        let err = interpret_upload_response(201, r#"{"url": "/x"}"#).expect_err("should fail");
        assert_eq!(err.kind, ApiErrorKind::Parse);
    }
}
