use serde::{Deserialize, Deserializer, Serialize};

/// A selectable user as returned by the user-search endpoint.
///
/// The backend renders `text` as `"username (email)"`; we treat it as opaque.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserOption {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Pagination {
    #[serde(default)]
    pub more: bool,
}

/// Raw body of `GET <search-url>?q=..&page=..`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<UserOption>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Success body of the upload endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UploadResponse {
    pub redirect_url: String,
}

// Django serializes primary keys as numbers; accept strings too.
fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let v = serde_json::Value::deserialize(d)?;
    match v {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_contract_deserialize() {
        let json = r#"{
            "results": [{"id": 7, "text": "alice (alice@example.com)"}, {"id": "8", "text": "bob"}],
            "pagination": {"more": true}
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).expect("search response should parse");
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].id, "7");
        assert_eq!(parsed.results[1].id, "8");
        assert!(parsed.pagination.more);
    }

    #[test]
    fn test_search_response_tolerates_missing_pagination() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"results": []}"#).expect("should parse");
        assert!(parsed.results.is_empty());
        assert!(!parsed.pagination.more);
    }

    #[test]
    fn test_user_option_rejects_object_id() {
        let res = serde_json::from_str::<UserOption>(r#"{"id": {"x": 1}, "text": "t"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_upload_response_contract_deserialize() {
        let parsed: UploadResponse =
            serde_json::from_str(r#"{"redirect_url": "/documents/42/"}"#).expect("should parse");
        assert_eq!(parsed.redirect_url, "/documents/42/");
    }
}
