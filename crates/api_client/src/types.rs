//! Wire types for the file host API.
//!
//! Field names follow the server's camelCase JSON. Timestamps are ISO-8601
//! local date-times and are kept as strings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
}

/// Body of `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileItem {
    pub file_id: String,
    pub filename: String,
    pub size: u64,
    pub uploaded_at: String,
    #[serde(default)]
    pub shared_links_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilesResponse {
    #[serde(default)]
    pub files: Vec<FileItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinkRequest {
    pub file_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
}

/// Partial update for an existing share link; only set fields are sent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinkUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub share_link_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileShareLink {
    pub share_link_id: String,
    #[serde(default)]
    pub expiry: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListShareLinksResponse {
    pub file_id: String,
    #[serde(default)]
    pub links: Vec<FileShareLink>,
}

/// Result of checking a share link before downloading through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedFileValidation {
    pub link_id: String,
    pub file_id: String,
    pub filename: String,
    pub file_size: u64,
    pub has_password: bool,
    pub valid_password: bool,
    pub expiry: Option<String>,
    pub has_expired: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_ignores_extra_fields() {
        let parsed: LoginResponse =
            serde_json::from_str(r#"{"userId":7,"username":"alice","token":"T1"}"#).unwrap();
        assert_eq!(parsed, LoginResponse { token: "T1".into(), user_id: 7 });
    }

    #[test]
    fn test_share_link_request_omits_unset_fields() {
        let req = ShareLinkRequest { file_id: "f1".into(), password: None, expiry: None };
        assert_eq!(serde_json::to_value(&req).unwrap(), serde_json::json!({"fileId": "f1"}));

        let update = ShareLinkUpdate { expiry: Some("2026-01-01T00:00:00".into()), ..Default::default() };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"expiry": "2026-01-01T00:00:00"})
        );
    }

    #[test]
    fn test_shared_file_validation_null_expiry() {
        let json = r#"{
            "linkId": "l1", "fileId": "f1", "filename": "a.pdf", "fileSize": 2048,
            "hasPassword": true, "validPassword": false, "expiry": null, "hasExpired": false
        }"#;
        let parsed: SharedFileValidation = serde_json::from_str(json).unwrap();
        assert!(parsed.has_password);
        assert!(!parsed.valid_password);
        assert!(parsed.expiry.is_none());
    }

    #[test]
    fn test_file_item_wire_keys() {
        let item: FileItem = serde_json::from_str(
            r#"{"fileId":"f1","filename":"a.txt","size":12,"uploadedAt":"2025-06-15T14:30:00","sharedLinksCount":2}"#,
        )
        .unwrap();
        let json = serde_json::to_value(&item).unwrap();
        for key in ["fileId", "filename", "size", "uploadedAt", "sharedLinksCount"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}
