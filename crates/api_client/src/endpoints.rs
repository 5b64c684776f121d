//! Typed endpoint calls. Each is a thin wrapper over [`ApiClient::send`];
//! state changes and user feedback belong to the caller.

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::pipeline::{FilePart, RequestOptions};
use crate::types::{
    FilesResponse, ListShareLinksResponse, LoginRequest, LoginResponse, MeResponse, ShareLink,
    ShareLinkRequest, ShareLinkUpdate, SharedFileValidation,
};

/// `/{collection}/{id}{rest}` with `id` encoded as a single path segment.
/// Ids the URL parser would collapse (`""`, `.`, `..`) are refused.
fn resource(collection: &str, id: &str, rest: &str) -> Result<String, ClientError> {
    if matches!(id, "" | "." | "..") {
        return Err(ClientError::Unexpected(format!("Invalid id {:?}", id)));
    }
    Ok(format!("/{}/{}{}", collection, urlencoding::encode(id), rest))
}

impl ApiClient {
    /// POST /auth/login
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.post_json("/auth/login", request).await
    }

    /// GET /auth/me
    pub async fn me(&self) -> Result<MeResponse, ClientError> {
        self.get_json("/auth/me").await
    }

    /// GET /files
    pub async fn list_files(&self) -> Result<FilesResponse, ClientError> {
        self.get_json("/files").await
    }

    /// POST /files/upload (multipart, field `file`)
    pub async fn upload_file(&self, part: FilePart) -> Result<(), ClientError> {
        self.upload("/files/upload", part).await
    }

    /// GET /files/:id
    pub async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, ClientError> {
        self.get_bytes(&resource("files", file_id, "")?).await
    }

    /// DELETE /files/:id
    pub async fn delete_file(&self, file_id: &str) -> Result<(), ClientError> {
        self.delete(&resource("files", file_id, "")?).await
    }

    /// GET /files/:id/shareLinks
    pub async fn list_share_links(
        &self,
        file_id: &str,
    ) -> Result<ListShareLinksResponse, ClientError> {
        self.get_json(&resource("files", file_id, "/shareLinks")?).await
    }

    /// POST /sharing
    pub async fn create_share_link(
        &self,
        request: &ShareLinkRequest,
    ) -> Result<ShareLink, ClientError> {
        self.post_json("/sharing", request).await
    }

    /// PUT /sharing/:id
    pub async fn update_share_link(
        &self,
        link_id: &str,
        update: &ShareLinkUpdate,
    ) -> Result<ShareLink, ClientError> {
        self.put_json(&resource("sharing", link_id, "")?, update).await
    }

    /// DELETE /sharing/:id
    pub async fn delete_share_link(&self, link_id: &str) -> Result<(), ClientError> {
        self.delete(&resource("sharing", link_id, "")?).await
    }

    /// GET /sharing/:id/validate, with `password` only when non-empty
    pub async fn validate_share_link(
        &self,
        link_id: &str,
        password: Option<&str>,
    ) -> Result<SharedFileValidation, ClientError> {
        let mut options = RequestOptions::get();
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            options = options.query("password", password);
        }
        self.get_json_with(&resource("sharing", link_id, "/validate")?, options).await
    }
}
