//! Sharing store: share-link management. Failures go back to the caller
//! untouched; only successful mutations are announced.

use filehost_api_client::{
    ApiClient, ClientError, ListShareLinksResponse, ShareLink, ShareLinkRequest, ShareLinkUpdate,
    SharedFileValidation,
};

use crate::notify::Notifier;

pub const CREATED_MESSAGE: &str = "Share link created successfully!";
pub const UPDATED_MESSAGE: &str = "Share link updated successfully!";
pub const DELETED_MESSAGE: &str = "Share link deleted successfully!";

pub struct SharingStore {
    api: ApiClient,
    notifier: Notifier,
}

impl SharingStore {
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        Self { api, notifier }
    }

    pub async fn create_share_link(
        &self,
        request: &ShareLinkRequest,
    ) -> Result<ShareLink, ClientError> {
        let link = self.api.create_share_link(request).await?;
        self.notifier.success(CREATED_MESSAGE);
        Ok(link)
    }

    pub async fn update_share_link(
        &self,
        link_id: &str,
        update: &ShareLinkUpdate,
    ) -> Result<ShareLink, ClientError> {
        let link = self.api.update_share_link(link_id, update).await?;
        self.notifier.success(UPDATED_MESSAGE);
        Ok(link)
    }

    pub async fn delete_share_link(&self, link_id: &str) -> Result<(), ClientError> {
        self.api.delete_share_link(link_id).await?;
        self.notifier.success(DELETED_MESSAGE);
        Ok(())
    }

    /// Check a link, and its password if one is given.
    pub async fn validate_shared_file(
        &self,
        link_id: &str,
        password: Option<&str>,
    ) -> Result<SharedFileValidation, ClientError> {
        self.api.validate_share_link(link_id, password).await
    }

    pub async fn get_share_links(
        &self,
        file_id: &str,
    ) -> Result<ListShareLinksResponse, ClientError> {
        self.api.list_share_links(file_id).await
    }
}
