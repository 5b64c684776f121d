//! Files store: the cached file list and the calls that change it.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use filehost_api_client::{ApiClient, ClientError, FileItem, FilePart};

use crate::notify::Notifier;

pub const DELETE_SUCCESS_MESSAGE: &str = "File deleted successfully";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Failed to download file. Please try again.";

pub struct FilesStore {
    api: ApiClient,
    notifier: Notifier,
    files: RefCell<Vec<FileItem>>,
    loading: Cell<bool>,
}

impl FilesStore {
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        Self { api, notifier, files: RefCell::new(Vec::new()), loading: Cell::new(false) }
    }

    pub fn files(&self) -> Vec<FileItem> {
        self.files.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Refresh the list. On failure the previous list is kept.
    pub async fn fetch_files(&self) {
        self.loading.set(true);
        match self.api.list_files().await {
            Ok(response) => {
                log::debug!("Fetched {} files", response.files.len());
                *self.files.borrow_mut() = response.files;
            }
            Err(e) => log::error!("Failed to fetch files: {}", e),
        }
        self.loading.set(false);
    }

    pub async fn upload_file(&self, part: FilePart) -> Result<(), ClientError> {
        let name = part.file_name.clone();
        self.api.upload_file(part).await?;
        self.notifier.success(format!("File \"{}\" uploaded successfully!", name));
        self.fetch_files().await;
        Ok(())
    }

    pub async fn delete_file(&self, file_id: &str) -> Result<(), ClientError> {
        self.api.delete_file(file_id).await?;
        self.notifier.success(DELETE_SUCCESS_MESSAGE);
        self.fetch_files().await;
        Ok(())
    }

    /// Save a file's bytes to `dest`. Failures are reported to the user and
    /// logged; the return value says whether the file was written.
    pub async fn download_file(&self, file_id: &str, file_name: &str, dest: &Path) -> bool {
        let bytes = match self.api.download_file(file_id).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Download failed: {}", e);
                self.notifier.error(DOWNLOAD_FAILED_MESSAGE);
                return false;
            }
        };

        let dest: PathBuf = dest.to_path_buf();
        let target = dest.clone();
        if let Err(e) = smol::unblock(move || std::fs::write(&target, bytes)).await {
            log::error!("Download failed: cannot write {}: {}", dest.display(), e);
            self.notifier.error(DOWNLOAD_FAILED_MESSAGE);
            return false;
        }

        self.notifier.success(format!("File \"{}\" downloaded successfully!", file_name));
        true
    }
}
