//! Immutable snapshots of the form, taken when a handler starts.

use std::path::{Path, PathBuf};

use crate::api::{ConfigPayload, UploadPayload};

use super::page::{Page, Pagination};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRequest {
    pub url: String,
    pub key: String,
    pub prompt: String,
    pub model: String,
}

impl ConfigRequest {
    pub fn from_page(page: &Page) -> Self {
        Self {
            url: page.form.api_url.trim().to_string(),
            key: page.form.api_key.trim().to_string(),
            prompt: page.form.prompt.trim().to_string(),
            model: page.models.selected_value().to_string(),
        }
    }

    pub fn payload(&self) -> ConfigPayload {
        ConfigPayload {
            url: self.url.clone(),
            key: self.key.clone(),
            prompt: self.prompt.clone(),
            model: (!self.model.is_empty()).then(|| self.model.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialsRequest {
    pub url: String,
    pub key: String,
}

impl CredentialsRequest {
    pub fn from_page(page: &Page) -> Self {
        Self {
            url: page.form.api_url.trim().to_string(),
            key: page.form.api_key.trim().to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.url.is_empty() && !self.key.is_empty()
    }
}

/// Upload input. Credentials travel with every upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub path: PathBuf,
    pub api_url: String,
    pub api_key: String,
    pub prompt: String,
}

impl UploadRequest {
    /// `None` when no file has been chosen.
    pub fn from_page(page: &Page) -> Option<Self> {
        let path = page.form.file_path.trim();
        if path.is_empty() {
            return None;
        }
        Some(Self {
            path: PathBuf::from(path),
            api_url: page.form.api_url.trim().to_string(),
            api_key: page.form.api_key.trim().to_string(),
            prompt: page.form.prompt.trim().to_string(),
        })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn into_payload(self, bytes: Vec<u8>) -> UploadPayload {
        UploadPayload {
            file_name: self.file_name(),
            bytes,
            api_url: self.api_url,
            api_key: self.api_key,
            prompt: self.prompt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRequest {
    pub page: u32,
    pub limit: u32,
    pub offset: u64,
}

impl HistoryRequest {
    pub fn from_pagination(pager: &Pagination) -> Self {
        Self {
            page: pager.current_page,
            limit: pager.page_size,
            offset: pager.offset(),
        }
    }
}

/// Where a downloaded file lands. Only the final path component of the server's name is used.
pub fn download_target(dir: &Path, filename: &str) -> PathBuf {
    let name = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "download".to_string());
    dir.join(name)
}
