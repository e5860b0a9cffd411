//! Scripted backend shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use xlate::api::{
    ApiError, ConfigPayload, FeedbackSink, HistoryPage, HistoryRecord, ModelDescriptor,
    TranslatorApi, UploadPayload, UploadResponse,
};
use xlate::controller::Controller;
use xlate::storage::MemoryStore;

/// One scripted answer. Anything not scripted answers with a 500.
pub enum Reply<T> {
    Ok(T),
    Status(u16, Option<&'static str>),
    Transport(&'static str),
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T, ApiError> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Status(status, message) => Err(ApiError::Status {
                status,
                message: message.map(str::to_string),
            }),
            Reply::Transport(reason) => Err(ApiError::Transport(reason.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SaveConfig(ConfigPayload),
    ListModels,
    Upload(UploadPayload),
    History { limit: u32, offset: u64 },
    Download(String),
}

#[derive(Default)]
pub struct MockApi {
    calls: Mutex<Vec<Call>>,
    config: Mutex<VecDeque<Reply<()>>>,
    models: Mutex<VecDeque<Reply<Vec<ModelDescriptor>>>>,
    uploads: Mutex<VecDeque<Reply<UploadResponse>>>,
    history: Mutex<VecDeque<Reply<HistoryPage>>>,
    downloads: Mutex<VecDeque<Reply<Vec<u8>>>>,
}

fn next<T>(queue: &Mutex<VecDeque<Reply<T>>>) -> Result<T, ApiError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or(Reply::Status(500, Some("unscripted call")))
        .into_result()
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_save_config(self, reply: Reply<()>) -> Self {
        self.config.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_list_models(self, reply: Reply<Vec<ModelDescriptor>>) -> Self {
        self.models.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_upload(self, reply: Reply<UploadResponse>) -> Self {
        self.uploads.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_history(self, reply: Reply<HistoryPage>) -> Self {
        self.history.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_download(self, reply: Reply<Vec<u8>>) -> Self {
        self.downloads.lock().unwrap().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn history_calls(&self) -> Vec<(u32, u64)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::History { limit, offset } => Some((limit, offset)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TranslatorApi for MockApi {
    async fn save_config(&self, payload: &ConfigPayload) -> Result<(), ApiError> {
        self.record(Call::SaveConfig(payload.clone()));
        next(&self.config)
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ApiError> {
        self.record(Call::ListModels);
        next(&self.models)
    }

    async fn upload(&self, payload: UploadPayload) -> Result<UploadResponse, ApiError> {
        self.record(Call::Upload(payload));
        next(&self.uploads)
    }

    async fn history(&self, limit: u32, offset: u64) -> Result<HistoryPage, ApiError> {
        self.record(Call::History { limit, offset });
        next(&self.history)
    }

    async fn download(&self, filename: &str) -> Result<Vec<u8>, ApiError> {
        self.record(Call::Download(filename.to_string()));
        next(&self.downloads)
    }
}

/// Feedback sink that always refuses.
pub struct RejectingFeedback;

impl FeedbackSink for RejectingFeedback {
    fn submit(&self, _text: &str) -> Result<(), ApiError> {
        Err(ApiError::Transport("feedback service offline".to_string()))
    }
}

pub fn models(ids: &[&str]) -> Vec<ModelDescriptor> {
    ids.iter()
        .map(|id| ModelDescriptor { id: id.to_string() })
        .collect()
}

pub fn record(id: i64, success: bool) -> HistoryRecord {
    HistoryRecord {
        id,
        file_name: format!("sheet-{}.xlsx", id),
        original_text: format!("original text number {}", id),
        translated_text: format!("译文 {}", id),
        translation_time: "2024-03-01T10:20:30".to_string(),
        model: Some("qwen2.5:7b".to_string()),
        success,
    }
}

pub fn history_page(total: u64, ids: std::ops::Range<i64>) -> HistoryPage {
    HistoryPage {
        total,
        history: ids.map(|id| record(id, id % 2 == 0)).collect(),
    }
}

pub fn controller(api: MockApi, store: MemoryStore) -> Controller<MockApi, MemoryStore> {
    Controller::new(api, store, 10)
}

pub fn store_with(entries: &[(&str, &str)]) -> MemoryStore {
    MemoryStore::with_entries(entries.iter().copied())
}
