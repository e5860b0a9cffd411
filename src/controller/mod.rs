//! Client state controller
//!
//! Owns the [`Page`] model and turns user actions into backend calls:
//!
//! - start-up hydration of the form from the preference store
//! - tab switching (entering History fetches the current page)
//! - saving the API configuration
//! - refreshing the model list
//! - uploading a file for translation and downloading the result
//! - feedback submission
//! - history paging
//!
//! Every handler catches its own failures and reports them through the status line;
//! none of them return errors. Page state is behind a mutex that is never held across
//! an `.await`, so handlers can run concurrently and the last one to finish wins.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use xlate::api::HttpApi;
//! use xlate::controller::Controller;
//! use xlate::storage::FileStore;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let api = HttpApi::new("http://127.0.0.1:5000", Duration::from_secs(60))?;
//! let store = FileStore::open(FileStore::default_path())?;
//! let controller = Controller::new(api, store, 10);
//! controller.hydrate();
//! controller.refresh_models().await;
//! println!("{:?}", controller.snapshot().status);
//! # Ok(())
//! # }
//! ```

pub mod handlers;
pub mod page;
pub mod request;

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::api::{ApiError, FeedbackSink, TranslatorApi, UnwiredFeedback};
use crate::i18n::{t, tf, Text};
use crate::storage::{
    PreferenceRecord, PreferenceStore, KEY_API_KEY, KEY_API_URL, KEY_MODEL, KEY_PROMPT,
};
use crate::{log_error, log_warn};

pub use handlers::Handlers;
pub use page::{
    DownloadLink, HistoryBody, HistoryRow, LoadingFlag, ModelOption, Page, PageDirection, Status,
    StatusKind, Tab,
};
pub use request::{ConfigRequest, CredentialsRequest, HistoryRequest, UploadRequest};

pub struct Controller<A, S> {
    api: A,
    store: S,
    feedback: Box<dyn FeedbackSink>,
    download_dir: PathBuf,
    page: Mutex<Page>,
}

/// Clears a loading flag when dropped, whatever way the handler exits.
struct LoadingGuard<'a> {
    page: &'a Mutex<Page>,
    flag: LoadingFlag,
}

impl<'a> LoadingGuard<'a> {
    fn new(page: &'a Mutex<Page>, flag: LoadingFlag) -> Self {
        lock(page).loading.set(flag, true);
        Self { page, flag }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        lock(self.page).loading.set(self.flag, false);
    }
}

fn lock(page: &Mutex<Page>) -> MutexGuard<'_, Page> {
    page.lock().unwrap_or_else(|e| e.into_inner())
}

/// Message for an HTTP error: the server's text or `fallback`; other errors as-is.
fn describe(error: &ApiError, fallback: Text) -> String {
    match error {
        ApiError::Status { message, .. } => message
            .clone()
            .unwrap_or_else(|| t(fallback).to_string()),
        other => other.to_string(),
    }
}

impl<A, S> Controller<A, S>
where
    A: TranslatorApi,
    S: PreferenceStore,
{
    pub fn new(api: A, store: S, page_size: u32) -> Self {
        Self {
            api,
            store,
            feedback: Box::new(UnwiredFeedback),
            download_dir: PathBuf::from("."),
            page: Mutex::new(Page::new(page_size)),
        }
    }

    pub fn with_feedback_sink(mut self, sink: impl FeedbackSink + 'static) -> Self {
        self.feedback = Box::new(sink);
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn with_initial_tab(self, tab: Tab) -> Self {
        self.page().active_tab = tab;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn page(&self) -> MutexGuard<'_, Page> {
        lock(&self.page)
    }

    /// Copy of the page for rendering.
    pub fn snapshot(&self) -> Page {
        self.page().clone()
    }

    /// Edit the page in place (typing into fields, moving the model selection).
    pub fn update_page<R>(&self, f: impl FnOnce(&mut Page) -> R) -> R {
        f(&mut self.page())
    }

    /// Replace the status line. Any download link goes with the old status.
    pub fn show_status(&self, text: impl Into<String>, kind: StatusKind) {
        self.set_status(Status {
            text: text.into(),
            kind,
            link: None,
        });
    }

    fn set_status(&self, status: Status) {
        self.page().status = Some(status);
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            log_warn!("Could not persist preference {}: {}", key, e);
            tracing::warn!("Could not persist preference {}: {}", key, e);
        }
    }

    /// Fill the form from stored preferences. Empty or missing entries are skipped.
    pub fn hydrate(&self) {
        let prefs = PreferenceRecord::load(&self.store);
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());

        let mut page = self.page();
        if let Some(url) = present(prefs.api_url) {
            page.form.api_url = url;
        }
        if let Some(key) = present(prefs.api_key) {
            page.form.api_key = key;
        }
        if let Some(prompt) = present(prefs.prompt) {
            page.form.prompt = prompt;
        }
        if let Some(model) = present(prefs.model) {
            if !page.models.select_value(&model) {
                page.models.push_selected(ModelOption {
                    value: model.clone(),
                    label: model,
                });
            }
        }
    }

    pub async fn switch_tab(&self, tab: Tab) {
        self.page().active_tab = tab;
        tracing::debug!(panel = %tab.panel_id(), "tab activated");
        if tab == Tab::History {
            self.load_history().await;
        }
    }

    pub async fn save_config(&self) {
        let request = ConfigRequest::from_page(&self.page());

        self.persist(KEY_API_URL, &request.url);
        self.persist(KEY_API_KEY, &request.key);
        self.persist(KEY_PROMPT, &request.prompt);
        self.persist(KEY_MODEL, &request.model);

        match self.api.save_config(&request.payload()).await {
            Ok(()) => self.show_status(t(Text::ConfigSaved), StatusKind::Success),
            Err(e @ ApiError::Status { .. }) => {
                self.show_status(describe(&e, Text::ConfigSaveFailed), StatusKind::Error)
            }
            Err(e) => {
                log_error!("Error while saving configuration: {}", e);
                self.show_status(
                    format!("{}{}", t(Text::ConfigSaveError), e),
                    StatusKind::Error,
                );
            }
        }
    }

    pub async fn refresh_models(&self) {
        let credentials = CredentialsRequest::from_page(&self.page());
        if !credentials.is_complete() {
            self.show_status(t(Text::CredentialsRequired), StatusKind::Error);
            return;
        }

        let _loading = LoadingGuard::new(&self.page, LoadingFlag::Models);
        self.show_status(t(Text::FetchingModels), StatusKind::Info);

        let models = match self.api.list_models().await {
            Ok(models) => models,
            Err(e) => {
                log_error!("Failed to fetch models: {}", e);
                self.show_status(
                    format!(
                        "{}{}",
                        t(Text::ModelsError),
                        describe(&e, Text::ModelsFetchFailed)
                    ),
                    StatusKind::Error,
                );
                return;
            }
        };

        let stored = match self.store.get(KEY_MODEL) {
            Ok(value) => value,
            Err(e) => {
                log_warn!("Could not read stored model: {}", e);
                None
            }
        };

        let selected = {
            let mut page = self.page();
            page.models.reset();
            for model in &models {
                page.models.push(ModelOption::from_id(&model.id));
            }
            if let Some(stored) = stored.as_deref() {
                page.models.select_value(stored);
            }
            page.models.selected_value().to_string()
        };

        if !selected.is_empty() {
            self.persist(KEY_MODEL, &selected);
        }

        tracing::info!(count = models.len(), "model list refreshed");
        self.show_status(tf(Text::ModelsLoaded, models.len()), StatusKind::Success);
    }

    pub async fn upload(&self) {
        let request = UploadRequest::from_page(&self.page());
        let Some(request) = request else {
            self.show_status(t(Text::NoFileSelected), StatusKind::Error);
            return;
        };

        let bytes = match tokio::fs::read(&request.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log_error!("Could not read {}: {}", request.path.display(), e);
                self.show_status(
                    format!("{}{} ({})", t(Text::FileReadFailed), request.path.display(), e),
                    StatusKind::Error,
                );
                return;
            }
        };

        let _loading = LoadingGuard::new(&self.page, LoadingFlag::Upload);
        self.show_status(t(Text::Uploading), StatusKind::Info);

        match self.api.upload(request.into_payload(bytes)).await {
            Ok(response) => {
                let text = response
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| t(Text::TranslationDone).to_string());
                self.set_status(Status {
                    text,
                    kind: StatusKind::Success,
                    link: Some(DownloadLink::for_file(&response.filename)),
                });
            }
            Err(e @ ApiError::Status { .. }) => {
                self.show_status(describe(&e, Text::UploadFailed), StatusKind::Error)
            }
            Err(e) => {
                log_error!("Error while uploading file: {}", e);
                self.show_status(format!("{}{}", t(Text::UploadError), e), StatusKind::Error);
            }
        }
    }

    /// Save the file behind the current status link into the download directory.
    pub async fn download_result(&self) {
        let link = self.page().status.as_ref().and_then(|s| s.link.clone());
        let Some(link) = link else {
            self.show_status(t(Text::NoDownload), StatusKind::Error);
            return;
        };

        let _loading = LoadingGuard::new(&self.page, LoadingFlag::Download);
        let target = request::download_target(&self.download_dir, &link.filename);

        let result = async {
            let bytes = self.api.download(&link.filename).await?;
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&target, bytes).await?;
            Ok::<_, ApiError>(())
        }
        .await;

        match result {
            Ok(()) => self.show_status(
                tf(Text::DownloadSaved, target.display()),
                StatusKind::Success,
            ),
            Err(e) => {
                log_error!("Download of {} failed: {}", link.href, e);
                self.show_status(
                    format!(
                        "{}{}",
                        t(Text::DownloadFailed),
                        describe(&e, Text::DownloadFetchFailed)
                    ),
                    StatusKind::Error,
                );
            }
        }
    }

    pub fn submit_feedback(&self) {
        let text = self.page().form.feedback.trim().to_string();
        if text.is_empty() {
            self.show_status(t(Text::FeedbackEmpty), StatusKind::Error);
            return;
        }

        match self.feedback.submit(&text) {
            Ok(()) => {
                self.show_status(t(Text::FeedbackThanks), StatusKind::Success);
                self.page().form.feedback.clear();
            }
            Err(e) => {
                log_error!("Failed to submit feedback: {}", e);
                self.show_status(format!("{}{}", t(Text::FeedbackError), e), StatusKind::Error);
            }
        }
    }

    /// Fetch the current history page and rebuild the table.
    ///
    /// A page past the end is pulled back to the last page and fetched once more.
    pub async fn load_history(&self) {
        let _loading = LoadingGuard::new(&self.page, LoadingFlag::History);
        for attempt in 0..2 {
            if self.fetch_history_page(attempt == 0).await {
                return;
            }
        }
    }

    /// One history round-trip. Returns false when the page had to be clamped and
    /// `may_retry` allows another fetch.
    async fn fetch_history_page(&self, may_retry: bool) -> bool {
        let request = {
            let mut page = self.page();
            page.history = HistoryBody::Loading;
            HistoryRequest::from_pagination(&page.pager)
        };

        match self.api.history(request.limit, request.offset).await {
            Ok(result) => {
                let mut page = self.page();
                page.pager.set_total(result.total);
                let last = page.pager.total_pages.max(1);
                if page.pager.current_page > last {
                    tracing::debug!(requested = request.page, last, "history page out of range");
                    page.pager.current_page = last;
                    if may_retry {
                        return false;
                    }
                }
                page.pager_view = page::PagerView::from_pagination(&page.pager);
                page.history = if result.history.is_empty() {
                    HistoryBody::Empty
                } else {
                    HistoryBody::Rows(result.history.iter().map(HistoryRow::from).collect())
                };
                tracing::debug!(
                    page = request.page,
                    total = result.total,
                    rows = page.history.rows().len(),
                    "history page loaded"
                );
            }
            Err(e) => {
                log_error!("Failed to load history page {}: {}", request.page, e);
                self.page().history = HistoryBody::Failed(format!(
                    "{}{}",
                    t(Text::HistoryLoadError),
                    describe(&e, Text::HistoryFetchFailed)
                ));
            }
        }
        true
    }

    /// Jump to `page` (1-based) and fetch it. Pages past the end land on the last one.
    pub async fn load_page(&self, page: u32) {
        self.page().pager.current_page = page.max(1);
        self.load_history().await;
    }

    pub async fn refresh_history(&self) {
        self.load_history().await;
    }

    /// Step one page and re-fetch. At a bound nothing changes and nothing is fetched.
    pub async fn paginate(&self, direction: PageDirection) -> bool {
        let moved = self.page().pager.step(direction);
        if moved {
            self.load_history().await;
        }
        moved
    }
}
