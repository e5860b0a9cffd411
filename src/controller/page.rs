//! Page model: everything the front-end draws, owned by the controller.

use chrono::{DateTime, Local, NaiveDateTime};

use crate::api::HistoryRecord;
use crate::i18n::{t, Text};

/// Characters of original/translated text shown in a history cell.
pub const TRUNCATE_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Upload,
    Config,
    History,
    Feedback,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Upload, Tab::Config, Tab::History, Tab::Feedback];

    pub fn id(&self) -> &'static str {
        match self {
            Tab::Upload => "upload",
            Tab::Config => "config",
            Tab::History => "history",
            Tab::Feedback => "feedback",
        }
    }

    /// Identifier of the panel this tab shows, `{tab}-tab`.
    pub fn panel_id(&self) -> String {
        format!("{}-tab", self.id())
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.id() == id)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Upload => t(Text::TabUpload),
            Tab::Config => t(Text::TabConfig),
            Tab::History => t(Text::TabHistory),
            Tab::Feedback => t(Text::TabFeedback),
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

impl StatusKind {
    pub fn class(&self) -> &'static str {
        match self {
            StatusKind::Info => "info",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    /// Server path, `/download/{filename}`
    pub href: String,
    pub filename: String,
    pub label: String,
}

impl DownloadLink {
    pub fn for_file(filename: &str) -> Self {
        Self {
            href: format!("/download/{}", filename),
            filename: filename.to_string(),
            label: t(Text::DownloadLabel).to_string(),
        }
    }
}

/// The shared status line. A new status replaces all of this, link included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
    pub link: Option<DownloadLink>,
}

impl Status {
    /// Base class plus kind, e.g. `status-section error`.
    pub fn class(&self) -> String {
        format!("status-section {}", self.kind.class())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOption {
    pub value: String,
    pub label: String,
}

impl ModelOption {
    pub fn from_id(id: &str) -> Self {
        Self {
            value: id.to_string(),
            label: model_label(id),
        }
    }
}

/// Display label of a model id: the part after the last `:`.
pub fn model_label(id: &str) -> String {
    match id.rsplit(':').next() {
        Some(tail) if !tail.is_empty() => tail.to_string(),
        _ => id.to_string(),
    }
}

/// Model selector. The first option is the empty default and is never removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelector {
    options: Vec<ModelOption>,
    selected: usize,
}

impl ModelSelector {
    pub fn new(default_label: &str) -> Self {
        Self {
            options: vec![ModelOption {
                value: String::new(),
                label: default_label.to_string(),
            }],
            selected: 0,
        }
    }

    pub fn options(&self) -> &[ModelOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_value(&self) -> &str {
        self.options
            .get(self.selected)
            .map(|o| o.value.as_str())
            .unwrap_or("")
    }

    /// Select the option carrying `value`. Returns false when there is none.
    pub fn select_value(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(i) => {
                self.selected = i;
                true
            }
            None => false,
        }
    }

    pub fn push(&mut self, option: ModelOption) {
        self.options.push(option);
    }

    pub fn push_selected(&mut self, option: ModelOption) {
        self.options.push(option);
        self.selected = self.options.len() - 1;
    }

    /// Drop everything but the default option.
    pub fn reset(&mut self) {
        self.options.truncate(1);
        self.selected = 0;
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.options.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

/// Working copy of the form inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub api_url: String,
    pub api_key: String,
    pub prompt: String,
    pub file_path: String,
    pub feedback: String,
}

/// Text cell shown shortened, with the full text available as a tooltip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncatedText {
    pub display: String,
    pub tooltip: String,
}

impl TruncatedText {
    pub fn new(text: &str) -> Self {
        let display = if text.chars().count() > TRUNCATE_CHARS {
            let head: String = text.chars().take(TRUNCATE_CHARS).collect();
            format!("{}…", head)
        } else {
            text.to_string()
        };
        Self {
            display,
            tooltip: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: String,
    pub file_name: String,
    pub original: TruncatedText,
    pub translated: TruncatedText,
    pub time: String,
    pub model: String,
    pub success: bool,
    pub status_label: String,
    pub status_kind: StatusKind,
}

impl From<&HistoryRecord> for HistoryRow {
    fn from(record: &HistoryRecord) -> Self {
        let model = match record.model.as_deref() {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => "-".to_string(),
        };
        let (status_label, status_kind) = if record.success {
            (t(Text::RecordSucceeded), StatusKind::Success)
        } else {
            (t(Text::RecordFailed), StatusKind::Error)
        };

        Self {
            id: record.id.to_string(),
            file_name: record.file_name.clone(),
            original: TruncatedText::new(&record.original_text),
            translated: TruncatedText::new(&record.translated_text),
            time: format_timestamp(&record.translation_time),
            model,
            success: record.success,
            status_label: status_label.to_string(),
            status_kind,
        }
    }
}

/// Render a service timestamp in local time; unparseable input is shown as-is.
pub fn format_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%Y/%m/%d %H:%M:%S";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(DISPLAY).to_string();
    }

    // Zone-less timestamps are already local.
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return naive.format(DISPLAY).to_string();
        }
    }

    raw.to_string()
}

/// Table body. Anything but `Rows` renders as one placeholder row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryBody {
    Idle,
    Loading,
    Empty,
    Failed(String),
    Rows(Vec<HistoryRow>),
}

impl HistoryBody {
    pub fn rows(&self) -> &[HistoryRow] {
        match self {
            HistoryBody::Rows(rows) => rows,
            _ => &[],
        }
    }

    /// Message of a failed load.
    pub fn error(&self) -> Option<&str> {
        match self {
            HistoryBody::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn placeholder(&self) -> Option<String> {
        match self {
            HistoryBody::Idle | HistoryBody::Rows(_) => None,
            HistoryBody::Loading => Some(t(Text::HistoryLoading).to_string()),
            HistoryBody::Empty => Some(t(Text::HistoryEmpty).to_string()),
            HistoryBody::Failed(message) => Some(message.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Prev,
    Next,
}

/// History paging counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.current_page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// `ceil(total / page_size)`; zero records means zero pages.
    pub fn set_total(&mut self, total: u64) {
        let pages = total.div_ceil(u64::from(self.page_size));
        self.total_pages = u32::try_from(pages).unwrap_or(u32::MAX);
    }

    pub fn prev_disabled(&self) -> bool {
        self.current_page <= 1
    }

    pub fn next_disabled(&self) -> bool {
        self.current_page >= self.total_pages
    }

    /// Move one page unless already at that bound.
    pub fn step(&mut self, direction: PageDirection) -> bool {
        match direction {
            PageDirection::Prev if self.current_page > 1 => {
                self.current_page -= 1;
                true
            }
            PageDirection::Next if self.current_page < self.total_pages => {
                self.current_page += 1;
                true
            }
            _ => false,
        }
    }
}

/// Pager widgets as last rendered. Only a successful fetch updates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerView {
    pub current_label: u32,
    pub total_label: u32,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

impl PagerView {
    pub fn from_pagination(pager: &Pagination) -> Self {
        Self {
            current_label: pager.current_page,
            total_label: pager.total_pages,
            prev_disabled: pager.prev_disabled(),
            next_disabled: pager.next_disabled(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingFlag {
    Models,
    History,
    Upload,
    Download,
}

/// Loading classes on the trigger controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Loading {
    pub models: bool,
    pub history: bool,
    pub upload: bool,
    pub download: bool,
}

impl Loading {
    pub fn set(&mut self, flag: LoadingFlag, on: bool) {
        match flag {
            LoadingFlag::Models => self.models = on,
            LoadingFlag::History => self.history = on,
            LoadingFlag::Upload => self.upload = on,
            LoadingFlag::Download => self.download = on,
        }
    }

    pub fn any(&self) -> bool {
        self.models || self.history || self.upload || self.download
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub active_tab: Tab,
    pub form: FormState,
    pub models: ModelSelector,
    pub status: Option<Status>,
    pub history: HistoryBody,
    pub pager: Pagination,
    pub pager_view: PagerView,
    pub loading: Loading,
}

impl Page {
    pub fn new(page_size: u32) -> Self {
        let pager = Pagination::new(page_size);
        Self {
            active_tab: Tab::Upload,
            form: FormState::default(),
            models: ModelSelector::new(t(Text::DefaultModelOption)),
            status: None,
            history: HistoryBody::Idle,
            pager,
            pager_view: PagerView::from_pagination(&pager),
            loading: Loading::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_label() {
        assert_eq!(model_label("openai:gpt-4o"), "gpt-4o");
        assert_eq!(model_label("a:b:qwen2.5"), "qwen2.5");
        assert_eq!(model_label("deepseek-chat"), "deepseek-chat");
        assert_eq!(model_label("broken:"), "broken:");
    }

    #[test]
    fn test_selector_keeps_default() {
        let mut selector = ModelSelector::new("--");
        selector.push(ModelOption::from_id("x:a"));
        selector.push_selected(ModelOption::from_id("x:b"));
        assert_eq!(selector.selected_value(), "x:b");

        selector.reset();
        assert_eq!(selector.len(), 1);
        assert_eq!(selector.selected_value(), "");
        assert!(!selector.select_value("x:a"));
    }

    #[test]
    fn test_pagination_bounds() {
        let mut pager = Pagination::new(10);
        pager.set_total(23);
        assert_eq!(pager.total_pages, 3);
        assert!(pager.prev_disabled());
        assert!(!pager.next_disabled());

        assert!(!pager.step(PageDirection::Prev));
        assert!(pager.step(PageDirection::Next));
        assert!(pager.step(PageDirection::Next));
        assert_eq!(pager.offset(), 20);
        assert!(!pager.step(PageDirection::Next));
        assert_eq!(pager.current_page, 3);
    }

    #[test]
    fn test_pagination_zero_total() {
        let mut pager = Pagination::new(10);
        pager.set_total(0);
        assert_eq!(pager.total_pages, 0);
        assert!(pager.next_disabled());
        assert!(!pager.step(PageDirection::Next));
    }

    #[test]
    fn test_truncated_text() {
        let short = TruncatedText::new("hello");
        assert_eq!(short.display, "hello");

        let long_text = "这是一段非常长的原文内容，用来检查截断是否按照字符而不是字节进行，否则会在中间切断";
        let long = TruncatedText::new(long_text);
        assert_eq!(long.display.chars().count(), TRUNCATE_CHARS + 1);
        assert!(long.display.ends_with('…'));
        assert_eq!(long.tooltip, long_text);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2024-03-01T10:20:30"), "2024/03/01 10:20:30");
        assert_eq!(format_timestamp("2024-03-01 10:20:30.123456"), "2024/03/01 10:20:30");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_history_body_error_only_for_failures() {
        assert_eq!(
            HistoryBody::Failed("Load failed: db".to_string()).error(),
            Some("Load failed: db")
        );
        assert_eq!(HistoryBody::Empty.error(), None);
        assert_eq!(HistoryBody::Loading.error(), None);
        assert_eq!(HistoryBody::Rows(Vec::new()).error(), None);
    }

    #[test]
    fn test_tab_ids() {
        assert_eq!(Tab::History.panel_id(), "history-tab");
        assert_eq!(Tab::from_id("feedback"), Some(Tab::Feedback));
        assert_eq!(Tab::Feedback.next(), Tab::Upload);
        assert_eq!(Tab::Upload.prev(), Tab::Feedback);
    }
}
