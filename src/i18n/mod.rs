//! Internationalization module - English and Chinese support

use std::sync::{Mutex, OnceLock};

static CURRENT_LOCALE: OnceLock<Mutex<Locale>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    English,
    Chinese,
}

impl Locale {
    /// Detect locale from system environment
    pub fn detect() -> Self {
        Self::detect_with(|name| std::env::var(name).ok())
    }

    /// POSIX precedence: `LC_ALL`, then `LC_MESSAGES`, then `LANG`. Empty values are skipped.
    fn detect_with(var: impl Fn(&str) -> Option<String>) -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|name| var(*name))
            .find(|value| !value.is_empty())
            .and_then(|value| Self::from_code(&value))
            .unwrap_or(Locale::English)
    }

    /// Parse a language tag such as `zh`, `zh_CN.UTF-8` or `english`.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.to_lowercase();
        if code.starts_with("zh") || code == "chinese" || code == "中文" {
            Some(Locale::Chinese)
        } else if code.starts_with("en") {
            Some(Locale::English)
        } else {
            None
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Chinese => "zh",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::English => "English",
            Locale::Chinese => "中文",
        }
    }
}

/// Initialize the global locale from the environment
pub fn init_locale() -> Locale {
    init_locale_with(Locale::detect())
}

/// Initialize with specific locale
pub fn init_locale_with(locale: Locale) -> Locale {
    if CURRENT_LOCALE.set(Mutex::new(locale)).is_err() {
        set_locale(locale);
    }
    locale
}

pub fn current_locale() -> Locale {
    CURRENT_LOCALE
        .get()
        .and_then(|m| m.lock().ok())
        .map(|l| *l)
        .unwrap_or(Locale::English)
}

pub fn set_locale(locale: Locale) {
    if let Some(mutex) = CURRENT_LOCALE.get() {
        if let Ok(mut current) = mutex.lock() {
            *current = locale;
        }
    }
}

/// Translation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    AppTitle,

    // Tabs
    TabUpload,
    TabConfig,
    TabHistory,
    TabFeedback,

    // Form labels
    FieldApiUrl,
    FieldApiKey,
    FieldPrompt,
    FieldModel,
    FieldFile,
    FieldFeedback,
    DefaultModelOption,
    ButtonUpload,
    ButtonSave,
    ButtonRefreshModels,
    ButtonFeedback,

    // Configuration
    ConfigSaved,
    ConfigSaveFailed,
    ConfigSaveError,

    // Models
    CredentialsRequired,
    FetchingModels,
    ModelsLoaded,
    ModelsFetchFailed,
    ModelsError,

    // Upload
    NoFileSelected,
    FileReadFailed,
    Uploading,
    TranslationDone,
    UploadFailed,
    UploadError,
    DownloadLabel,

    // Download
    NoDownload,
    DownloadSaved,
    DownloadFailed,
    DownloadFetchFailed,

    // Feedback
    FeedbackEmpty,
    FeedbackThanks,
    FeedbackError,

    // History
    HistoryLoading,
    HistoryEmpty,
    HistoryFetchFailed,
    HistoryLoadError,
    RecordSucceeded,
    RecordFailed,
    ColId,
    ColFileName,
    ColOriginal,
    ColTranslated,
    ColTime,
    ColModel,
    ColStatus,
    PageIndicator,

    // Footer
    HelpBrowse,
    HelpEditing,
}

impl Text {
    pub fn get(&self) -> &'static str {
        match current_locale() {
            Locale::English => self.english(),
            Locale::Chinese => self.chinese(),
        }
    }

    fn english(&self) -> &'static str {
        match self {
            Text::AppTitle => "xlate · document translation",
            Text::TabUpload => "Upload",
            Text::TabConfig => "API Config",
            Text::TabHistory => "History",
            Text::TabFeedback => "Feedback",
            Text::FieldApiUrl => "API URL",
            Text::FieldApiKey => "API Key",
            Text::FieldPrompt => "Prompt",
            Text::FieldModel => "Model",
            Text::FieldFile => "Excel file",
            Text::FieldFeedback => "Feedback",
            Text::DefaultModelOption => "-- Select model --",
            Text::ButtonUpload => "⇪ Upload & translate",
            Text::ButtonSave => "💾 Save configuration",
            Text::ButtonRefreshModels => "⟳ Refresh models",
            Text::ButtonFeedback => "✉ Submit feedback",
            Text::ConfigSaved => "API configuration saved",
            Text::ConfigSaveFailed => "Failed to save configuration",
            Text::ConfigSaveError => "Error while saving configuration: ",
            Text::CredentialsRequired => "Please fill in the API URL and key first",
            Text::FetchingModels => "Fetching model list...",
            Text::ModelsLoaded => "Loaded {} models",
            Text::ModelsFetchFailed => "Failed to fetch model list",
            Text::ModelsError => "Failed to fetch models: ",
            Text::NoFileSelected => "Please choose a file",
            Text::FileReadFailed => "Could not read file: ",
            Text::Uploading => "Uploading and translating file...",
            Text::TranslationDone => "Translation finished!",
            Text::UploadFailed => "Upload failed",
            Text::UploadError => "An error occurred: ",
            Text::DownloadLabel => "Download translated file",
            Text::NoDownload => "There is no translated file to download",
            Text::DownloadSaved => "Saved to {}",
            Text::DownloadFailed => "Download failed: ",
            Text::DownloadFetchFailed => "Could not fetch the translated file",
            Text::FeedbackEmpty => "Please enter your feedback",
            Text::FeedbackThanks => "Thank you for your feedback!",
            Text::FeedbackError => "Failed to submit feedback: ",
            Text::HistoryLoading => "Loading...",
            Text::HistoryEmpty => "No records",
            Text::HistoryFetchFailed => "Failed to fetch history",
            Text::HistoryLoadError => "Load failed: ",
            Text::RecordSucceeded => "Success",
            Text::RecordFailed => "Failed",
            Text::ColId => "ID",
            Text::ColFileName => "File",
            Text::ColOriginal => "Original",
            Text::ColTranslated => "Translation",
            Text::ColTime => "Time",
            Text::ColModel => "Model",
            Text::ColStatus => "Status",
            Text::PageIndicator => "Page {}",
            Text::HelpBrowse => {
                "Tab/←→: switch tab | ↑↓: field | Enter: edit | s: save | m: models | u: upload | d: download | r: refresh | [ ]: page | q: quit"
            }
            Text::HelpEditing => "Enter: confirm | Esc: cancel",
        }
    }

    fn chinese(&self) -> &'static str {
        match self {
            Text::AppTitle => "xlate · 文档翻译",
            Text::TabUpload => "上传",
            Text::TabConfig => "API配置",
            Text::TabHistory => "翻译历史",
            Text::TabFeedback => "反馈",
            Text::FieldApiUrl => "API URL",
            Text::FieldApiKey => "API密钥",
            Text::FieldPrompt => "提示词",
            Text::FieldModel => "模型",
            Text::FieldFile => "Excel文件",
            Text::FieldFeedback => "反馈内容",
            Text::DefaultModelOption => "-- 选择模型 --",
            Text::ButtonUpload => "⇪ 上传并翻译",
            Text::ButtonSave => "💾 保存配置",
            Text::ButtonRefreshModels => "⟳ 刷新模型",
            Text::ButtonFeedback => "✉ 提交反馈",
            Text::ConfigSaved => "API配置已保存",
            Text::ConfigSaveFailed => "保存配置失败",
            Text::ConfigSaveError => "保存配置时出错：",
            Text::CredentialsRequired => "请先填写API URL和密钥",
            Text::FetchingModels => "正在获取模型列表...",
            Text::ModelsLoaded => "已加载 {} 个模型",
            Text::ModelsFetchFailed => "获取模型列表失败",
            Text::ModelsError => "获取模型失败：",
            Text::NoFileSelected => "请选择一个文件",
            Text::FileReadFailed => "无法读取文件：",
            Text::Uploading => "正在上传并翻译文件...",
            Text::TranslationDone => "翻译完成！",
            Text::UploadFailed => "上传失败",
            Text::UploadError => "发生错误：",
            Text::DownloadLabel => "下载翻译后的文件",
            Text::NoDownload => "没有可下载的翻译文件",
            Text::DownloadSaved => "已保存到 {}",
            Text::DownloadFailed => "下载失败：",
            Text::DownloadFetchFailed => "无法获取翻译后的文件",
            Text::FeedbackEmpty => "请输入反馈内容",
            Text::FeedbackThanks => "感谢您的反馈！",
            Text::FeedbackError => "提交反馈失败：",
            Text::HistoryLoading => "加载中...",
            Text::HistoryEmpty => "暂无记录",
            Text::HistoryFetchFailed => "获取历史记录失败",
            Text::HistoryLoadError => "加载失败: ",
            Text::RecordSucceeded => "成功",
            Text::RecordFailed => "失败",
            Text::ColId => "ID",
            Text::ColFileName => "文件名",
            Text::ColOriginal => "原文",
            Text::ColTranslated => "译文",
            Text::ColTime => "时间",
            Text::ColModel => "模型",
            Text::ColStatus => "状态",
            Text::PageIndicator => "第 {} 页",
            Text::HelpBrowse => {
                "Tab/←→: 切换标签 | ↑↓: 选择字段 | Enter: 编辑 | s: 保存 | m: 模型 | u: 上传 | d: 下载 | r: 刷新 | [ ]: 翻页 | q: 退出"
            }
            Text::HelpEditing => "Enter: 确认 | Esc: 取消",
        }
    }
}

/// Translate a key in the current locale
pub fn t(text: Text) -> &'static str {
    text.get()
}

/// Translate a key and substitute its `{}` placeholder.
pub fn tf(text: Text, arg: impl std::fmt::Display) -> String {
    text.get().replacen("{}", &arg.to_string(), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_code() {
        assert_eq!(Locale::from_code("zh_CN.UTF-8"), Some(Locale::Chinese));
        assert_eq!(Locale::from_code("en_US.UTF-8"), Some(Locale::English));
        assert_eq!(Locale::from_code("fr_FR"), None);
    }

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_detect_prefers_lc_all() {
        let vars = env(&[("LANG", "en_US.UTF-8"), ("LC_ALL", "zh_CN.UTF-8")]);
        assert_eq!(Locale::detect_with(vars), Locale::Chinese);

        let vars = env(&[("LANG", "zh_CN.UTF-8"), ("LC_MESSAGES", "en_GB.UTF-8")]);
        assert_eq!(Locale::detect_with(vars), Locale::English);

        let vars = env(&[("LC_ALL", ""), ("LANG", "zh_TW.UTF-8")]);
        assert_eq!(Locale::detect_with(vars), Locale::Chinese);

        assert_eq!(Locale::detect_with(|_| None), Locale::English);
    }

    #[test]
    fn test_translations_exist() {
        let keys = [
            Text::ConfigSaved,
            Text::ModelsLoaded,
            Text::HistoryEmpty,
            Text::FeedbackThanks,
            Text::DownloadLabel,
        ];
        for key in keys {
            assert!(!key.english().is_empty());
            assert!(!key.chinese().is_empty());
        }
    }

    #[test]
    fn test_placeholder_substitution() {
        assert_eq!(
            Text::ModelsLoaded.english().replacen("{}", "3", 1),
            "Loaded 3 models"
        );
        assert_eq!(Text::ModelsLoaded.chinese().replacen("{}", "3", 1), "已加载 3 个模型");
    }
}
