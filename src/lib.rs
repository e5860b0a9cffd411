//! xlate - terminal client for the document translation service
//!
//! The service translates the first column of uploaded Excel files through a
//! configurable LLM endpoint. This crate is the client side: it keeps the user's API
//! settings, lists the models the service can reach, uploads files, fetches results and
//! pages through the translation history.
//!
//! # Modules
//!
//! - [`controller`] - client state controller; every user action lands here
//! - [`api`] - backend capability trait and its reqwest implementation
//! - [`storage`] - preference persistence
//! - [`config`] - application configuration
//! - [`i18n`] - English and Chinese UI strings
//! - [`ui`] - ratatui front-end
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use xlate::{api::HttpApi, controller::{Controller, PageDirection}, storage::MemoryStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let api = HttpApi::new("http://127.0.0.1:5000", Duration::from_secs(30))?;
//! let controller = Controller::new(api, MemoryStore::new(), 10);
//!
//! controller.load_history().await;
//! controller.paginate(PageDirection::Next).await;
//! for row in controller.snapshot().history.rows() {
//!     println!("{} {} {}", row.id, row.file_name, row.status_label);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod controller;
pub mod i18n;
pub mod logging;
pub mod storage;
pub mod ui;

pub use controller::{Controller, Handlers};
pub use i18n::{current_locale, init_locale, t, Locale, Text};
pub use ui::App;
