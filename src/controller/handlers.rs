//! Event-handler capability bound to the front-end's input sources.

use async_trait::async_trait;

use crate::api::TranslatorApi;
use crate::storage::PreferenceStore;

use super::page::{PageDirection, Tab};
use super::Controller;

/// One method per user action. Front-ends bind keys or buttons to these once;
/// tests call them directly.
#[async_trait]
pub trait Handlers: Send + Sync {
    async fn on_switch_tab(&self, tab: Tab);

    async fn on_submit_config(&self);

    async fn on_refresh_models(&self);

    async fn on_upload_file(&self);

    async fn on_submit_feedback(&self);

    async fn on_paginate(&self, direction: PageDirection);

    async fn on_refresh_history(&self);

    async fn on_download(&self);
}

#[async_trait]
impl<A, S> Handlers for Controller<A, S>
where
    A: TranslatorApi,
    S: PreferenceStore,
{
    async fn on_switch_tab(&self, tab: Tab) {
        self.switch_tab(tab).await;
    }

    async fn on_submit_config(&self) {
        self.save_config().await;
    }

    async fn on_refresh_models(&self) {
        self.refresh_models().await;
    }

    async fn on_upload_file(&self) {
        self.upload().await;
    }

    async fn on_submit_feedback(&self) {
        self.submit_feedback();
    }

    async fn on_paginate(&self, direction: PageDirection) {
        self.paginate(direction).await;
    }

    async fn on_refresh_history(&self) {
        self.refresh_history().await;
    }

    async fn on_download(&self) {
        self.download_result().await;
    }
}
