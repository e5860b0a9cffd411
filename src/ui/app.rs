//! Terminal application: key bindings and the draw loop
//!
//! Every action is handed to the controller as its own tokio task, so the screen keeps
//! redrawing (spinner, loading placeholders) while requests are in flight.

use std::future::Future;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::api::TranslatorApi;
use crate::controller::{Controller, Handlers, Page, PageDirection, Tab};
use crate::storage::PreferenceStore;
use crate::log_info;

use super::animations::Spinner;
use super::render::{render_ui, RenderData};
use super::theme::Theme;

/// Focusable controls, per tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FilePath,
    UploadButton,
    DownloadButton,
    ApiUrl,
    ApiKey,
    Prompt,
    Model,
    SaveButton,
    RefreshModelsButton,
    Feedback,
    FeedbackButton,
}

impl Field {
    pub fn for_tab(tab: Tab) -> &'static [Field] {
        match tab {
            Tab::Upload => &[Field::FilePath, Field::UploadButton, Field::DownloadButton],
            Tab::Config => &[
                Field::ApiUrl,
                Field::ApiKey,
                Field::Prompt,
                Field::Model,
                Field::SaveButton,
                Field::RefreshModelsButton,
            ],
            Tab::History => &[],
            Tab::Feedback => &[Field::Feedback, Field::FeedbackButton],
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Field::FilePath | Field::ApiUrl | Field::ApiKey | Field::Prompt | Field::Feedback
        )
    }

    pub fn is_button(&self) -> bool {
        matches!(
            self,
            Field::UploadButton
                | Field::DownloadButton
                | Field::SaveButton
                | Field::RefreshModelsButton
                | Field::FeedbackButton
        )
    }

    /// Current value of a text field.
    pub fn value<'a>(&self, page: &'a Page) -> &'a str {
        match self {
            Field::FilePath => &page.form.file_path,
            Field::ApiUrl => &page.form.api_url,
            Field::ApiKey => &page.form.api_key,
            Field::Prompt => &page.form.prompt,
            Field::Feedback => &page.form.feedback,
            _ => "",
        }
    }

    fn set_value(&self, page: &mut Page, value: String) {
        match self {
            Field::FilePath => page.form.file_path = value,
            Field::ApiUrl => page.form.api_url = value,
            Field::ApiKey => page.form.api_key = value,
            Field::Prompt => page.form.prompt = value,
            Field::Feedback => page.form.feedback = value,
            _ => {}
        }
    }
}

/// In-place edit of one text field. `cursor` counts chars, not bytes.
#[derive(Debug, Clone)]
pub struct EditBuffer {
    pub field: Field,
    pub text: String,
    pub cursor: usize,
}

impl EditBuffer {
    fn new(field: Field, text: &str) -> Self {
        Self {
            field,
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.text
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
    }

    fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn right(&mut self) {
        if self.cursor < self.text.chars().count() {
            self.cursor += 1;
        }
    }

    /// Text split around the cursor, for rendering.
    pub fn split(&self) -> (&str, &str) {
        self.text.split_at(self.byte_index(self.cursor))
    }
}

pub struct App<A, S> {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    controller: Arc<Controller<A, S>>,
    theme: Theme,
    spinner: Spinner,
    should_quit: bool,

    focus: usize,
    editing: Option<EditBuffer>,
    history_selected: usize,
}

impl<A, S> App<A, S>
where
    A: TranslatorApi + 'static,
    S: PreferenceStore + 'static,
{
    pub fn new(controller: Arc<Controller<A, S>>) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            controller,
            theme: Theme::default(),
            spinner: Spinner::dots(),
            should_quit: false,
            focus: 0,
            editing: None,
            history_selected: 0,
        })
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub async fn run(&mut self) -> io::Result<()> {
        log_info!("TUI started");

        // The initial tab gets the same side effects as switching to it.
        let initial = self.controller.snapshot().active_tab;
        self.dispatch(move |c| async move { c.on_switch_tab(initial).await });

        let tick_rate = Duration::from_millis(80);
        let mut last_tick = Instant::now();

        loop {
            self.draw()?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.spinner.tick();
                last_tick = Instant::now();
            }

            if self.should_quit {
                break;
            }
        }

        self.cleanup()?;
        log_info!("TUI stopped");
        Ok(())
    }

    /// Run a handler on its own task.
    fn dispatch<F, Fut>(&self, action: F)
    where
        F: FnOnce(Arc<Controller<A, S>>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(action(Arc::clone(&self.controller)));
    }

    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show)?;
        Ok(())
    }

    fn draw(&mut self) -> io::Result<()> {
        let page = self.controller.snapshot();
        let history_rows = page.history.rows().len();
        if history_rows > 0 && self.history_selected >= history_rows {
            self.history_selected = history_rows - 1;
        }

        let data = RenderData {
            theme: self.theme.clone(),
            fields: Field::for_tab(page.active_tab),
            focus: self.focus,
            editing: self.editing.clone(),
            history_selected: self.history_selected,
            spinner_frame: self.spinner.frame(),
            page,
        };

        self.terminal.draw(|frame| render_ui(frame, &data))?;
        Ok(())
    }

    fn focused_field(&self, tab: Tab) -> Option<Field> {
        Field::for_tab(tab).get(self.focus).copied()
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.editing.is_some() {
            self.handle_edit_keys(key);
        } else {
            self.handle_browse_keys(key);
        }
    }

    fn handle_edit_keys(&mut self, key: KeyEvent) {
        let Some(buffer) = self.editing.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Enter => {
                if let Some(buffer) = self.editing.take() {
                    self.controller
                        .update_page(|page| buffer.field.set_value(page, buffer.text));
                }
            }
            KeyCode::Esc => self.editing = None,
            KeyCode::Backspace => buffer.backspace(),
            KeyCode::Delete => buffer.delete(),
            KeyCode::Left => buffer.left(),
            KeyCode::Right => buffer.right(),
            KeyCode::Home => buffer.cursor = 0,
            KeyCode::End => buffer.cursor = buffer.text.chars().count(),
            KeyCode::Char(c) => buffer.insert(c),
            _ => {}
        }
    }

    fn handle_browse_keys(&mut self, key: KeyEvent) {
        let tab = self.controller.snapshot().active_tab;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.switch_tab(tab.next()),
            KeyCode::BackTab => self.switch_tab(tab.prev()),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.switch_tab(Tab::ALL[index]);
            }
            KeyCode::Up => self.move_focus(tab, false),
            KeyCode::Down => self.move_focus(tab, true),
            KeyCode::Left | KeyCode::Right
                if self.focused_field(tab) == Some(Field::Model) =>
            {
                let forward = key.code == KeyCode::Right;
                self.controller.update_page(|page| {
                    if forward {
                        page.models.select_next();
                    } else {
                        page.models.select_prev();
                    }
                });
            }
            KeyCode::Left => self.switch_tab(tab.prev()),
            KeyCode::Right => self.switch_tab(tab.next()),
            KeyCode::Enter => self.activate(tab),
            KeyCode::Char('s') => self.dispatch(|c| async move { c.on_submit_config().await }),
            KeyCode::Char('m') => self.dispatch(|c| async move { c.on_refresh_models().await }),
            KeyCode::Char('u') => self.dispatch(|c| async move { c.on_upload_file().await }),
            KeyCode::Char('d') => self.dispatch(|c| async move { c.on_download().await }),
            KeyCode::Char('r') => self.dispatch(|c| async move { c.on_refresh_history().await }),
            KeyCode::Char('[') | KeyCode::PageUp => {
                self.history_selected = 0;
                self.dispatch(|c| async move { c.on_paginate(PageDirection::Prev).await });
            }
            KeyCode::Char(']') | KeyCode::PageDown => {
                self.history_selected = 0;
                self.dispatch(|c| async move { c.on_paginate(PageDirection::Next).await });
            }
            _ => {}
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.focus = 0;
        self.history_selected = 0;
        // Mark the tab active right away so the next key sees it.
        self.controller.update_page(|page| page.active_tab = tab);
        self.dispatch(move |c| async move { c.on_switch_tab(tab).await });
    }

    fn move_focus(&mut self, tab: Tab, down: bool) {
        if tab == Tab::History {
            self.history_selected = if down {
                self.history_selected.saturating_add(1)
            } else {
                self.history_selected.saturating_sub(1)
            };
            return;
        }

        let count = Field::for_tab(tab).len();
        if count == 0 {
            return;
        }
        self.focus = if down {
            (self.focus + 1).min(count - 1)
        } else {
            self.focus.saturating_sub(1)
        };
    }

    fn activate(&mut self, tab: Tab) {
        let Some(field) = self.focused_field(tab) else {
            return;
        };

        if field.is_text() {
            let page = self.controller.snapshot();
            self.editing = Some(EditBuffer::new(field, field.value(&page)));
            return;
        }

        match field {
            Field::UploadButton => self.dispatch(|c| async move { c.on_upload_file().await }),
            Field::DownloadButton => self.dispatch(|c| async move { c.on_download().await }),
            Field::SaveButton => self.dispatch(|c| async move { c.on_submit_config().await }),
            Field::RefreshModelsButton => {
                self.dispatch(|c| async move { c.on_refresh_models().await })
            }
            Field::FeedbackButton => {
                self.dispatch(|c| async move { c.on_submit_feedback().await })
            }
            _ => {}
        }
    }
}

impl<A, S> Drop for App<A, S> {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show);
    }
}
