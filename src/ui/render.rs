//! Static rendering of a page snapshot

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

use crate::controller::{HistoryBody, HistoryRow, Page, StatusKind, Tab};
use crate::i18n::{t, tf, Text};

use super::app::{EditBuffer, Field};
use super::theme::{Icons, Theme};

pub struct RenderData {
    pub theme: Theme,
    pub page: Page,
    pub fields: &'static [Field],
    pub focus: usize,
    pub editing: Option<EditBuffer>,
    pub history_selected: usize,
    pub spinner_frame: &'static str,
}

pub fn render_ui(frame: &mut Frame, data: &RenderData) {
    let area = frame.area();
    frame.render_widget(Block::default().style(data.theme.base_style()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(8),    // Panel
            Constraint::Length(4), // Status
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_tabs(frame, chunks[0], data);
    match data.page.active_tab {
        Tab::History => render_history(frame, chunks[1], data),
        _ => render_form(frame, chunks[1], data),
    }
    render_status(frame, chunks[2], data);
    render_footer(frame, chunks[3], data);
}

fn render_tabs(frame: &mut Frame, area: Rect, data: &RenderData) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!(" {} {} ", i + 1, tab.title())))
        .collect();
    let selected = Tab::ALL
        .iter()
        .position(|tab| *tab == data.page.active_tab)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(data.theme.muted_style())
        .highlight_style(data.theme.title_style().add_modifier(Modifier::REVERSED))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(data.theme.border_style(false))
                .title(Span::styled(t(Text::AppTitle), data.theme.title_style())),
        );
    frame.render_widget(tabs, area);
}

fn field_label(field: Field) -> &'static str {
    match field {
        Field::FilePath => t(Text::FieldFile),
        Field::UploadButton => t(Text::ButtonUpload),
        Field::DownloadButton => t(Text::DownloadLabel),
        Field::ApiUrl => t(Text::FieldApiUrl),
        Field::ApiKey => t(Text::FieldApiKey),
        Field::Prompt => t(Text::FieldPrompt),
        Field::Model => t(Text::FieldModel),
        Field::SaveButton => t(Text::ButtonSave),
        Field::RefreshModelsButton => t(Text::ButtonRefreshModels),
        Field::FeedbackButton => t(Text::ButtonFeedback),
        Field::Feedback => t(Text::FieldFeedback),
    }
}

/// Keys are shown masked unless being edited.
fn display_value(field: Field, page: &Page) -> String {
    match field {
        Field::ApiKey => "•".repeat(page.form.api_key.chars().count().min(24)),
        Field::Model => {
            let selector = &page.models;
            let label = selector
                .options()
                .get(selector.selected_index())
                .map(|o| o.label.as_str())
                .unwrap_or("");
            format!(
                "{} {} {}  ({}/{})",
                Icons::CHEVRON_LEFT,
                label,
                Icons::CHEVRON_RIGHT,
                selector.selected_index() + 1,
                selector.len()
            )
        }
        other => other.value(page).to_string(),
    }
}

fn button_busy(field: Field, page: &Page) -> bool {
    match field {
        Field::UploadButton => page.loading.upload,
        Field::DownloadButton => page.loading.download,
        Field::RefreshModelsButton => page.loading.models,
        _ => false,
    }
}

fn render_form(frame: &mut Frame, area: Rect, data: &RenderData) {
    let theme = &data.theme;
    let page = &data.page;

    let items: Vec<ListItem> = data
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let selected = i == data.focus;
            let prefix = if selected {
                format!("{} ", Icons::POINTER)
            } else {
                "  ".to_string()
            };

            if field.is_button() {
                let busy = button_busy(*field, page);
                let label = if busy {
                    format!("{}{} {}", prefix, data.spinner_frame, field_label(*field))
                } else {
                    format!("{}{}", prefix, field_label(*field))
                };
                let style = if *field == Field::DownloadButton
                    && page.status.as_ref().and_then(|s| s.link.as_ref()).is_none()
                {
                    theme.disabled_style()
                } else if selected {
                    theme.selection_style().fg(theme.primary)
                } else {
                    Style::default().fg(theme.primary)
                };
                return ListItem::new(Line::from(Span::styled(label, style)));
            }

            let label_style = if selected {
                theme.title_style()
            } else {
                theme.muted_style()
            };

            let value_spans = match &data.editing {
                Some(buffer) if buffer.field == *field => {
                    let (before, after) = buffer.split();
                    vec![
                        Span::styled(before.to_string(), Style::default().fg(theme.accent)),
                        Span::styled("▋", Style::default().fg(theme.accent)),
                        Span::styled(after.to_string(), Style::default().fg(theme.accent)),
                    ]
                }
                _ => vec![Span::styled(
                    display_value(*field, page),
                    Style::default().fg(theme.foreground),
                )],
            };

            let mut spans = vec![Span::styled(
                format!("{}{}: ", prefix, field_label(*field)),
                label_style,
            )];
            spans.extend(value_spans);
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(true))
            .title(format!(" {} ", page.active_tab.title())),
    );
    frame.render_widget(list, area);
}

fn history_row<'a>(row: &'a HistoryRow, theme: &Theme) -> Row<'a> {
    Row::new(vec![
        Cell::from(row.id.as_str()),
        Cell::from(row.file_name.as_str()),
        Cell::from(row.original.display.as_str()),
        Cell::from(row.translated.display.as_str()),
        Cell::from(row.time.as_str()),
        Cell::from(row.model.as_str()),
        Cell::from(row.status_label.as_str()).style(theme.status_style(row.status_kind)),
    ])
}

fn render_history(frame: &mut Frame, area: Rect, data: &RenderData) {
    let theme = &data.theme;
    let page = &data.page;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Pager
            Constraint::Length(5), // Detail
        ])
        .split(area);

    let header = Row::new(vec![
        t(Text::ColId),
        t(Text::ColFileName),
        t(Text::ColOriginal),
        t(Text::ColTranslated),
        t(Text::ColTime),
        t(Text::ColModel),
        t(Text::ColStatus),
    ])
    .style(theme.header_style());

    let rows: Vec<Row> = match page.history.placeholder() {
        Some(text) => {
            let style = if matches!(page.history, HistoryBody::Failed(_)) {
                theme.status_style(StatusKind::Error)
            } else {
                theme.muted_style()
            };
            vec![Row::new(vec![Cell::from(""), Cell::from(text).style(style)])]
        }
        None => page
            .history
            .rows()
            .iter()
            .map(|row| history_row(row, theme))
            .collect(),
    };

    let title = if page.loading.history {
        format!(" {} {} ", data.spinner_frame, page.active_tab.title())
    } else {
        format!(" {} ", page.active_tab.title())
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Percentage(15),
            Constraint::Percentage(22),
            Constraint::Percentage(22),
            Constraint::Length(19),
            Constraint::Percentage(10),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .row_highlight_style(theme.selection_style())
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(true))
            .title(title),
    );

    let mut state = TableState::default();
    if !page.history.rows().is_empty() {
        state.select(Some(data.history_selected));
    }
    frame.render_stateful_widget(table, chunks[0], &mut state);

    let view = page.pager_view;
    let nav = |enabled_text: &'static str, disabled: bool| {
        if disabled {
            Span::styled(enabled_text, theme.disabled_style())
        } else {
            Span::styled(enabled_text, Style::default().fg(theme.primary))
        }
    };
    let pager = Line::from(vec![
        nav("‹ [ ", view.prev_disabled),
        Span::raw(format!(
            " {} / {} ",
            tf(Text::PageIndicator, view.current_label),
            view.total_label
        )),
        nav(" ] ›", view.next_disabled),
    ]);
    frame.render_widget(Paragraph::new(pager).alignment(Alignment::Center), chunks[1]);

    let detail = page
        .history
        .rows()
        .get(data.history_selected)
        .map(|row| {
            vec![
                Line::from(vec![
                    Span::styled(format!("{}: ", t(Text::ColOriginal)), theme.muted_style()),
                    Span::raw(row.original.tooltip.clone()),
                ]),
                Line::from(vec![
                    Span::styled(format!("{}: ", t(Text::ColTranslated)), theme.muted_style()),
                    Span::raw(row.translated.tooltip.clone()),
                ]),
            ]
        })
        .unwrap_or_default();
    let detail = Paragraph::new(detail)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(false)),
        );
    frame.render_widget(detail, chunks[2]);
}

fn render_status(frame: &mut Frame, area: Rect, data: &RenderData) {
    let theme = &data.theme;
    let mut lines = Vec::new();

    if let Some(status) = &data.page.status {
        lines.push(Line::from(Span::styled(
            format!("{} {}", Icons::for_status(status.kind), status.text),
            theme.status_style(status.kind),
        )));
        if let Some(link) = &status.link {
            let busy = if data.page.loading.download {
                format!("{} ", data.spinner_frame)
            } else {
                String::new()
            };
            lines.push(Line::from(vec![
                Span::raw(format!("{}{} ", busy, Icons::DOWNLOAD)),
                Span::styled(link.label.clone(), theme.link_style()),
                Span::styled(format!("  {}  (d)", link.href), theme.muted_style()),
            ]));
        }
    }

    let status = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(false)),
    );
    frame.render_widget(status, area);
}

fn render_footer(frame: &mut Frame, area: Rect, data: &RenderData) {
    let help = if data.editing.is_some() {
        t(Text::HelpEditing)
    } else {
        t(Text::HelpBrowse)
    };
    frame.render_widget(
        Paragraph::new(help)
            .style(data.theme.muted_style())
            .alignment(Alignment::Center),
        area,
    );
}
