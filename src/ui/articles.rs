use crate::app::App;
use crate::icon::Icon;
use crate::keybindings::Action as KbAction;
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::helpers::SPINNER_FRAMES;

/// Shown for the saved category when nothing is saved.
const EMPTY_SAVED_TEXT: &str = "You have no saved articles.";

/// Render the article list: spinner, error, empty state, or cards.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let category = app.current_category();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"))
        .title(format!(" {} {} ", category.icon.glyph(), category.name));

    if app.is_loading() {
        let frame = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{} Loading News...", frame),
                app.style("spinner"),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    if let Some(error) = app.error() {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(error.to_string(), app.style("error"))),
        ];
        if let Some(key) = app.keybindings.key_for(KbAction::Retry) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Press {} to retry", key),
                app.style("empty"),
            )));
        }
        let msg = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(msg, area);
        return;
    }

    let articles = app.visible_articles();
    if articles.is_empty() {
        let text = if category.is_saved() {
            EMPTY_SAVED_TEXT
        } else {
            "No articles."
        };
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(text, app.style("empty"))),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    // Two columns reserved for the saved marker, two for the borders.
    let text_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = articles
        .iter()
        .map(|article| {
            let marker = if app.is_saved(&article.id) {
                Span::styled(
                    format!("{} ", Icon::Bookmark.glyph()),
                    app.style("saved_marker"),
                )
            } else {
                Span::raw("  ")
            };
            ListItem::new(vec![
                Line::from(vec![
                    marker,
                    Span::styled(
                        truncate_to_width(&article.headline, text_width).into_owned(),
                        app.style("card_headline"),
                    ),
                ]),
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        truncate_to_width(&article.subheadline, text_width).into_owned(),
                        app.style("card_subheadline"),
                    ),
                ]),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(app.style("card_selected"));
    let mut state = ListState::default().with_selected(Some(app.list_cursor));
    f.render_stateful_widget(list, area, &mut state);
}
