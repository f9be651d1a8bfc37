//! Bottom navigation bar: one entry per catalog category with its digit
//! shortcut and glyph. The current selection is highlighted.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let mut spans = Vec::with_capacity(app.categories.len() * 2);
    for (i, category) in app.categories.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if i == app.selected_category {
            app.style("nav_selected")
        } else {
            app.style("nav_item")
        };
        spans.push(Span::styled(
            format!(" {} {} {} ", i + 1, category.icon.glyph(), category.name),
            style,
        ));
    }

    let bar = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(app.style("panel_border")),
        );
    f.render_widget(bar, area);
}
