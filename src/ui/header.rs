use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const TITLE: &str = "Horizon";

/// Render the one-line header: title on the left, theme toggle on the right.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let title = Paragraph::new(Line::from(Span::styled(
        format!(" {}", TITLE),
        app.style("header_title"),
    )));
    f.render_widget(title, area);

    let toggle = app.theme_variant.toggle_icon();
    let hint = Paragraph::new(Line::from(Span::styled(
        format!("{} ", toggle.glyph()),
        app.style("header_icon"),
    )))
    .alignment(Alignment::Right);
    f.render_widget(hint, area);
}
