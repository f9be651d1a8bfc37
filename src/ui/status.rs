use crate::app::{App, View};
use crate::keybindings::Action as KbAction;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar: the current status message, or key hints.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = match &app.status_message {
        Some((msg, _)) => Cow::Borrowed(msg.as_ref()),
        None => Cow::Owned(hints(app)),
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}

/// Key hints for the current view, built from the live bindings so config
/// overrides show up.
fn hints(app: &App) -> String {
    let actions: &[(KbAction, &str)] = match app.view() {
        View::List => &[
            (KbAction::Open, "open"),
            (KbAction::ToggleSave, "save"),
            (KbAction::NextCategory, "category"),
            (KbAction::ToggleTheme, "theme"),
            (KbAction::ShowHelp, "help"),
            (KbAction::Quit, "quit"),
        ],
        View::Detail => &[
            (KbAction::Back, "back"),
            (KbAction::ToggleSave, "save"),
            (KbAction::ToggleReaderMode, "reader"),
            (KbAction::OpenSource, "open source"),
            (KbAction::ShowHelp, "help"),
            (KbAction::Quit, "quit"),
        ],
    };

    let mut out = String::from(" ");
    for (action, label) in actions {
        if let Some(key) = app.keybindings.key_for(*action) {
            out.push_str(&format!("[{}] {}  ", key, label));
        }
    }
    out.truncate(out.trim_end().len());
    out
}
