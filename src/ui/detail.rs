use crate::app::App;
use crate::icon::Icon;
use crate::news::Article;
use crate::theme::StyleMap;
use crate::util::display_width;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the article detail view.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let Some(article) = app.selected_article.as_ref() else {
        return;
    };

    let saved = app.is_saved(&article.id);
    let lines = if app.reader_mode {
        reader_lines(article, &app.theme)
    } else {
        detail_lines(article, saved, &app.theme)
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    app.detail_visible_lines = area.height.saturating_sub(2) as usize;
    app.detail_content_lines = wrapped_line_count(&lines, inner_width);
    // Clamp before drawing so a resize never renders past the end.
    app.clamp_detail_scroll();

    let title = if app.reader_mode {
        format!(" {} Reader ", Icon::Reader.glyph())
    } else {
        format!(" {} {} ", Icon::Back.glyph(), app.current_category().name)
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(title),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset as u16, 0));

    f.render_widget(paragraph, area);
}

/// Full detail layout: headline, image, save state, source, snapshot, body.
pub fn detail_lines(article: &Article, saved: bool, theme: &StyleMap) -> Vec<Line<'static>> {
    let bookmark = Icon::bookmark(saved);
    let save_label = if saved { "Saved" } else { "Not saved" };
    let marker_style = if saved {
        theme.resolve("saved_marker")
    } else {
        theme.resolve("detail_meta")
    };

    let mut lines = vec![
        Line::from(Span::styled(
            article.headline.clone(),
            theme.resolve("detail_headline"),
        )),
        Line::from(Span::styled(
            article.subheadline.clone(),
            theme.resolve("detail_subheadline"),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Image: {}", article.image_url),
            theme.resolve("detail_meta"),
        )),
        Line::from(vec![
            Span::styled(format!("{} {}", bookmark.glyph(), save_label), marker_style),
            Span::styled("  ·  ", theme.resolve("detail_meta")),
            Span::styled(
                format!("{} {}", Icon::Share.glyph(), article.source_title),
                theme.resolve("detail_link"),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled("Snapshot", theme.resolve("detail_section"))),
    ];

    lines.extend(article.summary_points.iter().map(|point| {
        Line::from(Span::styled(
            format!("  • {}", point),
            theme.resolve("detail_body"),
        ))
    }));
    lines.push(Line::from(""));
    lines.extend(render_markdown(&article.content, theme));
    lines
}

/// Reader mode: the body and a pointer to the original.
pub fn reader_lines(article: &Article, theme: &StyleMap) -> Vec<Line<'static>> {
    let mut lines = render_markdown(&article.content, theme);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Read original from {}", article.source_title),
        theme.resolve("detail_link"),
    )));
    lines
}

/// Rows the lines occupy once wrapped at `width` columns.
fn wrapped_line_count(lines: &[Line<'_>], width: usize) -> usize {
    if width == 0 {
        return lines.len();
    }
    lines
        .iter()
        .map(|line| {
            let w: usize = line.spans.iter().map(|s| display_width(&s.content)).sum();
            w.div_ceil(width).max(1)
        })
        .sum()
}

/// Convert markdown to styled lines using the theme's detail roles.
pub fn render_markdown(md: &str, theme: &StyleMap) -> Vec<Line<'static>> {
    let parser = Parser::new(md);
    let mut lines: Vec<Line<'static>> = Vec::with_capacity(md.lines().count());
    let mut current_spans: Vec<Span<'static>> = Vec::with_capacity(4);
    let mut in_code_block = false;
    let mut in_heading = false;
    let mut in_emphasis = false;
    let mut in_strong = false;
    let mut link_dest: Option<String> = None;

    let flush = |spans: &mut Vec<Span<'static>>, lines: &mut Vec<Line<'static>>| {
        if !spans.is_empty() {
            lines.push(Line::from(std::mem::take(spans)));
        }
    };

    for event in parser {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut current_spans, &mut lines);
                lines.push(Line::from(""));
                in_heading = false;
            }
            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                flush(&mut current_spans, &mut lines);
                lines.push(Line::from(""));
            }
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => {
                flush(&mut current_spans, &mut lines);
                in_code_block = false;
                lines.push(Line::from(""));
            }
            Event::Start(Tag::Item) => {
                flush(&mut current_spans, &mut lines);
                current_spans.push(Span::styled("  • ", theme.resolve("detail_body")));
            }
            Event::End(TagEnd::Item) => flush(&mut current_spans, &mut lines),
            Event::End(TagEnd::List(_)) => lines.push(Line::from("")),
            Event::Start(Tag::Emphasis) => in_emphasis = true,
            Event::End(TagEnd::Emphasis) => in_emphasis = false,
            Event::Start(Tag::Strong) => in_strong = true,
            Event::End(TagEnd::Strong) => in_strong = false,
            Event::Start(Tag::Link { dest_url, .. }) => {
                link_dest = Some(dest_url.into_string());
            }
            Event::End(TagEnd::Link) => {
                if let Some(dest) = link_dest.take() {
                    current_spans.push(Span::styled(
                        format!(" <{}>", dest),
                        theme.resolve("detail_link"),
                    ));
                }
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                current_spans.push(Span::styled(
                    format!("[Image: {}]", dest_url),
                    theme.resolve("detail_meta"),
                ));
            }
            Event::Text(text) => {
                if in_code_block {
                    for code_line in text.lines() {
                        current_spans.push(Span::styled(
                            format!("    {}", code_line),
                            theme.resolve("detail_code"),
                        ));
                        flush(&mut current_spans, &mut lines);
                    }
                    continue;
                }
                let style = if in_heading {
                    theme.resolve("detail_heading")
                } else if link_dest.is_some() {
                    theme.resolve("detail_link")
                } else if in_strong {
                    theme.resolve("detail_strong")
                } else if in_emphasis {
                    theme.resolve("detail_emphasis")
                } else {
                    theme.resolve("detail_body")
                };
                current_spans.push(Span::styled(text.into_string(), style));
            }
            Event::Code(code) => {
                current_spans.push(Span::styled(
                    format!("`{}`", code),
                    theme.resolve("detail_code"),
                ));
            }
            Event::SoftBreak => current_spans.push(Span::raw(" ")),
            Event::HardBreak => flush(&mut current_spans, &mut lines),
            _ => {}
        }
    }

    flush(&mut current_spans, &mut lines);

    // Drop the trailing blank left by the last block.
    while lines
        .last()
        .is_some_and(|l| l.spans.iter().all(|s| s.content.is_empty()))
    {
        lines.pop();
    }
    lines
}
