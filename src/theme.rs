//! Light and dark palettes.
//!
//! `ThemeVariant` is the persisted choice; `ColorPalette` maps each semantic
//! role of the interface to a ratatui `Style`; `StyleMap` resolves role names
//! at render time.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

use crate::icon::Icon;

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Stored form, as written under the `theme` key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }

    /// Header toggle icon: the theme a press would switch to.
    pub fn toggle_icon(self) -> Icon {
        match self {
            Self::Dark => Icon::Sun,
            Self::Light => Icon::Moon,
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Header --
    pub header_title: Style,
    pub header_icon: Style,

    // -- Article cards --
    pub card_headline: Style,
    pub card_subheadline: Style,
    pub card_selected: Style,
    pub saved_marker: Style,

    // -- Detail view --
    pub detail_headline: Style,
    pub detail_subheadline: Style,
    pub detail_meta: Style,
    pub detail_section: Style,
    pub detail_body: Style,
    pub detail_heading: Style,
    pub detail_link: Style,
    pub detail_code: Style,
    pub detail_emphasis: Style,
    pub detail_strong: Style,

    // -- Navigation bar --
    pub nav_item: Style,
    pub nav_selected: Style,

    // -- Feedback --
    pub error: Style,
    pub empty: Style,
    pub spinner: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            header_icon: Style::default().fg(Color::Yellow),

            card_headline: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            card_subheadline: Style::default().fg(Color::Gray),
            card_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            saved_marker: Style::default().fg(Color::LightBlue),

            detail_headline: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            detail_subheadline: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            detail_meta: Style::default().fg(Color::DarkGray),
            detail_section: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            detail_body: Style::default(),
            detail_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            detail_link: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            detail_code: Style::default().fg(Color::Yellow),
            detail_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            detail_strong: Style::default().add_modifier(Modifier::BOLD),

            nav_item: Style::default().fg(Color::Gray),
            nav_selected: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),

            error: Style::default().fg(Color::LightRed),
            empty: Style::default().fg(Color::Gray),
            spinner: Style::default().fg(Color::LightBlue),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::LightBlue),
        }
    }

    fn light() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_icon: Style::default().fg(Color::DarkGray),

            card_headline: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_subheadline: Style::default().fg(Color::DarkGray),
            card_selected: Style::default().bg(Color::Blue).fg(Color::White),
            saved_marker: Style::default().fg(Color::Blue),

            detail_headline: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            detail_subheadline: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            detail_meta: Style::default().fg(Color::DarkGray),
            detail_section: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            detail_body: Style::default().fg(Color::Black),
            detail_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            detail_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            detail_code: Style::default().fg(Color::Magenta),
            detail_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            detail_strong: Style::default().add_modifier(Modifier::BOLD),

            nav_item: Style::default().fg(Color::DarkGray),
            nav_selected: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),

            error: Style::default().fg(Color::Red),
            empty: Style::default().fg(Color::DarkGray),
            spinner: Style::default().fg(Color::Blue),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::Gray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// Role-name lookup built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// Role names, in `ColorPalette` field order.
const ROLE_NAMES: [&str; 24] = [
    "header_title",
    "header_icon",
    "card_headline",
    "card_subheadline",
    "card_selected",
    "saved_marker",
    "detail_headline",
    "detail_subheadline",
    "detail_meta",
    "detail_section",
    "detail_body",
    "detail_heading",
    "detail_link",
    "detail_code",
    "detail_emphasis",
    "detail_strong",
    "nav_item",
    "nav_selected",
    "error",
    "empty",
    "spinner",
    "status_bar",
    "panel_border",
    "panel_border_focused",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 24] = [
            p.header_title,
            p.header_icon,
            p.card_headline,
            p.card_subheadline,
            p.card_selected,
            p.saved_marker,
            p.detail_headline,
            p.detail_subheadline,
            p.detail_meta,
            p.detail_section,
            p.detail_body,
            p.detail_heading,
            p.detail_link,
            p.detail_code,
            p.detail_emphasis,
            p.detail_strong,
            p.nav_item,
            p.nav_selected,
            p.error,
            p.empty,
            p.spinner,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
        ];

        let map = ROLE_NAMES.into_iter().zip(styles).collect();
        Self { map }
    }

    pub fn for_variant(variant: ThemeVariant) -> Self {
        Self::from_palette(&variant.palette())
    }

    /// Style for `role`; `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
