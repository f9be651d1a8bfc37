//! Icon set.
//!
//! Every icon the interface can show is a variant of [`Icon`]. Each variant
//! carries its 24x24 outline path (the same stroke paths the web build draws)
//! and a single-cell glyph used by the terminal renderer. Lookups are plain
//! `match` arms, so an unknown icon is a compile error rather than a blank.

/// Closed set of icon identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Home,
    Globe,
    Briefcase,
    Chip,
    Trophy,
    Bookmark,
    BookmarkOutline,
    Sun,
    Moon,
    Back,
    Share,
    Reader,
}

impl Icon {
    /// All icons, in declaration order.
    pub const ALL: [Icon; 12] = [
        Icon::Home,
        Icon::Globe,
        Icon::Briefcase,
        Icon::Chip,
        Icon::Trophy,
        Icon::Bookmark,
        Icon::BookmarkOutline,
        Icon::Sun,
        Icon::Moon,
        Icon::Back,
        Icon::Share,
        Icon::Reader,
    ];

    /// SVG path data on a `0 0 24 24` view box, stroked with width 2.
    pub const fn svg_path(self) -> &'static str {
        match self {
            Icon::Home => "M3 12l2-2m0 0l7-7 7 7M5 10v10a1 1 0 001 1h3m10-11l2 2m-2-2v10a1 1 0 01-1 1h-3m-6 0a1 1 0 001-1v-4a1 1 0 011-1h2a1 1 0 011 1v4a1 1 0 001 1m-6 0h6",
            Icon::Globe => "M21 12a9 9 0 01-9 9m9-9a9 9 0 00-9-9m9 9H3m9 9a9 9 0 01-9-9m9 9V3m0 18a9 9 0 009-9M3 12h18M12 3a9 9 0 00-9 9",
            Icon::Briefcase => "M21 13.255A23.931 23.931 0 0112 15c-3.183 0-6.22-.62-9-1.745M16 6V4a2 2 0 00-2-2h-4a2 2 0 00-2 2v2m4 6h.01M5 20h14a2 2 0 002-2V8a2 2 0 00-2-2H5a2 2 0 00-2 2v10a2 2 0 002 2z",
            Icon::Chip => "M9 3v2m6-2v2M9 19v2m6-2v2M5 9H3m2 6H3m18-6h-2m2 6h-2M12 6V3m0 18v-3m6-3H6m12 0a9 9 0 11-18 0 9 9 0 0118 0z",
            Icon::Trophy => "M9 11l3-3L15 11m-6 5h6m-3-4v4m2 4H7a2 2 0 01-2-2V5a2 2 0 012-2h5.586a1 1 0 01.707.293l5.414 5.414a1 1 0 01.293.707V19a2 2 0 01-2 2z",
            Icon::Bookmark | Icon::BookmarkOutline => {
                "M5 5a2 2 0 012-2h10a2 2 0 012 2v16l-7-3.5L5 21V5z"
            }
            Icon::Sun => "M12 3v1m0 16v1m9-9h-1M4 12H3m15.364 6.364l-.707-.707M6.343 6.343l-.707-.707m12.728 0l-.707.707M6.343 17.657l-.707.707M16 12a4 4 0 11-8 0 4 4 0 018 0z",
            Icon::Moon => "M20.354 15.354A9 9 0 018.646 3.646 9.003 9.003 0 0012 21a9.003 9.003 0 008.354-5.646z",
            Icon::Back => "M10 19l-7-7m0 0l7-7m-7 7h18",
            Icon::Share => "M8.684 13.342C8.886 12.938 9 12.482 9 12s-.114-.938-.316-1.342m0 2.684a3 3 0 110-2.684m0 2.684l6.632 3.316m-6.632-6.002l6.632-3.316m0 0a3 3 0 105.367-2.684 3 3 0 00-5.367 2.684zm0 9.368a3 3 0 105.367 2.684 3 3 0 00-5.367-2.684z",
            Icon::Reader => "M4 6h16M4 12h16M4 18h7",
        }
    }

    /// Whether the outline is drawn filled. Only the saved bookmark is.
    pub const fn filled(self) -> bool {
        matches!(self, Icon::Bookmark)
    }

    /// Single-column glyph for terminal rendering.
    pub const fn glyph(self) -> &'static str {
        match self {
            Icon::Home => "⌂",
            Icon::Globe => "◍",
            Icon::Briefcase => "▣",
            Icon::Chip => "▦",
            Icon::Trophy => "♛",
            Icon::Bookmark => "★",
            Icon::BookmarkOutline => "☆",
            Icon::Sun => "☼",
            Icon::Moon => "☾",
            Icon::Back => "←",
            Icon::Share => "↗",
            Icon::Reader => "≡",
        }
    }

    /// Bookmark icon for a saved flag.
    pub const fn bookmark(saved: bool) -> Icon {
        if saved {
            Icon::Bookmark
        } else {
            Icon::BookmarkOutline
        }
    }
}
