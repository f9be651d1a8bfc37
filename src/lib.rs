//! Horizon: a terminal news reader that asks Gemini for a short briefing
//! per category and keeps a local list of saved articles.

pub mod app;
pub mod config;
pub mod icon;
pub mod keybindings;
pub mod news;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
