//! Core domain types for Galerie.

use serde::{Deserialize, Serialize};

mod catalog;
mod paging;

pub use catalog::{Catalog, CatalogError, Category, CategoryId, MediaItem, filter_items};
pub use paging::{Page, paginate, total_pages};

pub const DEFAULT_PAGE_SIZE: usize = 9;
pub const MAX_PAGE_SIZE: usize = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub page_size: usize,
    pub theme: Theme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err("unknown theme"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            theme: Theme::Dark,
        }
    }
}

impl Settings {
    pub fn normalize(&mut self) {
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
    }

    pub fn cycle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
    }

    pub fn increase_page_size(&mut self) {
        self.page_size = (self.page_size + 1).min(MAX_PAGE_SIZE);
    }

    pub fn decrease_page_size(&mut self) {
        self.page_size = self.page_size.saturating_sub(1).max(1);
    }
}
