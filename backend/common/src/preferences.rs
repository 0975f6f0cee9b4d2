//! # UI Preferences
//!
//! Two values survive page reloads:
//!
//! - `theme`: `"light"` or `"dark"`
//! - `sidebarCollapsed`: `"true"` or `"false"`
//!
//! The backing store is anything implementing [`KeyValueStore`]. In the
//! browser that is `localStorage` (see the frontend crate), in tests it is
//! [`MemoryStore`]. Unparseable stored values read as unset.

use std::{cell::RefCell, collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const THEME_KEY: &str = "theme";
pub const SIDEBAR_COLLAPSED_KEY: &str = "sidebarCollapsed";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown theme: {0}")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

/// String key/value storage with `localStorage` semantics.
///
/// Implementations swallow their own failures: a store that is unavailable
/// behaves as an empty store that ignores writes.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str);

    fn remove_item(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

pub struct Preferences<S> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn theme(&self) -> Option<Theme> {
        self.store.get_item(THEME_KEY)?.parse().ok()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.store.set_item(THEME_KEY, theme.as_str());
    }

    pub fn clear_theme(&self) {
        self.store.remove_item(THEME_KEY);
    }

    pub fn sidebar_collapsed(&self) -> Option<bool> {
        match self.store.get_item(SIDEBAR_COLLAPSED_KEY)?.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        self.store
            .set_item(SIDEBAR_COLLAPSED_KEY, if collapsed { "true" } else { "false" });
    }

    pub fn clear_sidebar_collapsed(&self) {
        self.store.remove_item(SIDEBAR_COLLAPSED_KEY);
    }

    pub fn clear(&self) {
        self.clear_theme();
        self.clear_sidebar_collapsed();
    }
}
