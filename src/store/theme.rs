//! Display theme preference

use std::fmt;
use std::str::FromStr;

use super::{KeyValueStore, StoreResult};

/// Key the theme is stored under in the durable store
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon for the toggle control: what switching would give you
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }

    /// Stored theme, or the default when absent or unrecognised
    pub fn load(store: &impl KeyValueStore) -> StoreResult<Self> {
        Ok(store
            .get(THEME_KEY)?
            .and_then(|v| v.parse().ok())
            .unwrap_or_default())
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> StoreResult<()> {
        store.set(THEME_KEY, &self.to_string())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_default_is_light() {
        let store = MemoryStore::new();
        assert_eq!(Theme::load(&store).unwrap(), Theme::Light);
    }

    #[test]
    fn test_toggle_and_persist() {
        let mut store = MemoryStore::new();
        let theme = Theme::load(&store).unwrap().toggle();
        theme.save(&mut store).unwrap();

        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(Theme::load(&store).unwrap(), Theme::Dark);
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
    }

    #[test]
    fn test_unknown_value_falls_back() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "solarized").unwrap();
        assert_eq!(Theme::load(&store).unwrap(), Theme::Light);
    }
}
