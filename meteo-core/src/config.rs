use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::i18n::Language;

/// Maximum number of entries kept in the search history.
pub const HISTORY_CAP: usize = 5;

/// Dashboard color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon of the theme toggle, matching the active theme.
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Light => "☀",
            Theme::Dark => "🌙",
        }
    }
}

/// Everything the dashboard persists, stored as one TOML document.
///
/// Example:
/// ```toml
/// api_key = "..."
/// theme = "dark"
/// language = "fr"
/// history = ["Paris", "Lyon"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Preferences {
    /// OpenWeatherMap API key, set via `meteo configure`.
    pub api_key: Option<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub language: Language,
    /// Most-recent-first list of previously searched city names.
    #[serde(default)]
    pub history: Vec<String>,
}

/// Durable preference store.
///
/// Opening never fails: a missing file yields defaults, an unreadable or
/// unparseable file yields defaults for the session, and an unresolvable
/// config directory degrades to a session-only store that keeps mutations in
/// memory. Writes are immediate and best-effort; failures are logged, never
/// surfaced.
#[derive(Debug)]
pub struct Store {
    path: Option<PathBuf>,
    prefs: Preferences,
}

impl Store {
    /// Open the store at the platform config location.
    pub fn open() -> Self {
        match Self::config_file_path() {
            Some(path) => Self::open_at(path),
            None => {
                tracing::warn!("could not determine platform config directory, preferences will not persist");
                Self { path: None, prefs: Preferences::default() }
            }
        }
    }

    /// Open the store against an explicit file path.
    pub fn open_at(path: PathBuf) -> Self {
        let prefs = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(prefs) => prefs,
                    Err(err) => {
                        tracing::warn!(path = %path.display(), %err, "preference file is not valid TOML, using defaults");
                        Preferences::default()
                    }
                },
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "failed to read preference file, using defaults");
                    Preferences::default()
                }
            }
        } else {
            Preferences::default()
        };

        Self { path: Some(path), prefs }
    }

    /// Path to the preference file.
    pub fn config_file_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("dev", "meteo", "meteo")?;
        Some(dirs.config_dir().join("preferences.toml"))
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn theme(&self) -> Theme {
        self.prefs.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.prefs.theme = theme;
        self.persist();
    }

    pub fn language(&self) -> Language {
        self.prefs.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.prefs.language = language;
        self.persist();
    }

    pub fn api_key(&self) -> Option<&str> {
        self.prefs.api_key.as_deref()
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.prefs.api_key = Some(api_key);
        self.persist();
    }

    /// Ordered search history, most recent first.
    pub fn history(&self) -> &[String] {
        &self.prefs.history
    }

    /// Record a successful search.
    ///
    /// Any case-insensitive match is removed first, the city goes to the
    /// front, and the list is truncated to [`HISTORY_CAP`].
    pub fn record_search(&mut self, city: &str) {
        let lowered = city.to_lowercase();
        self.prefs.history.retain(|entry| entry.to_lowercase() != lowered);
        self.prefs.history.insert(0, city.to_owned());
        self.prefs.history.truncate(HISTORY_CAP);
        self.persist();
    }

    fn persist(&self) {
        let Some(path) = &self.path else { return };

        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), %err, "failed to create config directory");
                return;
            }
        }

        match toml::to_string_pretty(&self.prefs) {
            Ok(toml) => {
                if let Err(err) = fs::write(path, toml) {
                    tracing::warn!(path = %path.display(), %err, "failed to write preference file");
                }
            }
            Err(err) => tracing::warn!(%err, "failed to serialize preferences"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Store::open_at(dir.path().join("preferences.toml"));
        (dir, store)
    }

    #[test]
    fn defaults_when_file_is_missing() {
        let (_dir, store) = temp_store();
        assert_eq!(store.theme(), Theme::Light);
        assert_eq!(store.language(), Language::Fr);
        assert!(store.history().is_empty());
        assert!(store.api_key().is_none());
    }

    #[test]
    fn defaults_when_file_is_corrupt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "{{{ not toml").expect("write");

        let store = Store::open_at(path);
        assert_eq!(store.theme(), Theme::Light);
        assert!(store.history().is_empty());
    }

    #[test]
    fn preferences_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.toml");

        let mut store = Store::open_at(path.clone());
        store.set_theme(Theme::Dark);
        store.set_language(Language::En);
        store.set_api_key("KEY".into());
        store.record_search("Paris");

        let reopened = Store::open_at(path);
        assert_eq!(reopened.theme(), Theme::Dark);
        assert_eq!(reopened.language(), Language::En);
        assert_eq!(reopened.api_key(), Some("KEY"));
        assert_eq!(reopened.history(), ["Paris"]);
    }

    #[test]
    fn history_is_capped() {
        let (_dir, mut store) = temp_store();
        for city in ["Paris", "Lyon", "Nice", "Lille", "Brest", "Nantes", "Dijon"] {
            store.record_search(city);
        }
        assert_eq!(store.history().len(), HISTORY_CAP);
        assert_eq!(store.history()[0], "Dijon");
        // Oldest entries fell off the end.
        assert!(!store.history().contains(&"Paris".to_string()));
        assert!(!store.history().contains(&"Lyon".to_string()));
    }

    #[test]
    fn rerecorded_city_moves_to_front_without_growing() {
        let (_dir, mut store) = temp_store();
        store.record_search("Paris");
        store.record_search("Lyon");
        store.record_search("Nice");

        store.record_search("Paris");
        assert_eq!(store.history(), ["Paris", "Nice", "Lyon"]);
    }

    #[test]
    fn dedup_is_case_insensitive() {
        let (_dir, mut store) = temp_store();
        store.record_search("paris");
        store.record_search("Lyon");
        store.record_search("PARIS");

        assert_eq!(store.history(), ["PARIS", "Lyon"]);
    }

    #[test]
    fn no_sequence_produces_duplicates_or_overflow() {
        let (_dir, mut store) = temp_store();
        let cities = ["Paris", "paris", "Lyon", "Nice", "LYON", "Brest", "Nantes", "nice", "Paris"];
        for city in cities {
            store.record_search(city);
            assert!(store.history().len() <= HISTORY_CAP);
            for (i, a) in store.history().iter().enumerate() {
                for b in store.history().iter().skip(i + 1) {
                    assert_ne!(a.to_lowercase(), b.to_lowercase());
                }
            }
        }
    }

    #[test]
    fn theme_toggled_twice_round_trips() {
        let (_dir, mut store) = temp_store();
        let original = store.theme();
        store.set_theme(store.theme().toggled());
        store.set_theme(store.theme().toggled());
        assert_eq!(store.theme(), original);
    }

    #[test]
    fn session_only_store_keeps_mutations_in_memory() {
        let mut store = Store { path: None, prefs: Preferences::default() };
        store.set_theme(Theme::Dark);
        store.record_search("Paris");
        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.history(), ["Paris"]);
    }
}
