//! Translation table for the dashboard's UI strings.
//!
//! Two languages are supported, French being the default. The table is a
//! closed enum of keys with an exhaustive lookup, so a missing translation is
//! a compile error rather than a runtime fallback.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl Language {
    /// ISO 639-1 code, as sent to the weather API's `lang` parameter.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }

    /// The other language (the toggle control flips between exactly two).
    pub fn toggled(&self) -> Self {
        match self {
            Language::Fr => Language::En,
            Language::En => Language::Fr,
        }
    }

    /// Label of the language toggle: shows the language you would switch to.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Language::Fr => "EN",
            Language::En => "FR",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Every translatable string in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    Title,
    Placeholder,
    Search,
    Prompt,
    LastSearches,
    NoRecentSearches,
    WeatherMap,
    FeelsLike,
    Humidity,
    Wind,
    Pressure,
    ErrorNotFound,
    ErrorFetch,
    ErrorApiKey,
    Quit,
}

impl TextKey {
    pub const ALL: &'static [TextKey] = &[
        TextKey::Title,
        TextKey::Placeholder,
        TextKey::Search,
        TextKey::Prompt,
        TextKey::LastSearches,
        TextKey::NoRecentSearches,
        TextKey::WeatherMap,
        TextKey::FeelsLike,
        TextKey::Humidity,
        TextKey::Wind,
        TextKey::Pressure,
        TextKey::ErrorNotFound,
        TextKey::ErrorFetch,
        TextKey::ErrorApiKey,
        TextKey::Quit,
    ];
}

/// Look up a UI string in the given language.
pub fn text(language: Language, key: TextKey) -> &'static str {
    let (fr, en) = match key {
        TextKey::Title => ("Mon App Météo", "My Weather App"),
        TextKey::Placeholder => ("Entrez le nom d'une ville...", "Enter a city name..."),
        TextKey::Search => ("Rechercher", "Search"),
        TextKey::Prompt => (
            "Veuillez rechercher une ville pour afficher les données météo.",
            "Please search for a city to display weather data.",
        ),
        TextKey::LastSearches => ("Dernières recherches", "Last Searches"),
        TextKey::NoRecentSearches => ("Aucune recherche récente.", "No recent searches."),
        TextKey::WeatherMap => ("Carte Météo", "Weather Map"),
        TextKey::FeelsLike => ("Ressenti", "Feels Like"),
        TextKey::Humidity => ("Humidité", "Humidity"),
        TextKey::Wind => ("Vent", "Wind"),
        TextKey::Pressure => ("Pression", "Pressure"),
        TextKey::ErrorNotFound => (
            "Ville non trouvée. Vérifiez l'orthographe.",
            "City not found. Check the spelling.",
        ),
        TextKey::ErrorFetch => (
            "Erreur lors de la récupération des données.",
            "Error retrieving data.",
        ),
        TextKey::ErrorApiKey => (
            "Clé API OpenWeatherMap manquante. Lancez `meteo configure`.",
            "Missing OpenWeatherMap API key. Run `meteo configure`.",
        ),
        TextKey::Quit => ("Quitter", "Quit"),
    };

    match language {
        Language::Fr => fr,
        Language::En => en,
    }
}
