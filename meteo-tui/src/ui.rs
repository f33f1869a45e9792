//! Rendering: layout, theme palettes, and the per-panel draw functions.
//!
//! Every visible label goes through the translation table, so a language
//! toggle re-renders the whole surface on the next frame.

use meteo_core::{HISTORY_CAP, Language, TextKey, Theme, WeatherSnapshot, text};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, List, ListItem, Paragraph, Row, Table, Wrap},
};

use crate::app::{App, Panel};
use crate::map::MapStyle;

/// Colors of one theme.
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub border: Color,
    pub title: Color,
    pub value: Color,
    pub muted: Color,
    pub warning: Color,
    pub highlight_bg: Color,
    pub marker: Color,
    pub clouds: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                bg: Color::White,
                fg: Color::Black,
                border: Color::Blue,
                title: Color::Blue,
                value: Color::Green,
                muted: Color::DarkGray,
                warning: Color::Red,
                highlight_bg: Color::LightBlue,
                marker: Color::Red,
                clouds: Color::Gray,
            },
            Theme::Dark => Self {
                bg: Color::Black,
                fg: Color::White,
                border: Color::Cyan,
                title: Color::Yellow,
                value: Color::Green,
                muted: Color::DarkGray,
                warning: Color::LightRed,
                highlight_bg: Color::DarkGray,
                marker: Color::LightRed,
                clouds: Color::Gray,
            },
        }
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let palette = Palette::for_theme(app.theme());

    let background = Block::default().style(Style::default().bg(palette.bg).fg(palette.fg));
    f.render_widget(background, f.area());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    draw_header(f, rows[0], app, &palette);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(columns[0]);
    draw_search_input(f, left[0], app, &palette);
    draw_weather_panel(f, left[1], app, &palette);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(HISTORY_CAP as u16 + 2), Constraint::Min(0)])
        .split(columns[1]);
    draw_history(f, right[0], app, &palette);
    draw_map(f, right[1], app, &palette);

    draw_footer(f, rows[2], app, &palette);
}

fn panel_block<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" {title} "), Style::default().fg(palette.title)))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(palette.border))
        .border_type(BorderType::Rounded)
}

fn draw_header(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let lang = app.language();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .border_type(BorderType::Rounded);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(12)])
        .split(inner);

    let title = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(
            text(lang, TextKey::Title),
            Style::default().fg(palette.title).add_modifier(Modifier::BOLD),
        ),
    ]));
    f.render_widget(title, halves[0]);

    // Mirrors the page's two toggle buttons: active theme icon, target language.
    let toggles = Paragraph::new(format!("{}  {} ", app.theme().icon(), lang.toggle_label()))
        .alignment(Alignment::Right)
        .style(Style::default().fg(palette.fg));
    f.render_widget(toggles, halves[1]);
}

fn draw_search_input(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let lang = app.language();
    let content = if let Some(notice) = app.notice {
        Line::from(Span::styled(text(lang, notice), Style::default().fg(palette.warning)))
    } else if app.input.is_empty() {
        Line::from(Span::styled(
            text(lang, TextKey::Placeholder),
            Style::default().fg(palette.muted),
        ))
    } else {
        Line::from(vec![
            Span::raw(app.input.clone()),
            Span::styled("▏", Style::default().fg(palette.muted)),
        ])
    };

    let input = Paragraph::new(content).block(panel_block(text(lang, TextKey::Search), palette));
    f.render_widget(input, area);
}

fn draw_weather_panel(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let lang = app.language();
    let block = panel_block(text(lang, TextKey::Title), palette);

    match &app.panel {
        Panel::Idle => {
            let prompt = Paragraph::new(text(lang, TextKey::Prompt))
                .style(Style::default().fg(palette.muted))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(prompt, area);
        }
        Panel::Error(key) => {
            let message = Paragraph::new(text(lang, *key))
                .style(Style::default().fg(palette.warning))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(message, area);
        }
        Panel::Displaying(snapshot) => {
            let inner = block.inner(area);
            f.render_widget(block, area);

            let sections = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(4), Constraint::Min(0)])
                .split(inner);

            f.render_widget(snapshot_header(snapshot, palette), sections[0]);
            f.render_widget(snapshot_details(snapshot, lang, palette), sections[1]);
        }
    }
}

fn snapshot_header<'a>(snapshot: &'a WeatherSnapshot, palette: &Palette) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                snapshot.city.as_str(),
                Style::default().fg(palette.title).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(snapshot.description.as_str(), Style::default().fg(palette.value)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!("{} {}°C", snapshot.condition.glyph(), snapshot.temperature_c),
                Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
            ),
        ]),
    ])
}

fn snapshot_details(
    snapshot: &WeatherSnapshot,
    lang: Language,
    palette: &Palette,
) -> Table<'static> {
    let label = |key| Cell::from(format!(" {}", text(lang, key)));
    let value =
        |v: String| Cell::from(v).style(Style::default().fg(palette.value));

    let rows = vec![
        Row::new(vec![label(TextKey::FeelsLike), value(format!("{}°C", snapshot.feels_like_c))]),
        Row::new(vec![label(TextKey::Humidity), value(format!("{}%", snapshot.humidity_pct))]),
        Row::new(vec![label(TextKey::Wind), value(format!("{} km/h", snapshot.wind_kmh))]),
        Row::new(vec![label(TextKey::Pressure), value(format!("{} hPa", snapshot.pressure_hpa))]),
        Row::new(vec![
            Cell::from(""),
            Cell::from(snapshot.observed_at.format("%d-%m-%Y %H:%M").to_string())
                .style(Style::default().fg(palette.muted)),
        ]),
    ];

    Table::new(rows, [Constraint::Length(14), Constraint::Min(10)])
}

fn draw_history(f: &mut Frame, area: Rect, app: &mut App, palette: &Palette) {
    let lang = app.language();
    let block = panel_block(text(lang, TextKey::LastSearches), palette);

    let items: Vec<ListItem> = if app.history().is_empty() {
        vec![ListItem::new(Span::styled(
            text(lang, TextKey::NoRecentSearches),
            Style::default().fg(palette.muted),
        ))]
    } else {
        app.history().iter().map(|city| ListItem::new(format!(" {city}"))).collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default().bg(palette.highlight_bg).add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    f.render_stateful_widget(list, area, &mut app.history_state);
}

fn draw_map(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let lang = app.language();
    let block = panel_block(text(lang, TextKey::WeatherMap), palette);
    let style = MapStyle {
        outline: palette.value,
        marker: palette.marker,
        clouds: palette.clouds,
    };
    app.map.render(f, area, block, style, app.displayed_cloud_cover());
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let lang = app.language();
    let hints = format!(
        " Enter: {}   ↑/↓: {}   Ctrl+T: {}   Ctrl+L: {}   Esc: {}",
        text(lang, TextKey::Search),
        text(lang, TextKey::LastSearches),
        app.theme().toggled().icon(),
        lang.toggle_label(),
        text(lang, TextKey::Quit),
    );
    let footer = Paragraph::new(hints).style(Style::default().fg(palette.muted));
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_core::Store;
    use ratatui::{Terminal, backend::TestBackend};
    use tempfile::TempDir;

    fn test_app() -> (TempDir, App) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Store::open_at(dir.path().join("preferences.toml"));
        (dir, App::new(store))
    }

    fn rendered_text(app: &mut App) -> String {
        let backend = TestBackend::new(110, 32);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal.draw(|f| draw(f, app)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn idle_dashboard_renders_french_labels() {
        let (_dir, mut app) = test_app();
        let text = rendered_text(&mut app);

        assert!(text.contains("Mon App Météo"));
        assert!(text.contains("Dernières recherches"));
        assert!(text.contains("Carte Météo"));
        assert!(text.contains("Aucune recherche récente."));
        assert!(text.contains("Veuillez rechercher une ville"));
    }

    #[test]
    fn language_toggle_rerenders_every_label() {
        let (_dir, mut app) = test_app();
        app.toggle_language();
        let text = rendered_text(&mut app);

        assert!(text.contains("My Weather App"));
        assert!(text.contains("Last Searches"));
        assert!(text.contains("Weather Map"));
        assert!(text.contains("No recent searches."));
        assert!(!text.contains("Mon App Météo"));
    }

    #[test]
    fn error_panel_shows_translated_message() {
        let (_dir, mut app) = test_app();
        app.input = "Paris".to_owned();
        // No API key stored, so the search surfaces the credential message.
        app.submit_search();
        let text = rendered_text(&mut app);

        assert!(text.contains("Clé API OpenWeatherMap manquante"));
    }

    #[test]
    fn history_entries_are_listed_most_recent_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = Store::open_at(dir.path().join("preferences.toml"));
        store.record_search("Lyon");
        store.record_search("Paris");

        let mut app = App::new(store);
        let text = rendered_text(&mut app);

        assert!(text.contains("Paris"));
        assert!(text.contains("Lyon"));
        assert!(!text.contains("Aucune recherche récente."));
    }
}
