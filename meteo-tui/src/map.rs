//! Map panel: a thin wrapper around ratatui's world-map canvas widget.

use meteo_core::Coordinates;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        Block,
        canvas::{Canvas, Map, MapResolution, Points},
    },
};

const INITIAL_CENTER: Coordinates = Coordinates { lat: 48.8566, lon: 2.3522 };
const INITIAL_ZOOM: u8 = 6;
/// Zoom applied when a searched city is displayed.
pub const CITY_ZOOM: u8 = 10;
const CLOUD_OVERLAY_OPACITY: f64 = 0.7;

/// Colors the map is drawn with, chosen by the active theme.
pub struct MapStyle {
    pub outline: Color,
    pub marker: Color,
    pub clouds: Color,
}

/// View state of the map panel.
///
/// Center and zoom follow slippy-map semantics: the viewport spans
/// `360 / 2^zoom` degrees of longitude, half that in latitude.
#[derive(Debug)]
pub struct MapView {
    center: Coordinates,
    zoom: u8,
    marker: Option<Coordinates>,
    cloud_opacity: f64,
}

impl MapView {
    /// Initial view over Paris, cloud overlay enabled.
    pub fn new() -> Self {
        let mut view = Self {
            center: INITIAL_CENTER,
            zoom: INITIAL_ZOOM,
            marker: None,
            cloud_opacity: 0.0,
        };
        view.set_cloud_overlay(CLOUD_OVERLAY_OPACITY);
        view
    }

    pub fn recenter(&mut self, lat: f64, lon: f64, zoom: u8) {
        self.center = Coordinates { lat, lon };
        self.zoom = zoom;
    }

    /// Place the marker, replacing any prior one.
    pub fn show_marker(&mut self, lat: f64, lon: f64) {
        self.marker = Some(Coordinates { lat, lon });
    }

    /// Opacity of the translucent cloud layer, clamped to `0.0..=1.0`.
    pub fn set_cloud_overlay(&mut self, opacity: f64) {
        self.cloud_opacity = opacity.clamp(0.0, 1.0);
    }

    #[cfg(test)]
    pub fn center(&self) -> Coordinates {
        self.center
    }

    #[cfg(test)]
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    #[cfg(test)]
    pub fn marker(&self) -> Option<Coordinates> {
        self.marker
    }

    fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let lon_span = 360.0 / f64::from(1u32 << u32::from(self.zoom));
        let lat_span = lon_span / 2.0;
        (
            [self.center.lon - lon_span / 2.0, self.center.lon + lon_span / 2.0],
            [self.center.lat - lat_span / 2.0, self.center.lat + lat_span / 2.0],
        )
    }

    /// Deterministic scatter standing in for the cloud tile layer: density
    /// scales with the overlay opacity and the displayed cloud cover.
    fn cloud_points(&self, cloud_cover_pct: u8) -> Vec<(f64, f64)> {
        let (x_bounds, y_bounds) = self.bounds();
        let budget =
            (400.0 * self.cloud_opacity * f64::from(cloud_cover_pct.min(100)) / 100.0) as usize;

        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 11) as f64 / (1u64 << 53) as f64
        };

        (0..budget)
            .map(|_| {
                (
                    x_bounds[0] + next() * (x_bounds[1] - x_bounds[0]),
                    y_bounds[0] + next() * (y_bounds[1] - y_bounds[0]),
                )
            })
            .collect()
    }

    pub fn render(
        &self,
        f: &mut Frame,
        area: Rect,
        block: Block,
        style: MapStyle,
        cloud_cover_pct: Option<u8>,
    ) {
        let (x_bounds, y_bounds) = self.bounds();
        let clouds = cloud_cover_pct.map(|pct| self.cloud_points(pct)).unwrap_or_default();

        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                ctx.draw(&Map { color: style.outline, resolution: MapResolution::High });
                if !clouds.is_empty() {
                    ctx.layer();
                    ctx.draw(&Points { coords: &clouds, color: style.clouds });
                }
                if let Some(marker) = self.marker {
                    ctx.layer();
                    ctx.print(
                        marker.lon,
                        marker.lat,
                        Line::styled("◉", Style::default().fg(style.marker)),
                    );
                }
            });

        f.render_widget(canvas, area);
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new()
    }
}
