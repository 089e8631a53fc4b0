use crate::canvas::Canvas;
use crate::coordinate::ScreenSpace;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};
use scene_markers::MarkerInfo;

/// Pixels per unit of marker size for the dot.
const DOT_SCALE: f32 = 3.0;
/// Pixels per unit of marker size for label text.
const LABEL_SCALE: f32 = 6.0;
const PICK_THRESHOLD: f32 = 12.0;

/// Paints one marker widget per record inside the viewport container.
pub struct MarkerOverlay<'a> {
    pub canvas: &'a Canvas,
    pub screen_space: &'a ScreenSpace,
    pub view_rect: Rect,
    pub dark_mode: bool,
}

impl MarkerOverlay<'_> {
    fn screen_pos(&self, marker: &MarkerInfo) -> Option<Pos2> {
        let (x, y) = marker.xy();
        let canvas_pos = self.screen_space.to_canvas(x, y)?;
        Some(self.canvas.to_screen(canvas_pos, self.view_rect))
    }

    fn text_color(&self) -> Color32 {
        if self.dark_mode {
            Color32::WHITE
        } else {
            Color32::BLACK
        }
    }

    pub fn paint_container(&self, painter: &Painter) {
        let border_color = if self.dark_mode {
            Color32::from_rgb(150, 150, 150)
        } else {
            Color32::from_rgb(100, 100, 100)
        };
        painter.rect_stroke(self.canvas.screen_rect(self.view_rect), 0.0, Stroke::new(2.0, border_color));
    }

    pub fn paint(&self, painter: &Painter, markers: &[MarkerInfo], selected: Option<&str>) {
        for marker in markers {
            let Some(pos) = self.screen_pos(marker) else {
                continue;
            };
            let size = if marker.size.is_finite() { marker.size as f32 } else { 1.0 };
            let is_selected = selected == Some(marker.key.as_str());
            let color = if is_selected {
                Color32::from_rgb(255, 200, 0)
            } else {
                Color32::from_rgb(0, 120, 255)
            };

            if marker.show_info && marker.planet_radius.is_finite() {
                let ring = marker.planet_radius as f32 * self.canvas.zoom();
                painter.circle_stroke(pos, ring, Stroke::new(1.0, color.gamma_multiply(0.6)));
            }
            painter.circle_filled(pos, size * DOT_SCALE, color);

            let mut text_pos = pos + egui::vec2(size * DOT_SCALE + 4.0, 0.0);
            if marker.show_label {
                painter.text(
                    text_pos,
                    Align2::LEFT_CENTER,
                    &marker.identifier,
                    FontId::proportional(size * LABEL_SCALE),
                    self.text_color(),
                );
                text_pos.y += size * LABEL_SCALE;
            }
            if marker.show_info {
                if let Some(info) = &marker.planet_info {
                    painter.text(
                        text_pos,
                        Align2::LEFT_TOP,
                        &info.info,
                        FontId::proportional(11.0),
                        self.text_color().gamma_multiply(0.8),
                    );
                }
            }
        }
    }

    /// Key of the marker nearest to `pos`, if one lies within reach.
    pub fn pick(&self, markers: &[MarkerInfo], pos: Pos2) -> Option<String> {
        markers
            .iter()
            .filter_map(|marker| {
                let screen = self.screen_pos(marker)?;
                Some(((screen - pos).length(), marker))
            })
            .filter(|(distance, _)| *distance < PICK_THRESHOLD)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, marker)| marker.key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Vec2;

    fn marker(key: &str, position: Vec<f64>) -> MarkerInfo {
        MarkerInfo {
            key: key.to_string(),
            identifier: key.to_string(),
            position,
            size: 2.0,
            show_info: false,
            show_label: true,
            planet_radius: 10.0,
            planet_info: None,
        }
    }

    #[test]
    fn picks_nearest_marker_and_skips_nan() {
        let mut canvas = Canvas::new(1000.0, 1000.0);
        let view_rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(1000.0, 1000.0));
        canvas.fit(view_rect);
        let mut screen_space = ScreenSpace::new(Vec2::new(1000.0, 1000.0));
        screen_space.set_origin_bottom_left(false);
        let overlay = MarkerOverlay {
            canvas: &canvas,
            screen_space: &screen_space,
            view_rect,
            dark_mode: true,
        };

        let markers = vec![
            marker("a", vec![f64::NAN, 0.0]),
            marker("b", vec![500.0, 500.0]),
            marker("c", vec![520.0, 500.0]),
        ];
        let center = canvas.to_screen(Pos2::new(500.0, 500.0), view_rect);
        assert_eq!(overlay.pick(&markers, center), Some("b".to_string()));
        assert_eq!(overlay.pick(&markers, Pos2::new(0.0, 0.0)), None);
    }
}
