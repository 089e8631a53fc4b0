use egui::{Pos2, Rect, Vec2};

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 10.0;

/// The engine viewport drawn inside the central panel, with pan and zoom.
pub struct Canvas {
    size: Vec2,
    offset: Vec2,
    zoom: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            offset: Vec2::ZERO,
            zoom: 0.5,
        }
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom around `pos`, keeping the point under the cursor fixed.
    pub fn zoom_at(&mut self, factor: f32, pos: Pos2, view_rect: Rect) {
        let old_zoom = self.zoom;
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        let mouse_offset = pos - (view_rect.center() + self.offset);
        self.offset -= mouse_offset * (self.zoom / old_zoom - 1.0);
    }

    /// Center the viewport and scale it to fit `view_rect`.
    pub fn fit(&mut self, view_rect: Rect) {
        self.offset = Vec2::ZERO;
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return;
        }
        let fit = (view_rect.width() / self.size.x).min(view_rect.height() / self.size.y);
        self.zoom = (fit * 0.95).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn screen_rect(&self, view_rect: Rect) -> Rect {
        Rect::from_center_size(view_rect.center() + self.offset, self.size * self.zoom)
    }

    pub fn to_canvas(&self, screen_pos: Pos2, view_rect: Rect) -> Pos2 {
        let origin = self.screen_rect(view_rect).min;
        ((screen_pos - origin) / self.zoom).to_pos2()
    }

    pub fn to_screen(&self, canvas_pos: Pos2, view_rect: Rect) -> Pos2 {
        self.screen_rect(view_rect).min + canvas_pos.to_vec2() * self.zoom
    }
}
