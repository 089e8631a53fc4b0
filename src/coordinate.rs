use egui::{Pos2, Vec2};

/// Maps engine screen-space positions onto canvas coordinates.
///
/// The engine reports positions in viewport pixels; by default its origin
/// sits at the bottom-left while the canvas origin is top-left.
pub struct ScreenSpace {
    origin_bottom_left: bool,
    viewport: Vec2,
}

impl ScreenSpace {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            origin_bottom_left: true,
            viewport,
        }
    }

    pub fn set_origin_bottom_left(&mut self, origin_bottom_left: bool) {
        self.origin_bottom_left = origin_bottom_left;
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// `None` for non-finite input so NaN markers are never painted.
    pub fn to_canvas(&self, x: f64, y: f64) -> Option<Pos2> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let (x, y) = (x as f32, y as f32);
        if self.origin_bottom_left {
            Some(Pos2::new(x, self.viewport.y - y))
        } else {
            Some(Pos2::new(x, y))
        }
    }

    pub fn to_engine(&self, canvas_pos: Pos2) -> (f64, f64) {
        let y = if self.origin_bottom_left {
            self.viewport.y - canvas_pos.y
        } else {
            canvas_pos.y
        };
        (canvas_pos.x as f64, y as f64)
    }
}
