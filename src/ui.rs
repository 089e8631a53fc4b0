pub struct UiState {
    // Engine viewport
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub origin_bottom_left: bool,

    // Overlay
    pub dark_mode: bool,
    pub show_container: bool,
    pub fit_requested: bool,

    // Selection and cursor tracking
    pub selected: Option<String>,
    pub cursor_position: Option<(f64, f64)>,

    pub status: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            viewport_width: 1920.0,
            viewport_height: 1080.0,
            origin_bottom_left: true,
            dark_mode: true,
            show_container: true,
            fit_requested: true,
            selected: None,
            cursor_position: None,
            status: None,
        }
    }
}
