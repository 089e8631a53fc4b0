use crate::canvas::Canvas;
use crate::coordinate::ScreenSpace;
use crate::overlay::MarkerOverlay;
use crate::ui::UiState;
use clipboard::ClipboardContext;
use clipboard::ClipboardProvider;
use egui::{Color32, Context, Ui};
use scene_markers::{dispatch_all, AppState, Config, LocalPropertyService, MarkerInfo, Markers};
use std::path::{Path, PathBuf};

pub struct MarkersApp {
    canvas: Canvas,
    screen_space: ScreenSpace,
    service: LocalPropertyService,
    markers: Markers,
    current: Vec<MarkerInfo>,
    ui_state: UiState,
    clipboard: Option<ClipboardContext>,
    snapshot_path: Option<PathBuf>,
}

impl MarkersApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: Config,
        state: AppState,
        snapshot_path: Option<PathBuf>,
    ) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(10.0, 10.0);
        cc.egui_ctx.set_style(style);

        let ui_state = UiState::default();
        let viewport = egui::vec2(ui_state.viewport_width, ui_state.viewport_height);

        Self {
            canvas: Canvas::new(viewport.x, viewport.y),
            screen_space: ScreenSpace::new(viewport),
            service: LocalPropertyService::new(state),
            markers: Markers::new(config),
            current: Vec::new(),
            ui_state,
            clipboard: ClipboardProvider::new().ok(),
            snapshot_path,
        }
    }

    pub fn copy_to_clipboard(&mut self, text: String) -> bool {
        if let Some(clipboard) = &mut self.clipboard {
            clipboard.set_contents(text).is_ok()
        } else {
            false
        }
    }

    fn load_snapshot(&mut self, path: &Path) {
        match AppState::load(path) {
            Ok(state) => {
                self.service.replace_tree(state.property_tree);
                self.service.set_fetch_data(state.fetch_data);
                self.snapshot_path = Some(path.to_path_buf());
                self.ui_state.status = Some(format!("Loaded {}", path.display()));
                tracing::info!(path = %path.display(), "snapshot loaded");
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load snapshot");
                self.ui_state.status = Some(err.to_string());
            }
        }
    }

    fn open_snapshot_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Snapshot", &["json"])
            .pick_file()
        {
            self.load_snapshot(&path);
        }
    }

    /// Recompute markers from the current snapshot and run the resulting commands.
    fn refresh(&mut self) {
        let update = self.markers.update(self.service.snapshot());
        if !update.commands.is_empty() {
            tracing::debug!(commands = update.commands.len(), "dispatching listen commands");
        }
        dispatch_all(&update.commands, &mut self.service);
        self.current = update.markers;

        if let Some(selected) = &self.ui_state.selected {
            if !self.current.iter().any(|m| &m.key == selected) {
                self.ui_state.selected = None;
            }
        }
    }

    fn sync_viewport(&mut self) {
        let (width, height) = (self.ui_state.viewport_width, self.ui_state.viewport_height);
        self.canvas.set_size(width, height);
        self.screen_space.set_viewport(egui::vec2(width, height));
        self.screen_space.set_origin_bottom_left(self.ui_state.origin_bottom_left);
    }

    fn handle_canvas_interactions(&mut self, ui: &mut Ui, response: egui::Response) {
        let view_rect = response.rect;

        if response.dragged_by(egui::PointerButton::Middle)
            || (response.dragged_by(egui::PointerButton::Primary) && ui.input(|i| i.modifiers.alt))
        {
            self.canvas.pan(response.drag_delta());
        }

        if response.hovered() {
            let scroll_delta = ui.input(|i| i.scroll_delta.y);
            if scroll_delta != 0.0 {
                let zoom_factor = if scroll_delta > 0.0 { 1.1 } else { 1.0 / 1.1 };
                if let Some(pos) = ui.input(|i| i.pointer.hover_pos()) {
                    self.canvas.zoom_at(zoom_factor, pos, view_rect);
                }
            }
        }

        self.ui_state.cursor_position = response.hover_pos().map(|pos| {
            let canvas_pos = self.canvas.to_canvas(pos, view_rect);
            self.screen_space.to_engine(canvas_pos)
        });

        if response.clicked() {
            if let Some(pos) = response.hover_pos() {
                let overlay = self.overlay(view_rect);
                self.ui_state.selected = overlay.pick(&self.current, pos);
            }
        }
    }

    fn overlay(&self, view_rect: egui::Rect) -> MarkerOverlay<'_> {
        MarkerOverlay {
            canvas: &self.canvas,
            screen_space: &self.screen_space,
            view_rect,
            dark_mode: self.ui_state.dark_mode,
        }
    }

    fn draw_canvas(&mut self, ui: &mut Ui) -> egui::Response {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let view_rect = response.rect;
        if self.ui_state.fit_requested {
            self.canvas.fit(view_rect);
            self.ui_state.fit_requested = false;
        }

        let bg_color = if self.ui_state.dark_mode {
            Color32::from_rgb(20, 20, 20)
        } else {
            Color32::from_rgb(240, 240, 240)
        };
        painter.rect_filled(view_rect, 0.0, bg_color);

        let overlay = self.overlay(view_rect);
        if self.ui_state.show_container {
            overlay.paint_container(&painter);
        }
        overlay.paint(&painter, &self.current, self.ui_state.selected.as_deref());

        response
    }

    fn marker_list(&mut self, ui: &mut Ui) {
        let mut to_copy: Option<String> = None;
        let mut to_select: Option<String> = None;

        egui::ScrollArea::vertical()
            .max_height(320.0)
            .show(ui, |ui| {
                for marker in &self.current {
                    let (x, y) = marker.xy();
                    let is_selected = self.ui_state.selected.as_deref() == Some(marker.key.as_str());
                    ui.horizontal(|ui| {
                        if ui.selectable_label(is_selected, marker.identifier.as_str()).clicked() {
                            to_select = Some(marker.key.clone());
                        }
                        ui.label(format!("({:.0}, {:.0})", x, y));
                        if ui.button("Copy").clicked() {
                            to_copy = Some(format!("{}, {}", x, y));
                        }
                    });
                }
            });

        if let Some(key) = to_select {
            self.ui_state.selected = Some(key);
        }
        if let Some(text) = to_copy {
            self.copy_to_clipboard(text);
        }
    }

    fn selected_details(&self, ui: &mut Ui) {
        let Some(marker) = self
            .ui_state
            .selected
            .as_ref()
            .and_then(|key| self.current.iter().find(|m| &m.key == key))
        else {
            ui.label("Click a marker to inspect it");
            return;
        };

        ui.label(format!("Identifier: {}", marker.identifier));
        ui.label(format!("Size: {:.2}", marker.size));
        ui.label(format!("Screen radius: {:.1}", marker.planet_radius));
        ui.label(format!("Label: {}", if marker.show_label { "shown" } else { "hidden" }));
        ui.label(format!("Info: {}", if marker.show_info { "shown" } else { "hidden" }));
        for property in self
            .markers
            .displayed()
            .iter()
            .filter(|node| node.identifier == marker.identifier)
            .flat_map(|node| node.properties.iter())
        {
            ui.label(format!("{} = {} ({} listeners)", property.uri(), property.value, property.listeners));
        }
        if let Some(info) = &marker.planet_info {
            ui.separator();
            ui.label(info.info.as_str());
        }
    }
}

impl eframe::App for MarkersApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut style = (*ctx.style()).clone();
        style.visuals = if self.ui_state.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_style(style);

        self.sync_viewport();
        self.refresh();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Scene Markers");
                ui.separator();
                if ui.button("Open Snapshot…").clicked() {
                    self.open_snapshot_dialog();
                }
                if let Some(path) = self.snapshot_path.clone() {
                    if ui.button("Reload").clicked() {
                        self.load_snapshot(&path);
                    }
                }
                if ui.button("Fit View").clicked() {
                    self.ui_state.fit_requested = true;
                }
                ui.separator();
                ui.label(format!("Zoom: {}%", (self.canvas.zoom() * 100.0) as i32));
                ui.label(format!(
                    "Markers: {} / {} nodes",
                    self.current.len(),
                    self.markers.displayed().len()
                ));
                if let Some(status) = &self.ui_state.status {
                    ui.separator();
                    ui.label(status.as_str());
                }
            });
        });

        egui::SidePanel::right("markers_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.collapsing("Viewport", |ui| {
                        ui.horizontal(|ui| {
                            ui.label("Width:");
                            ui.add(
                                egui::DragValue::new(&mut self.ui_state.viewport_width)
                                    .speed(1.0)
                                    .clamp_range(100.0..=10000.0),
                            );
                        });
                        ui.horizontal(|ui| {
                            ui.label("Height:");
                            ui.add(
                                egui::DragValue::new(&mut self.ui_state.viewport_height)
                                    .speed(1.0)
                                    .clamp_range(100.0..=10000.0),
                            );
                        });
                        ui.checkbox(&mut self.ui_state.origin_bottom_left, "Engine origin at bottom-left");
                        ui.checkbox(&mut self.ui_state.show_container, "Show viewport border");
                        ui.checkbox(&mut self.ui_state.dark_mode, "Dark mode");
                    });

                    ui.separator();
                    ui.heading("Cursor");
                    match self.ui_state.cursor_position {
                        Some((x, y)) => ui.label(format!("({:.0}, {:.0})", x, y)),
                        None => ui.label("-"),
                    };

                    ui.separator();
                    ui.heading("Visible Markers");
                    self.marker_list(ui);

                    ui.separator();
                    ui.heading("Selected");
                    self.selected_details(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let response = self.draw_canvas(ui);
            self.handle_canvas_interactions(ui, response);
        });

        ctx.request_repaint();
    }

    fn on_close_event(&mut self) -> bool {
        let commands = self.markers.unmount();
        dispatch_all(&commands, &mut self.service);
        tracing::info!(stopped = commands.len(), "released property subscriptions");
        true
    }
}
