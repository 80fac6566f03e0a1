use crate::panel::HighlightPanel;
use crate::ui::UiState;
use clipboard::ClipboardContext;
use clipboard::ClipboardProvider;
use egui::{ColorImage, Context};
use image::GenericImageView;
use std::path::PathBuf;

pub struct HighlightApp {
    panel: HighlightPanel,
    ui_state: UiState,
    clipboard: Option<ClipboardContext>,
    source_image: Option<image::DynamicImage>,
    image_path: Option<PathBuf>,
    status: String,
}

// Main implementation of the highlight marking app
impl HighlightApp {
    // Initialize the app, restoring persisted settings when available
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(10.0, 10.0);
        cc.egui_ctx.set_style(style);

        let ui_state: UiState = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        let clipboard = ClipboardProvider::new().ok();

        let mut app = Self {
            panel: HighlightPanel::new(),
            ui_state,
            clipboard,
            source_image: None,
            image_path: None,
            status: String::new(),
        };
        app.apply_ui_state();
        app
    }

    pub fn copy_to_clipboard(&mut self, text: String) -> bool {
        if let Some(clipboard) = &mut self.clipboard {
            clipboard.set_contents(text).is_ok()
        } else {
            false
        }
    }

    // Push restored settings into the panel
    fn apply_ui_state(&mut self) {
        self.panel.enable_highlight_draw(self.ui_state.draw_marker);
        self.panel.set_editable(self.ui_state.editable);
        self.panel
            .set_user_defined_scale(self.ui_state.user_defined_scale);
        if self.ui_state.user_defined_scale {
            self.panel.set_resize_factor(self.ui_state.scale);
        }
    }

    fn open_image_dialog(&mut self, ctx: &Context) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file();

        if let Some(path) = picked {
            match image::open(&path) {
                Ok(img) => {
                    self.source_image = Some(img);
                    self.image_path = Some(path);
                    self.status.clear();
                    self.refresh_panel_image(ctx);
                }
                Err(err) => {
                    self.status = format!("Could not load {}: {}", path.display(), err);
                }
            }
        }
    }

    // Upload the (optionally cropped) source image to the panel and keep the
    // panel's area offset in sync with the crop origin
    fn refresh_panel_image(&mut self, ctx: &Context) {
        let Some(source) = &self.source_image else {
            return;
        };

        let (width, height) = source.dimensions();
        let (view, origin_x, origin_y) = if self.ui_state.use_area {
            let x = self.ui_state.area_x.min(width.saturating_sub(1));
            let y = self.ui_state.area_y.min(height.saturating_sub(1));
            let w = self.ui_state.area_width.max(1).min(width - x);
            let h = self.ui_state.area_height.max(1).min(height - y);
            (source.crop_imm(x, y, w, h), x, y)
        } else {
            (source.clone(), 0, 0)
        };

        let rgba = view.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let color_image = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());

        let name = self
            .image_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "highlight_panel".to_string());
        self.panel.set_image(ctx, &name, color_image);
        self.panel
            .set_image_location(origin_x as i32, origin_y as i32);
    }

    fn marker_controls(&mut self, ui: &mut egui::Ui) {
        if ui
            .checkbox(&mut self.ui_state.draw_marker, "Draw marker")
            .changed()
        {
            self.panel.enable_highlight_draw(self.ui_state.draw_marker);
        }
        if ui
            .checkbox(&mut self.ui_state.editable, "Allow dragging")
            .changed()
        {
            self.panel.set_editable(self.ui_state.editable);
        }

        ui.separator();

        let mut user_defined = self.panel.is_user_defined();
        if ui.checkbox(&mut user_defined, "Defined by user").changed() {
            self.panel.set_user_defined(user_defined);
        }
        if ui.button("Mark not detected").clicked() {
            // Parks the marker at the fallback corner for manual placement
            self.panel.set_not_detected(true);
        }
        if self.panel.is_not_detected() {
            if ui.button("Clear not-detected flag").clicked() {
                self.panel.set_not_detected(false);
            }
        }
    }

    fn scale_controls(&mut self, ui: &mut egui::Ui) {
        if ui
            .checkbox(&mut self.ui_state.user_defined_scale, "Manual scale")
            .changed()
        {
            self.panel
                .set_user_defined_scale(self.ui_state.user_defined_scale);
            if self.ui_state.user_defined_scale {
                self.panel.set_resize_factor(self.ui_state.scale);
            }
        }

        if self.ui_state.user_defined_scale {
            ui.horizontal(|ui| {
                ui.label("Scale:");
                if ui
                    .add(
                        egui::DragValue::new(&mut self.ui_state.scale)
                            .speed(0.01)
                            .clamp_range(0.05..=8.0),
                    )
                    .changed()
                {
                    self.panel.set_resize_factor(self.ui_state.scale);
                }
            });
        } else {
            ui.label("Fitting image to panel");
        }
    }

    fn area_controls(&mut self, ui: &mut egui::Ui, ctx: &Context) {
        let mut changed = ui
            .checkbox(&mut self.ui_state.use_area, "Crop to sub-area")
            .changed();

        if self.ui_state.use_area {
            ui.horizontal(|ui| {
                ui.label("Origin:");
                changed |= ui
                    .add(egui::DragValue::new(&mut self.ui_state.area_x).speed(1.0))
                    .changed();
                changed |= ui
                    .add(egui::DragValue::new(&mut self.ui_state.area_y).speed(1.0))
                    .changed();
            });
            ui.horizontal(|ui| {
                ui.label("Size:");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut self.ui_state.area_width)
                            .speed(1.0)
                            .clamp_range(1..=16384),
                    )
                    .changed();
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut self.ui_state.area_height)
                            .speed(1.0)
                            .clamp_range(1..=16384),
                    )
                    .changed();
            });
        }

        if changed {
            self.refresh_panel_image(ctx);
        }
    }

    fn highlight_readout(&mut self, ui: &mut egui::Ui) {
        let coords = self.panel.get_highlight();
        ui.horizontal(|ui| {
            let coords_text = format!("({:.1}, {:.1})", coords[0], coords[1]);
            ui.label(coords_text.clone());
            if ui.button("Copy").clicked() {
                self.copy_to_clipboard(coords_text);
            }
        });
        if self.panel.is_dragging() {
            ui.label("Dragging…");
        }

        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Set:");
            ui.add(egui::DragValue::new(&mut self.ui_state.entry_x).speed(1.0));
            ui.add(egui::DragValue::new(&mut self.ui_state.entry_y).speed(1.0));
            if ui.button("Apply").clicked() {
                self.panel
                    .set_highlight([self.ui_state.entry_x, self.ui_state.entry_y]);
            }
        });
    }
}

// Implement the main update loop for the app
impl eframe::App for HighlightApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.ui_state);
    }

    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut style = (*ctx.style()).clone();
        if self.ui_state.dark_mode {
            style.visuals = egui::Visuals::dark();
        } else {
            style.visuals = egui::Visuals::light();
        }
        ctx.set_style(style);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Highlight Panel");
                ui.separator();
                if ui.button("Load Image…").clicked() {
                    self.open_image_dialog(ctx);
                }
                if ui.button("Clear Image").clicked() {
                    self.panel.clear_image();
                    self.source_image = None;
                    self.image_path = None;
                }
                ui.separator();
                ui.label("Scale:");
                let scale_percentage = (self.panel.get_resize_factor() * 100.0) as i32;
                ui.label(format!("{}%", scale_percentage));
                if !self.status.is_empty() {
                    ui.separator();
                    ui.colored_label(egui::Color32::RED, &self.status);
                }
            });
        });

        egui::SidePanel::right("settings_panel")
            .resizable(true)
            .default_width(250.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.heading("Settings");
                    ui.separator();

                    ui.collapsing("Marker", |ui| {
                        self.marker_controls(ui);
                    });

                    ui.collapsing("Scale", |ui| {
                        self.scale_controls(ui);
                    });

                    ui.collapsing("Sub-area", |ui| {
                        self.area_controls(ui, ctx);
                    });

                    ui.separator();

                    ui.heading("Highlight");
                    self.highlight_readout(ui);

                    ui.separator();

                    ui.collapsing("Appearance", |ui| {
                        ui.checkbox(&mut self.ui_state.dark_mode, "Dark Mode");
                    });

                    ui.collapsing("Help", |ui| {
                        ui.label("• Drag the crosshair to reposition the highlight");
                        ui.label("• Double-click to place it directly, even when dragging is off");
                        ui.label("• 'Mark not detected' parks the marker at the fallback corner");
                        ui.label("• Coordinates are reported in full-image space");
                        ui.label("• Crop to a sub-area to mark a highlight inside a larger image");
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.panel.has_image() {
                egui::ScrollArea::both().show(ui, |ui| {
                    self.panel.show(ui);
                });
            } else {
                ui.centered_and_justified(|ui| {
                    ui.label("Load an image to place the highlight");
                });
            }
        });

        ctx.request_repaint();
    }
}
