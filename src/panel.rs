use crate::display::ImageDisplay;
use crate::marker::HighlightMarker;
use egui::{Color32, ColorImage, Context, Painter, Pos2, Rect, Response, Sense, Stroke, Ui};

const STATUS_NOT_DEFINED: &str = "Highlight not defined";
const STATUS_USER_DEFINED: &str = "Highlight defined by user";

// Crosshair arm radius in screen pixels; only the outer pixel of each arm
// is drawn, leaving a gap at the center
const CROSS_RADIUS: f32 = 2.0;

/// Image preview panel with an editable highlight marker.
///
/// Displays an image and overlays a crosshair denoting the detected or
/// user-specified reflective point. The marker can be repositioned with the
/// mouse when editing is enabled; a double-click repositions it regardless.
/// Coordinates are stored relative to a sub-area origin set with
/// [`set_image_location`](Self::set_image_location) and translated to
/// full-image coordinates at the accessors.
pub struct HighlightPanel {
    display: ImageDisplay,
    marker: HighlightMarker,
    enable_draw: bool,
    editable: bool,
}

// Everything the overlay pass would draw for one frame. Computed separately
// from painting so the paint decisions stay observable in tests.
pub struct MarkerOverlay {
    pub status: Option<&'static str>,
    pub arms: [[Pos2; 2]; 4],
}

impl HighlightPanel {
    // Default panel: no image, editable, drawing enabled, user-driven scale
    pub fn new() -> Self {
        Self {
            display: ImageDisplay::new(),
            marker: HighlightMarker::new(),
            enable_draw: true,
            editable: true,
        }
    }

    // Panel with an image, an initial marker position in image coordinates,
    // a scale factor and the initial draw flag
    pub fn with_image(
        ctx: &Context,
        image: ColorImage,
        center: [f32; 2],
        scale: f32,
        enable_draw: bool,
    ) -> Self {
        let mut panel = Self::new();
        panel.display.set_image(ctx, "highlight_panel", image);
        panel.display.set_resize_factor(scale);
        panel.marker.set_highlight(center);
        panel.enable_draw = enable_draw;
        panel
    }

    pub fn enable_highlight_draw(&mut self, enable: bool) {
        self.enable_draw = enable;
    }

    pub fn is_draw_enabled(&self) -> bool {
        self.enable_draw
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Marker position in full-image coordinates
    pub fn get_highlight(&self) -> [f32; 2] {
        self.marker.get_highlight()
    }

    /// Set the marker from full-image coordinates
    pub fn set_highlight(&mut self, coords: [f32; 2]) {
        self.marker.set_highlight(coords);
    }

    /// Set the origin of the image sub-area the marker lives in
    pub fn set_image_location(&mut self, x: i32, y: i32) {
        self.marker.set_area_offset(x as f32, y as f32);
    }

    /// Record a detection result. `true` parks the marker at the fallback
    /// position so the user can place it by hand.
    pub fn set_not_detected(&mut self, not_detected: bool) {
        self.marker.set_not_detected(not_detected);
    }

    pub fn is_not_detected(&self) -> bool {
        self.marker.is_not_detected()
    }

    /// Record whether the current position was set manually
    pub fn set_user_defined(&mut self, user_defined: bool) {
        self.marker.set_user_defined(user_defined);
    }

    pub fn is_user_defined(&self) -> bool {
        self.marker.is_user_defined()
    }

    pub fn set_image(&mut self, ctx: &Context, name: &str, image: ColorImage) {
        self.display.set_image(ctx, name, image);
    }

    pub fn clear_image(&mut self) {
        self.display.clear_image();
    }

    pub fn has_image(&self) -> bool {
        self.display.has_image()
    }

    pub fn get_resize_factor(&self) -> f32 {
        self.display.get_resize_factor()
    }

    pub fn set_resize_factor(&mut self, factor: f32) {
        self.display.set_resize_factor(factor);
    }

    pub fn set_user_defined_scale(&mut self, user_defined: bool) {
        self.display.set_user_defined_scale(user_defined);
    }

    pub fn is_user_defined_scale(&self) -> bool {
        self.display.is_user_defined_scale()
    }

    // Pointer press at a panel-local position; starts a drag when editing
    // is enabled and the pointer lands on the marker
    pub fn pointer_pressed(&mut self, pos: Pos2) {
        if !self.editable {
            return;
        }
        let model = self.display.screen_to_model(pos);
        self.marker.press(model, self.display.get_resize_factor());
    }

    pub fn pointer_dragged(&mut self, pos: Pos2) {
        self.marker.drag_to(self.display.screen_to_model(pos));
    }

    pub fn pointer_released(&mut self, pos: Pos2) {
        self.marker.release(self.display.screen_to_model(pos));
    }

    // Double-click relocates the marker unconditionally, skipping the
    // editable check; hosts use it as a shortcut for placing an
    // undetected highlight.
    pub fn double_clicked(&mut self, pos: Pos2) {
        self.marker.relocate(self.display.screen_to_model(pos));
    }

    pub fn is_dragging(&self) -> bool {
        self.marker.is_dragging()
    }

    /// Lay out the panel, route pointer events and paint the image with the
    /// marker overlay
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        let available = ui.available_size();
        self.display.update_scale(available);

        let desired = if self.display.has_image() {
            self.display.scaled_size()
        } else {
            available
        };
        let (response, painter) = ui.allocate_painter(desired, Sense::click_and_drag());
        let rect = response.rect;

        if let Some(pointer) = response.interact_pointer_pos() {
            let local = (pointer - rect.min).to_pos2();
            if response.drag_started() {
                self.pointer_pressed(local);
            } else if response.dragged() {
                self.pointer_dragged(local);
            }
            // Release runs before the double-click relocation so a
            // double-click that grabbed the marker still ends up Idle
            if response.drag_released() {
                self.pointer_released(local);
            }
            if response.double_clicked() {
                self.double_clicked(local);
            }
        }

        self.paint(&painter, rect);
        response
    }

    // The overlay drawn on top of the image this frame, in panel-local
    // coordinates. None when there is no image or drawing is disabled.
    pub fn overlay(&self) -> Option<MarkerOverlay> {
        if !self.display.has_image() || !self.enable_draw {
            return None;
        }

        let status = if self.marker.is_not_detected() {
            Some(STATUS_NOT_DEFINED)
        } else if self.marker.is_user_defined() {
            Some(STATUS_USER_DEFINED)
        } else {
            None
        };

        // Center of the marker pixel in screen space
        let factor = self.display.get_resize_factor();
        let center = self.marker.get_position();
        let x = (center.x * factor + 0.5 * factor).round();
        let y = (center.y * factor + 0.5 * factor).round();

        let r = CROSS_RADIUS;
        let arms = [
            [Pos2::new(x, y - r), Pos2::new(x, y - 1.0)],
            [Pos2::new(x, y + r), Pos2::new(x, y + 1.0)],
            [Pos2::new(x - r, y), Pos2::new(x - 1.0, y)],
            [Pos2::new(x + r, y), Pos2::new(x + 1.0, y)],
        ];

        Some(MarkerOverlay { status, arms })
    }

    fn paint(&self, painter: &Painter, rect: Rect) {
        let Some(texture) = self.display.get_texture() else {
            // No image yet; draw nothing this frame
            return;
        };

        let image_rect = Rect::from_min_size(rect.min, self.display.scaled_size());
        let uv = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0));
        painter.image(texture.id(), image_rect, uv, Color32::WHITE);

        let Some(overlay) = self.overlay() else {
            return;
        };

        if let Some(status) = overlay.status {
            painter.text(
                Pos2::new(rect.min.x + 20.0, rect.max.y - 20.0),
                egui::Align2::LEFT_BOTTOM,
                status,
                egui::FontId::default(),
                Color32::RED,
            );
        }

        let stroke = Stroke::new(1.0, Color32::RED);
        let offset = rect.min.to_vec2();
        for [a, b] in overlay.arms {
            painter.line_segment([a + offset, b + offset], stroke);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Vec2;

    // Stand in for a loaded image without an egui context
    fn panel_with_image_size(width: f32, height: f32) -> HighlightPanel {
        let mut panel = HighlightPanel::new();
        panel.display.set_test_image(Vec2::new(width, height));
        panel
    }

    #[test]
    fn defaults_are_editable_and_drawing() {
        let panel = HighlightPanel::new();
        assert!(panel.is_editable());
        assert!(panel.is_draw_enabled());
        assert!(panel.is_user_defined_scale());
        assert_eq!(panel.get_resize_factor(), 1.0);
    }

    #[test]
    fn highlight_round_trip_with_image_location() {
        let mut panel = HighlightPanel::new();
        panel.set_image_location(40, 60);
        panel.set_highlight([100.0, 120.0]);
        assert_eq!(panel.get_highlight(), [100.0, 120.0]);
    }

    #[test]
    fn press_respects_editable_flag() {
        let mut panel = HighlightPanel::new();
        panel.set_highlight([50.0, 50.0]);

        panel.set_editable(false);
        panel.pointer_pressed(Pos2::new(51.0, 51.0));
        assert!(!panel.is_dragging());

        panel.set_editable(true);
        panel.pointer_pressed(Pos2::new(51.0, 51.0));
        assert!(panel.is_dragging());
    }

    #[test]
    fn press_converts_screen_to_model_with_scale() {
        let mut panel = HighlightPanel::new();
        panel.set_resize_factor(2.0);
        panel.set_highlight([50.0, 50.0]);

        // Screen (102, 98) is model (51, 49), 2 screen px off the marker
        panel.pointer_pressed(Pos2::new(102.0, 98.0));
        assert!(panel.is_dragging());
        assert_eq!(panel.get_highlight(), [51.0, 49.0]);
    }

    #[test]
    fn drag_and_release_finalize_in_model_coordinates() {
        let mut panel = HighlightPanel::new();
        panel.set_resize_factor(2.0);
        panel.set_highlight([10.0, 10.0]);

        panel.pointer_pressed(Pos2::new(20.0, 20.0));
        panel.pointer_dragged(Pos2::new(60.0, 80.0));
        assert_eq!(panel.get_highlight(), [30.0, 40.0]);

        panel.pointer_released(Pos2::new(62.0, 84.0));
        assert!(!panel.is_dragging());
        assert_eq!(panel.get_highlight(), [31.0, 42.0]);
    }

    #[test]
    fn double_click_bypasses_editable_flag() {
        let mut panel = HighlightPanel::new();
        panel.set_resize_factor(2.0);
        panel.set_editable(false);

        panel.double_clicked(Pos2::new(90.0, 60.0));
        assert_eq!(panel.get_highlight(), [45.0, 30.0]);
    }

    #[test]
    fn overlay_is_empty_when_draw_disabled() {
        let mut panel = panel_with_image_size(200.0, 200.0);
        panel.enable_highlight_draw(false);
        assert!(panel.overlay().is_none());
    }

    #[test]
    fn overlay_is_empty_without_image() {
        let panel = HighlightPanel::new();
        assert!(panel.overlay().is_none());
    }

    #[test]
    fn overlay_status_prefers_not_detected() {
        let mut panel = panel_with_image_size(200.0, 200.0);
        assert!(panel.overlay().unwrap().status.is_none());

        panel.set_user_defined(true);
        assert_eq!(panel.overlay().unwrap().status, Some(STATUS_USER_DEFINED));

        panel.set_not_detected(true);
        assert_eq!(panel.overlay().unwrap().status, Some(STATUS_NOT_DEFINED));
    }

    #[test]
    fn overlay_crosshair_is_scaled_with_center_gap() {
        let mut panel = panel_with_image_size(200.0, 200.0);
        panel.set_resize_factor(2.0);
        panel.set_highlight([10.0, 20.0]);

        let overlay = panel.overlay().unwrap();
        // Center of the marker pixel: 10 * 2 + 1 = 21, 20 * 2 + 1 = 41
        assert_eq!(
            overlay.arms[0],
            [Pos2::new(21.0, 39.0), Pos2::new(21.0, 40.0)]
        );
        assert_eq!(
            overlay.arms[1],
            [Pos2::new(21.0, 43.0), Pos2::new(21.0, 42.0)]
        );
        assert_eq!(
            overlay.arms[2],
            [Pos2::new(19.0, 41.0), Pos2::new(20.0, 41.0)]
        );
        assert_eq!(
            overlay.arms[3],
            [Pos2::new(23.0, 41.0), Pos2::new(22.0, 41.0)]
        );
    }
}
