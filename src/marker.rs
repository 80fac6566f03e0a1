use egui::{Pos2, Vec2};

// Screen-space hit box (pixels) for grabbing the marker with the mouse
pub const HIT_RADIUS: f32 = 5.0;

// Where the marker is parked when detection failed, so the user can still
// see it and drag it somewhere sensible
const FALLBACK_POS: Pos2 = Pos2::new(5.0, 5.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging,
}

pub struct HighlightMarker {
    position: Pos2,    // Area-relative model coordinates
    area_offset: Vec2, // Origin of the sub-area within the full image
    drag_state: DragState,
    not_detected: bool,
    user_defined: bool,
}

impl HighlightMarker {
    pub fn new() -> Self {
        Self {
            position: Pos2::ZERO,
            area_offset: Vec2::ZERO,
            drag_state: DragState::Idle,
            not_detected: false,
            user_defined: false,
        }
    }

    pub fn get_position(&self) -> Pos2 {
        self.position
    }

    pub fn set_position(&mut self, position: Pos2) {
        self.position = position;
    }

    /// Marker position translated into full-image coordinates
    pub fn get_highlight(&self) -> [f32; 2] {
        [
            self.position.x + self.area_offset.x,
            self.position.y + self.area_offset.y,
        ]
    }

    /// Accepts full-image coordinates, stored area-relative
    pub fn set_highlight(&mut self, coords: [f32; 2]) {
        self.position = Pos2::new(
            coords[0] - self.area_offset.x,
            coords[1] - self.area_offset.y,
        );
    }

    pub fn set_area_offset(&mut self, x: f32, y: f32) {
        self.area_offset = Vec2::new(x, y);
    }

    // Always resets the position, even when called with false; callers rely
    // on the fallback marker appearing as soon as detection results land
    pub fn set_not_detected(&mut self, not_detected: bool) {
        self.not_detected = not_detected;
        self.position = FALLBACK_POS;
    }

    pub fn is_not_detected(&self) -> bool {
        self.not_detected
    }

    pub fn set_user_defined(&mut self, user_defined: bool) {
        self.user_defined = user_defined;
    }

    pub fn is_user_defined(&self) -> bool {
        self.user_defined
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_state == DragState::Dragging
    }

    // Pointer press in model coordinates. Grabs the marker when the pointer
    // lands within HIT_RADIUS screen pixels of it on each axis (a square
    // hit box, tested per axis, not a circular radius)
    pub fn press(&mut self, pointer: Pos2, scale: f32) -> bool {
        let dx = (self.position.x - pointer.x) * scale;
        let dy = (self.position.y - pointer.y) * scale;
        if dx.abs() < HIT_RADIUS && dy.abs() < HIT_RADIUS {
            self.position = pointer;
            self.drag_state = DragState::Dragging;
            true
        } else {
            false
        }
    }

    pub fn drag_to(&mut self, pointer: Pos2) {
        if self.drag_state == DragState::Dragging {
            self.position = pointer;
        }
    }

    pub fn release(&mut self, pointer: Pos2) {
        if self.drag_state == DragState::Dragging {
            self.position = pointer;
        }
        self.drag_state = DragState::Idle;
    }

    // Double-click path: reposition without any hit test
    pub fn relocate(&mut self, pointer: Pos2) {
        self.position = pointer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_round_trips_through_area_offset() {
        let mut marker = HighlightMarker::new();
        marker.set_area_offset(120.0, 45.0);
        marker.set_highlight([300.5, 210.25]);

        let coords = marker.get_highlight();
        assert_eq!(coords, [300.5, 210.25]);
        // Stored relative to the area origin
        assert_eq!(marker.get_position(), Pos2::new(180.5, 165.25));
    }

    #[test]
    fn not_detected_forces_fallback_position() {
        let mut marker = HighlightMarker::new();
        marker.set_position(Pos2::new(80.0, 90.0));
        marker.set_not_detected(true);

        assert!(marker.is_not_detected());
        assert_eq!(marker.get_position(), Pos2::new(5.0, 5.0));

        // Clearing the flag resets the position too
        marker.set_position(Pos2::new(33.0, 44.0));
        marker.set_not_detected(false);
        assert_eq!(marker.get_position(), Pos2::new(5.0, 5.0));
    }

    #[test]
    fn press_near_marker_starts_drag_and_snaps() {
        let mut marker = HighlightMarker::new();
        marker.set_position(Pos2::new(50.0, 50.0));

        // 2 model units at scale 2.0 is 4 screen pixels, inside the hit box
        assert!(marker.press(Pos2::new(52.0, 48.0), 2.0));
        assert!(marker.is_dragging());
        assert_eq!(marker.get_position(), Pos2::new(52.0, 48.0));
    }

    #[test]
    fn press_far_from_marker_is_ignored() {
        let mut marker = HighlightMarker::new();
        marker.set_position(Pos2::new(50.0, 50.0));

        assert!(!marker.press(Pos2::new(80.0, 50.0), 1.0));
        assert!(!marker.is_dragging());
        assert_eq!(marker.get_position(), Pos2::new(50.0, 50.0));
    }

    #[test]
    fn hit_test_uses_screen_pixels_not_model_units() {
        let mut marker = HighlightMarker::new();
        marker.set_position(Pos2::new(50.0, 50.0));

        // 4 model units away, but at scale 2.0 that is 8 screen pixels
        assert!(!marker.press(Pos2::new(54.0, 50.0), 2.0));
        // Same model distance at scale 1.0 lands inside the box
        assert!(marker.press(Pos2::new(54.0, 50.0), 1.0));
    }

    #[test]
    fn drag_follows_pointer_and_release_finalizes() {
        let mut marker = HighlightMarker::new();
        marker.set_position(Pos2::new(10.0, 10.0));
        assert!(marker.press(Pos2::new(11.0, 11.0), 1.0));

        marker.drag_to(Pos2::new(30.0, 40.0));
        assert_eq!(marker.get_position(), Pos2::new(30.0, 40.0));

        marker.release(Pos2::new(31.0, 41.0));
        assert!(!marker.is_dragging());
        assert_eq!(marker.get_position(), Pos2::new(31.0, 41.0));
    }

    #[test]
    fn drag_without_press_does_nothing() {
        let mut marker = HighlightMarker::new();
        marker.set_position(Pos2::new(10.0, 10.0));

        marker.drag_to(Pos2::new(60.0, 60.0));
        assert_eq!(marker.get_position(), Pos2::new(10.0, 10.0));
    }

    #[test]
    fn relocate_moves_marker_without_hit_test() {
        let mut marker = HighlightMarker::new();
        marker.set_position(Pos2::new(5.0, 5.0));

        marker.relocate(Pos2::new(200.0, 150.0));
        assert_eq!(marker.get_position(), Pos2::new(200.0, 150.0));
        assert!(!marker.is_dragging());
    }
}
