use serde::{Deserialize, Serialize};

// Host-shell settings, persisted across sessions through eframe storage
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
    // Marker settings
    pub draw_marker: bool,
    pub editable: bool,

    // Scale settings
    pub user_defined_scale: bool,
    pub scale: f32,

    // Sub-area crop applied to the loaded image
    pub use_area: bool,
    pub area_x: u32,
    pub area_y: u32,
    pub area_width: u32,
    pub area_height: u32,

    // Manual coordinate entry, in full-image coordinates
    pub entry_x: f32,
    pub entry_y: f32,

    pub dark_mode: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            draw_marker: true,
            editable: true,
            user_defined_scale: true,
            scale: 1.0,
            use_area: false,
            area_x: 0,
            area_y: 0,
            area_width: 400,
            area_height: 300,
            entry_x: 0.0,
            entry_y: 0.0,
            dark_mode: true,
        }
    }
}
