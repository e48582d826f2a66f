//! Core types for the MKAI app
//!
//! UI-side state that wraps the session controller, plus the color palette.

use crate::controller::SessionController;

/// Main application state
pub struct AppState {
    pub controller: SessionController,
    /// Chat input line
    pub input_text: String,
    /// Sidebar search field
    pub search_text: String,
    /// Jump the transcript to the newest entry on the next frame
    pub scroll_to_bottom: bool,
}

impl AppState {
    pub fn new(controller: SessionController) -> Self {
        Self {
            controller,
            input_text: String::new(),
            search_text: String::new(),
            scroll_to_bottom: true,
        }
    }
}

pub mod palette {
    use eframe::egui::Color32;

    pub const BG_PRIMARY: Color32 = Color32::from_rgb(0x0D, 0x0D, 0x0D);
    pub const BG_SECONDARY: Color32 = Color32::from_rgb(0x16, 0x16, 0x16);
    pub const BG_TERTIARY: Color32 = Color32::from_rgb(0x1F, 0x1F, 0x1F);
    pub const TEXT_PRIMARY: Color32 = Color32::WHITE;
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0x88, 0x88, 0x88);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(0x55, 0x55, 0x55);
    pub const HIGHLIGHT: Color32 = Color32::from_rgb(0x3B, 0x82, 0xF6);
    pub const SUCCESS: Color32 = Color32::from_rgb(0x22, 0xC5, 0x5E);
    pub const BORDER: Color32 = Color32::from_rgb(0x2A, 0x2A, 0x2A);
}
