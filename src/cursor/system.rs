use serde::{Deserialize, Serialize};

/// Cursors provided by the browser or OS without custom images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemCursor {
    Arrow,
    Ibeam,
    Crosshair,
    Hand,
    HorizontalResize,
    VerticalResize,
    NWSEResize,
    NESWResize,
    AllResize,
    NotAllowed,
    None,
}

impl SystemCursor {
    pub const ALL: [SystemCursor; 11] = [
        SystemCursor::Arrow,
        SystemCursor::Ibeam,
        SystemCursor::Crosshair,
        SystemCursor::Hand,
        SystemCursor::HorizontalResize,
        SystemCursor::VerticalResize,
        SystemCursor::NWSEResize,
        SystemCursor::NESWResize,
        SystemCursor::AllResize,
        SystemCursor::NotAllowed,
        SystemCursor::None,
    ];

    /// CSS `cursor` keyword for this cursor.
    pub fn css_name(self) -> &'static str {
        match self {
            SystemCursor::Arrow => "default",
            SystemCursor::Ibeam => "text",
            SystemCursor::Crosshair => "crosshair",
            // not "hand", which only old IE understood
            SystemCursor::Hand => "pointer",
            SystemCursor::HorizontalResize => "ew-resize",
            SystemCursor::VerticalResize => "ns-resize",
            SystemCursor::NWSEResize => "nwse-resize",
            SystemCursor::NESWResize => "nesw-resize",
            SystemCursor::AllResize => "move",
            SystemCursor::NotAllowed => "not-allowed",
            SystemCursor::None => "none",
        }
    }
}
