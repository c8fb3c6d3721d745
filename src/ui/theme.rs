use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Theme color palette defining all colors used in the console.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    // Primary colors
    pub primary: ColorSpec,
    pub secondary: ColorSpec,
    pub accent: ColorSpec,
    pub banner: ColorSpec,

    // Text colors
    pub text: ColorSpec,
    pub text_secondary: ColorSpec,
    pub text_muted: ColorSpec,

    // Background colors
    pub background: ColorSpec,
    pub surface: ColorSpec,

    // Status colors
    pub success: ColorSpec,
    pub warning: ColorSpec,
    pub error: ColorSpec,
    pub info: ColorSpec,

    // UI element colors
    pub border_active: ColorSpec,
    pub border_normal: ColorSpec,
    pub highlight_bg: ColorSpec,
    pub highlight_fg: ColorSpec,

    // Footer mode colors
    pub footer_normal: ColorSpec,
    pub footer_designer: ColorSpec,
    pub footer_preview: ColorSpec,
    pub footer_input: ColorSpec,
    pub footer_confirm: ColorSpec,
    pub footer_log: ColorSpec,
}

/// Color specification that can be serialized/deserialized.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSpec {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        ColorSpec { r, g, b }
    }

    pub fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

/// Default theme (Civic Light).
///
impl Default for Theme {
    fn default() -> Self {
        Theme::civic_light()
    }
}

impl Theme {
    /// Civic Light theme, the blue-on-white palette of the admin console.
    ///
    pub fn civic_light() -> Self {
        Theme {
            name: "civic-light".to_string(),
            primary: ColorSpec::rgb(37, 99, 235),     // Blue 600
            secondary: ColorSpec::rgb(79, 70, 229),   // Indigo 600
            accent: ColorSpec::rgb(234, 88, 12),      // Orange 600
            banner: ColorSpec::rgb(37, 99, 235),
            text: ColorSpec::rgb(30, 41, 59),         // Slate 800
            text_secondary: ColorSpec::rgb(71, 85, 105),
            text_muted: ColorSpec::rgb(148, 163, 184),
            background: ColorSpec::rgb(248, 250, 252),
            surface: ColorSpec::rgb(255, 255, 255),
            success: ColorSpec::rgb(22, 163, 74),
            warning: ColorSpec::rgb(217, 119, 6),
            error: ColorSpec::rgb(220, 38, 38),
            info: ColorSpec::rgb(14, 165, 233),
            border_active: ColorSpec::rgb(37, 99, 235),
            border_normal: ColorSpec::rgb(203, 213, 225),
            highlight_bg: ColorSpec::rgb(219, 234, 254),
            highlight_fg: ColorSpec::rgb(30, 64, 175),
            footer_normal: ColorSpec::rgb(191, 219, 254),
            footer_designer: ColorSpec::rgb(199, 210, 254),
            footer_preview: ColorSpec::rgb(187, 247, 208),
            footer_input: ColorSpec::rgb(254, 240, 138),
            footer_confirm: ColorSpec::rgb(254, 202, 202),
            footer_log: ColorSpec::rgb(226, 232, 240),
        }
    }

    /// Civic Dark theme.
    ///
    pub fn civic_dark() -> Self {
        Theme {
            name: "civic-dark".to_string(),
            primary: ColorSpec::rgb(96, 165, 250),
            secondary: ColorSpec::rgb(129, 140, 248),
            accent: ColorSpec::rgb(251, 146, 60),
            banner: ColorSpec::rgb(96, 165, 250),
            text: ColorSpec::rgb(226, 232, 240),
            text_secondary: ColorSpec::rgb(148, 163, 184),
            text_muted: ColorSpec::rgb(100, 116, 139),
            background: ColorSpec::rgb(15, 23, 42),
            surface: ColorSpec::rgb(30, 41, 59),
            success: ColorSpec::rgb(74, 222, 128),
            warning: ColorSpec::rgb(251, 191, 36),
            error: ColorSpec::rgb(248, 113, 113),
            info: ColorSpec::rgb(56, 189, 248),
            border_active: ColorSpec::rgb(96, 165, 250),
            border_normal: ColorSpec::rgb(51, 65, 85),
            highlight_bg: ColorSpec::rgb(30, 58, 138),
            highlight_fg: ColorSpec::rgb(219, 234, 254),
            footer_normal: ColorSpec::rgb(30, 58, 138),
            footer_designer: ColorSpec::rgb(55, 48, 163),
            footer_preview: ColorSpec::rgb(20, 83, 45),
            footer_input: ColorSpec::rgb(113, 63, 18),
            footer_confirm: ColorSpec::rgb(127, 29, 29),
            footer_log: ColorSpec::rgb(51, 65, 85),
        }
    }

    /// Jade theme.
    ///
    pub fn jade() -> Self {
        Theme {
            name: "jade".to_string(),
            primary: ColorSpec::rgb(5, 150, 105),
            secondary: ColorSpec::rgb(13, 148, 136),
            accent: ColorSpec::rgb(202, 138, 4),
            banner: ColorSpec::rgb(5, 150, 105),
            text: ColorSpec::rgb(20, 45, 40),
            text_secondary: ColorSpec::rgb(55, 90, 80),
            text_muted: ColorSpec::rgb(120, 150, 140),
            background: ColorSpec::rgb(240, 253, 244),
            surface: ColorSpec::rgb(255, 255, 255),
            success: ColorSpec::rgb(22, 163, 74),
            warning: ColorSpec::rgb(202, 138, 4),
            error: ColorSpec::rgb(190, 18, 60),
            info: ColorSpec::rgb(8, 145, 178),
            border_active: ColorSpec::rgb(5, 150, 105),
            border_normal: ColorSpec::rgb(187, 220, 205),
            highlight_bg: ColorSpec::rgb(209, 250, 229),
            highlight_fg: ColorSpec::rgb(6, 95, 70),
            footer_normal: ColorSpec::rgb(167, 243, 208),
            footer_designer: ColorSpec::rgb(153, 246, 228),
            footer_preview: ColorSpec::rgb(217, 249, 157),
            footer_input: ColorSpec::rgb(254, 240, 138),
            footer_confirm: ColorSpec::rgb(254, 205, 211),
            footer_log: ColorSpec::rgb(220, 235, 228),
        }
    }

    /// Slate theme, a low-contrast dark palette.
    ///
    pub fn slate() -> Self {
        Theme {
            name: "slate".to_string(),
            primary: ColorSpec::rgb(165, 180, 252),
            secondary: ColorSpec::rgb(125, 211, 252),
            accent: ColorSpec::rgb(253, 186, 116),
            banner: ColorSpec::rgb(165, 180, 252),
            text: ColorSpec::rgb(203, 213, 225),
            text_secondary: ColorSpec::rgb(148, 163, 184),
            text_muted: ColorSpec::rgb(100, 116, 139),
            background: ColorSpec::rgb(24, 24, 27),
            surface: ColorSpec::rgb(39, 39, 42),
            success: ColorSpec::rgb(134, 239, 172),
            warning: ColorSpec::rgb(253, 224, 71),
            error: ColorSpec::rgb(252, 165, 165),
            info: ColorSpec::rgb(125, 211, 252),
            border_active: ColorSpec::rgb(165, 180, 252),
            border_normal: ColorSpec::rgb(63, 63, 70),
            highlight_bg: ColorSpec::rgb(63, 63, 70),
            highlight_fg: ColorSpec::rgb(224, 231, 255),
            footer_normal: ColorSpec::rgb(55, 48, 163),
            footer_designer: ColorSpec::rgb(67, 56, 202),
            footer_preview: ColorSpec::rgb(21, 128, 61),
            footer_input: ColorSpec::rgb(133, 77, 14),
            footer_confirm: ColorSpec::rgb(153, 27, 27),
            footer_log: ColorSpec::rgb(63, 63, 70),
        }
    }

    /// Get theme by name.
    ///
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "civic-light" => Some(Self::civic_light()),
            "civic-dark" => Some(Self::civic_dark()),
            "jade" => Some(Self::jade()),
            "slate" => Some(Self::slate()),
            _ => None,
        }
    }

    /// Get list of all available theme names.
    ///
    pub fn available_themes() -> Vec<String> {
        vec![
            "civic-light".to_string(),
            "civic-dark".to_string(),
            "jade".to_string(),
            "slate".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_theme_resolves() {
        for name in Theme::available_themes() {
            let theme = Theme::from_name(&name).unwrap();
            assert_eq!(theme.name, name);
        }
        assert!(Theme::from_name("rose-pine").is_none());
    }

    #[test]
    fn test_default_theme() {
        assert_eq!(Theme::default().name, "civic-light");
        assert_eq!(
            ColorSpec::rgb(1, 2, 3).to_color(),
            Color::Rgb(1, 2, 3)
        );
    }
}
