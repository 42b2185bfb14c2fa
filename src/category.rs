//! Color coding for AQI categories.

/// Background used for categories outside the standard scale.
pub const DEFAULT_COLOR: Rgb = Rgb(0xFF, 0xFF, 0xFF);

/// Plain RGB triple so the palette stays independent of the UI toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Black or white, whichever reads better on this background.
    pub fn contrasting_text(self) -> Rgb {
        let Rgb(r, g, b) = self;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        if luma > 140.0 {
            Rgb(0, 0, 0)
        } else {
            Rgb(0xFF, 0xFF, 0xFF)
        }
    }

    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Background color for a category label.
pub fn category_color(category: &str) -> Rgb {
    match category {
        "Good" => Rgb(0x00, 0xFF, 0x00),
        "Moderate" => Rgb(0xFF, 0xFF, 0x00),
        "Unhealthy for Sensitive Groups" => Rgb(0xFF, 0xA5, 0x00),
        "Unhealthy" => Rgb(0xFF, 0x00, 0x00),
        "Very Unhealthy" => Rgb(0x80, 0x00, 0x80),
        "Hazardous" => Rgb(0x8B, 0x00, 0x00),
        _ => DEFAULT_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_categories_map_to_scale_colors() {
        assert_eq!(category_color("Good").hex(), "#00FF00");
        assert_eq!(category_color("Unhealthy for Sensitive Groups").hex(), "#FFA500");
        assert_eq!(category_color("Hazardous").hex(), "#8B0000");
        assert_eq!(category_color("good"), DEFAULT_COLOR);
    }

    #[test]
    fn text_contrasts_with_background() {
        assert_eq!(category_color("Moderate").contrasting_text(), Rgb(0, 0, 0));
        assert_eq!(category_color("Very Unhealthy").contrasting_text(), Rgb(255, 255, 255));
        assert_eq!(DEFAULT_COLOR.contrasting_text(), Rgb(0, 0, 0));
    }
}
