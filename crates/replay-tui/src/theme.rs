use crossterm::style::Color;

/// Color theme for the trace viewer
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Grid border color
    pub border: Color,
    /// Box border color (thicker 3x3 separators)
    pub box_border: Color,
    /// Given (puzzle) cell color
    pub given: Color,
    /// Singleton inferred by propagation
    pub inferred: Color,
    /// Tentative search assignment (overlay)
    pub assigned: Color,
    /// Candidate pencil-mark color
    pub candidate: Color,
    /// Cell touched by the current event
    pub active_bg: Color,
    /// Cell that caused the current event (arc target)
    pub cause_bg: Color,
    /// Degraded/error color
    pub error: Color,
    /// Info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
    /// Highlighted step row in the step list
    pub step_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            box_border: Color::Rgb { r: 130, g: 140, b: 170 },
            given: Color::Rgb { r: 255, g: 255, b: 255 },
            inferred: Color::Rgb { r: 190, g: 120, b: 255 },
            assigned: Color::Rgb { r: 80, g: 180, b: 255 },
            candidate: Color::Rgb { r: 140, g: 150, b: 180 },
            active_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            cause_bg: Color::Rgb { r: 45, g: 55, b: 80 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
            step_bg: Color::Rgb { r: 50, g: 60, b: 90 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 180, g: 180, b: 195 },
            box_border: Color::Rgb { r: 60, g: 60, b: 80 },
            given: Color::Rgb { r: 0, g: 0, b: 0 },
            inferred: Color::Rgb { r: 140, g: 60, b: 200 },
            assigned: Color::Rgb { r: 30, g: 100, b: 200 },
            candidate: Color::Rgb { r: 130, g: 130, b: 150 },
            active_bg: Color::Rgb { r: 180, g: 200, b: 255 },
            cause_bg: Color::Rgb { r: 220, g: 226, b: 245 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
            step_bg: Color::Rgb { r: 205, g: 215, b: 240 },
        }
    }
}
