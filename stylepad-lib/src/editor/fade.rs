//! Edge fade controls for carousels: a horizontal mask gradient.

use std::fmt;

/// Upper bound of either slider, in percent.
pub const FADE_MAX: u8 = 40;
const FADE_DEFAULT: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadePreset {
    None,
    Subtle,
    Medium,
    Strong,
}

impl FadePreset {
    pub fn amount(self) -> u8 {
        match self {
            FadePreset::None => 0,
            FadePreset::Subtle => 5,
            FadePreset::Medium => 10,
            FadePreset::Strong => 20,
        }
    }

    /// Looks a preset up by its button name; anything unknown is `Medium`.
    pub fn from_name(name: &str) -> FadePreset {
        match name {
            "none" => FadePreset::None,
            "subtle" => FadePreset::Subtle,
            "strong" => FadePreset::Strong,
            _ => FadePreset::Medium,
        }
    }
}

impl fmt::Display for FadePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FadePreset::None => "none",
            FadePreset::Subtle => "subtle",
            FadePreset::Medium => "medium",
            FadePreset::Strong => "strong",
        })
    }
}

/// Slider positions plus the highlighted preset button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeControls {
    pub left: u8,
    pub right: u8,
    pub active_preset: Option<FadePreset>,
}

impl Default for FadeControls {
    fn default() -> Self {
        FadeControls {
            left: FADE_DEFAULT,
            right: FADE_DEFAULT,
            active_preset: None,
        }
    }
}

impl FadeControls {
    pub fn set_left(&mut self, percent: u8) {
        self.left = percent.min(FADE_MAX);
    }

    pub fn set_right(&mut self, percent: u8) {
        self.right = percent.min(FADE_MAX);
    }

    pub fn apply_preset(&mut self, preset: FadePreset) {
        self.left = preset.amount();
        self.right = preset.amount();
        self.active_preset = Some(preset);
    }

    pub fn gradient(&self) -> String {
        fade_gradient(self.left, self.right)
    }
}

/// Mask that fades `left`% in from the left edge and `right`% out at the right.
pub fn fade_gradient(left: u8, right: u8) -> String {
    format!(
        "linear-gradient(to right, transparent, black {}%, black {}%, transparent)",
        left,
        100 - u32::from(right)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_gradient_text() {
        assert_eq!(
            fade_gradient(10, 10),
            "linear-gradient(to right, transparent, black 10%, black 90%, transparent)"
        );
        assert_eq!(
            fade_gradient(0, 0),
            "linear-gradient(to right, transparent, black 0%, black 100%, transparent)"
        );
    }

    #[test]
    fn test_sliders_clamp_and_keep_preset() {
        let mut fade = FadeControls::default();
        fade.apply_preset(FadePreset::Strong);
        fade.set_left(90);
        assert_eq!(fade.left, FADE_MAX);
        assert_eq!(fade.right, 20);
        assert_eq!(fade.active_preset, Some(FadePreset::Strong));
    }

    #[test]
    fn test_unknown_preset_is_medium() {
        assert_eq!(FadePreset::from_name("bogus"), FadePreset::Medium);
        assert_eq!(FadePreset::from_name("subtle").amount(), 5);
    }
}
