/// RGBA color in linear space with values in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub const fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Convert sRGB color (0-255) to linear space
    #[inline]
    pub const fn from_srgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        const fn srgb_to_linear(c: u8) -> f32 {
            let x = c as f32 / 255.0;
            if x <= 0.04045 {
                x / 12.92
            } else {
                // Polynomial fit of ((x + 0.055) / 1.055)^2.4
                let t = (x + 0.055) / 1.055;
                t * t * (0.5870 * t + 0.4130)
            }
        }

        Self::new(
            srgb_to_linear(r),
            srgb_to_linear(g),
            srgb_to_linear(b),
            a as f32 / 255.0,
        )
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    /// Components as an `[r, g, b, a]` array, the layout vertices store
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// CSS color constants
pub mod css {
    use super::Color;

    pub const BLACK: Color = Color::from_srgba(0, 0, 0, 255);
    pub const GRAY: Color = Color::from_srgba(128, 128, 128, 255);
    pub const RED: Color = Color::from_srgba(255, 0, 0, 255);
    pub const LIME: Color = Color::from_srgba(0, 255, 0, 255);
    pub const BLUE: Color = Color::from_srgba(0, 0, 255, 255);
    pub const TEAL: Color = Color::from_srgba(0, 128, 128, 255);
    pub const YELLOW: Color = Color::from_srgba(255, 255, 0, 255);
    pub const WHITE: Color = Color::from_srgba(255, 255, 255, 255);
}

/// Catppuccin mocha palette
pub mod mocha {
    use super::Color;

    pub const ROSEWATER: Color = Color::from_srgba(245, 224, 220, 255);
    pub const MAUVE: Color = Color::from_srgba(203, 166, 247, 255);
    pub const PEACH: Color = Color::from_srgba(250, 179, 135, 255);
    pub const GREEN: Color = Color::from_srgba(166, 227, 161, 255);
    pub const TEAL: Color = Color::from_srgba(148, 226, 213, 255);
    pub const SAPPHIRE: Color = Color::from_srgba(116, 199, 236, 255);
    pub const BLUE: Color = Color::from_srgba(137, 180, 250, 255);
    pub const LAVENDER: Color = Color::from_srgba(180, 190, 254, 255);
    pub const TEXT: Color = Color::from_srgba(205, 214, 244, 255);
    pub const SURFACE0: Color = Color::from_srgba(49, 50, 68, 255);
    pub const BASE: Color = Color::from_srgba(30, 30, 46, 255);
    pub const CRUST: Color = Color::from_srgba(17, 17, 27, 255);
}
