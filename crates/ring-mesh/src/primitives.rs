use crate::color::Color;
use std::ops::RangeInclusive;

/// Axis-aligned rectangle defined by min and max corners
///
/// Coordinates follow the screen convention: x grows right, y grows down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl Rect {
    pub const fn new(min: [f32; 2], max: [f32; 2]) -> Self {
        Self { min, max }
    }

    pub fn from_min_size(min: [f32; 2], size: [f32; 2]) -> Self {
        Self {
            min,
            max: [min[0] + size[0], min[1] + size[1]],
        }
    }

    /// Rectangle of the given size centered on `center`
    pub fn from_center_size(center: [f32; 2], size: [f32; 2]) -> Self {
        let half = [size[0] * 0.5, size[1] * 0.5];
        Self {
            min: [center[0] - half[0], center[1] - half[1]],
            max: [center[0] + half[0], center[1] + half[1]],
        }
    }

    pub fn width(&self) -> f32 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f32 {
        self.max[1] - self.min[1]
    }

    pub fn center(&self) -> [f32; 2] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        ]
    }
}

/// Styling of a rounded ring outline.
///
/// Numeric fields are host tunables with fixed ranges. Values outside those
/// ranges are clamped by [`RingStyle::sanitized`] before any geometry is built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingStyle {
    /// Ring thickness, measured outward from the rectangle's rounded edge
    pub outline_width: f32,
    /// Requested corner radius before clamping against the rectangle size
    pub corner_radius: f32,
    /// Angular subdivisions per 90 degree corner
    pub corner_segments: u32,
    /// Blend between inner (0) and outer (1) radius when pacing U around corners
    pub mapping_bias: f32,
    /// Fan the inner boundary into the rectangle center
    pub fill_center: bool,
    /// Vertex color applied to every emitted vertex
    pub color: Color,
}

impl RingStyle {
    pub const OUTLINE_WIDTH_RANGE: RangeInclusive<f32> = 0.0..=500.0;
    pub const CORNER_RADIUS_RANGE: RangeInclusive<f32> = 0.0..=500.0;
    pub const CORNER_SEGMENTS_RANGE: RangeInclusive<u32> = 1..=20;
    pub const MAPPING_BIAS_RANGE: RangeInclusive<f32> = 0.0..=1.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outline_width(mut self, outline_width: f32) -> Self {
        self.outline_width = outline_width;
        self
    }

    pub fn with_corner_radius(mut self, corner_radius: f32) -> Self {
        self.corner_radius = corner_radius;
        self
    }

    pub fn with_corner_segments(mut self, corner_segments: u32) -> Self {
        self.corner_segments = corner_segments;
        self
    }

    pub fn with_mapping_bias(mut self, mapping_bias: f32) -> Self {
        self.mapping_bias = mapping_bias;
        self
    }

    pub fn with_fill_center(mut self, fill_center: bool) -> Self {
        self.fill_center = fill_center;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Copy of this style with every tunable clamped into its range
    pub fn sanitized(&self) -> Self {
        Self {
            outline_width: clamp_to(self.outline_width, &Self::OUTLINE_WIDTH_RANGE),
            corner_radius: clamp_to(self.corner_radius, &Self::CORNER_RADIUS_RANGE),
            corner_segments: self.corner_segments.clamp(
                *Self::CORNER_SEGMENTS_RANGE.start(),
                *Self::CORNER_SEGMENTS_RANGE.end(),
            ),
            mapping_bias: clamp_to(self.mapping_bias, &Self::MAPPING_BIAS_RANGE),
            fill_center: self.fill_center,
            color: self.color,
        }
    }

    /// Vertices emitted per angular step: inner, outer and optionally center
    pub fn stride(&self) -> usize {
        if self.fill_center {
            3
        } else {
            2
        }
    }
}

impl Default for RingStyle {
    fn default() -> Self {
        Self {
            outline_width: 100.0,
            corner_radius: 50.0,
            corner_segments: 1,
            mapping_bias: 0.5,
            fill_center: false,
            color: Color::WHITE,
        }
    }
}

/// NaN collapses to the range start
fn clamp_to(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        *range.start()
    } else {
        value.clamp(*range.start(), *range.end())
    }
}

/// A ring outline placed around a rectangle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingShape {
    pub rect: Rect,
    pub style: RingStyle,
}

impl RingShape {
    pub fn new(rect: Rect, style: RingStyle) -> Self {
        Self { rect, style }
    }
}
