//! Retained ring element that rebuilds its mesh only when its inputs change.

use crate::mesh::Mesh;
use crate::primitives::{Rect, RingShape, RingStyle};
use crate::tessellate::tessellate_ring;

/// A ring outline attached to a host rectangle.
///
/// The host reports size changes through [`RingOutline::set_rect`] and style
/// edits through [`RingOutline::set_style`] or [`RingOutline::style_mut`].
/// [`RingOutline::update`] then rebuilds the cached mesh from scratch if
/// anything changed since the last build.
///
/// `T` is an opaque texture handle owned by the rendering backend. Without
/// one the backend samples plain white.
#[derive(Clone, Debug)]
pub struct RingOutline<T = ()> {
    rect: Rect,
    style: RingStyle,
    texture: Option<T>,
    mesh: Mesh,
    dirty: bool,
}

impl<T> RingOutline<T> {
    pub fn new(rect: Rect, style: RingStyle) -> Self {
        Self {
            rect,
            style,
            texture: None,
            mesh: Mesh::new(),
            dirty: true,
        }
    }

    pub fn with_texture(mut self, texture: T) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn style(&self) -> &RingStyle {
        &self.style
    }

    pub fn shape(&self) -> RingShape {
        RingShape::new(self.rect, self.style)
    }

    pub fn texture(&self) -> Option<&T> {
        self.texture.as_ref()
    }

    /// Swapping the texture never touches geometry
    pub fn set_texture(&mut self, texture: Option<T>) {
        self.texture = texture;
    }

    /// Resize callback from the host layout
    pub fn set_rect(&mut self, rect: Rect) {
        if self.rect != rect {
            self.rect = rect;
            self.dirty = true;
        }
    }

    pub fn set_style(&mut self, style: RingStyle) {
        if self.style != style {
            self.style = style;
            self.dirty = true;
        }
    }

    /// Mutable access to the style; always invalidates the mesh
    pub fn style_mut(&mut self) -> &mut RingStyle {
        self.dirty = true;
        &mut self.style
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuild the mesh if needed. Returns `true` when a rebuild happened.
    pub fn update(&mut self) -> bool {
        if !self.dirty {
            return false;
        }

        tessellate_ring(&self.shape(), &mut self.mesh);
        self.dirty = false;

        log::trace!(
            "rebuilt ring outline {}x{}",
            self.rect.width(),
            self.rect.height()
        );
        true
    }

    /// Mesh from the last [`RingOutline::update`]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline() -> RingOutline {
        RingOutline::new(
            Rect::from_min_size([0.0, 0.0], [200.0, 100.0]),
            RingStyle::new()
                .with_corner_radius(20.0)
                .with_outline_width(10.0)
                .with_corner_segments(4),
        )
    }

    #[test]
    fn test_builds_on_first_update() {
        let mut outline = outline();
        assert!(outline.is_dirty());
        assert!(outline.mesh().vertices.is_empty());

        assert!(outline.update());
        assert_eq!(outline.mesh().vertices.len(), 42);
        assert!(!outline.update());
    }

    #[test]
    fn test_resize_invalidates() {
        let mut outline = outline();
        outline.update();

        outline.set_rect(Rect::from_min_size([0.0, 0.0], [200.0, 100.0]));
        assert!(!outline.is_dirty());

        outline.set_rect(Rect::from_min_size([0.0, 0.0], [300.0, 100.0]));
        assert!(outline.update());
        assert_eq!(*outline.mesh(), outline.shape().to_mesh());
    }

    #[test]
    fn test_style_change_rebuilds_from_scratch() {
        let mut outline = outline();
        outline.update();

        outline.style_mut().fill_center = true;
        assert!(outline.update());
        assert_eq!(outline.mesh().vertices.len(), 63);

        let unchanged = *outline.style();
        outline.set_style(unchanged);
        assert!(!outline.is_dirty());
    }

    #[test]
    fn test_texture_swap_keeps_mesh() {
        let mut outline: RingOutline<u32> = RingOutline::new(
            Rect::from_min_size([0.0, 0.0], [10.0, 10.0]),
            RingStyle::default(),
        )
        .with_texture(7);
        outline.update();

        outline.set_texture(None);
        assert!(!outline.is_dirty());
        assert_eq!(outline.texture(), None);
    }
}
