use crate::mesh::{Mesh, Vertex};
use crate::primitives::{Rect, RingShape, RingStyle};
use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Derived geometry of a ring: clamped radius, corner pivots and U pacing.
///
/// Corners are traversed bottom-left, top-left, top-right, bottom-right
/// (y grows down), so `edge_lengths` are the straight runs leaving each
/// corner: left side, top, right side, bottom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingGeometry {
    /// Corner radius after clamping to half the smaller rectangle side
    pub radius: f32,
    /// Pivot of each corner arc, inset from the rectangle corner by `radius`
    pub anchors: [Vec2; 4],
    pub edge_lengths: [f32; 4],
    /// Circumference of the bias-blended radius, standing in for four quarter arcs
    pub uv_circumference: f32,
    /// Straight edges plus `uv_circumference`; U advances by distance over this
    pub uv_perimeter: f32,
    pub segment_arc_length: f32,
    pub center: Vec2,
}

impl RingGeometry {
    /// Derive geometry from a rectangle and an already sanitized style.
    ///
    /// Negative rectangle extents are treated as zero.
    pub fn new(rect: &Rect, style: &RingStyle) -> Self {
        let min = Vec2::from_array(rect.min);
        let size = Vec2::new(rect.width().max(0.0), rect.height().max(0.0));
        let max = min + size;

        let radius = style.corner_radius.min(size.min_element() * 0.5).max(0.0);

        let anchors = [
            Vec2::new(min.x + radius, max.y - radius), // Bottom-left
            Vec2::new(min.x + radius, min.y + radius), // Top-left
            Vec2::new(max.x - radius, min.y + radius), // Top-right
            Vec2::new(max.x - radius, max.y - radius), // Bottom-right
        ];

        let inner_height = size.y - 2.0 * radius;
        let inner_width = size.x - 2.0 * radius;
        let edge_lengths = [inner_height, inner_width, inner_height, inner_width];

        let uv_radius = lerp(radius, radius + style.outline_width, style.mapping_bias);
        let uv_circumference = TAU * uv_radius;
        let uv_perimeter = edge_lengths.iter().sum::<f32>() + uv_circumference;
        let segment_arc_length = uv_circumference / 4.0 / style.corner_segments.max(1) as f32;

        Self {
            radius,
            anchors,
            edge_lengths,
            uv_circumference,
            uv_perimeter,
            segment_arc_length,
            center: min + size * 0.5,
        }
    }

    /// Fraction of the loop covered by `length`; zero when the loop has no length
    pub fn pace(&self, length: f32) -> f32 {
        if self.uv_perimeter > 0.0 {
            length / self.uv_perimeter
        } else {
            0.0
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl RingShape {
    /// Geometry derived from this shape after clamping its style
    pub fn geometry(&self) -> RingGeometry {
        RingGeometry::new(&self.rect, &self.style.sanitized())
    }

    /// Tessellate into a freshly allocated mesh
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new();
        tessellate_ring(self, &mut mesh);
        mesh
    }
}

/// Number of vertices a ring with this style tessellates into
pub fn vertex_count(style: &RingStyle) -> usize {
    let style = style.sanitized();
    let steps = 4 * (style.corner_segments as usize + 1);
    (steps + 1) * style.stride()
}

/// Number of triangles a ring with this style tessellates into
pub fn triangle_count(style: &RingStyle) -> usize {
    let style = style.sanitized();
    let quads = 4 * (style.corner_segments as usize + 1);
    if style.fill_center {
        quads * 4
    } else {
        quads * 2
    }
}

/// Clear `mesh` and fill it with the ring described by `shape`.
///
/// Each angular step emits an inner vertex (v = 0), an outer vertex (v = 1)
/// and, with `fill_center`, a center vertex (v = 0). The first step group is
/// repeated at the end with u = 1 so the texture wraps without a seam.
pub fn tessellate_ring(shape: &RingShape, mesh: &mut Mesh) {
    mesh.clear();

    let style = shape.style.sanitized();
    let geometry = RingGeometry::new(&shape.rect, &style);

    mesh.vertices.reserve(vertex_count(&style));
    mesh.indices.reserve(triangle_count(&style) * 3);

    let segments = style.corner_segments;
    let inner_radius = geometry.radius;
    let outer_radius = geometry.radius + style.outline_width;
    let center = geometry.center.to_array();
    let segment_step = geometry.pace(geometry.segment_arc_length);

    let mut u = 0.0_f32;
    for (corner, anchor) in geometry.anchors.iter().enumerate() {
        for step in 0..=segments {
            let t = step as f32 / segments as f32;
            // Each corner sweeps a quarter turn starting where the previous one ended
            let direction = Vec2::from_angle(FRAC_PI_2 * (1.0 + corner as f32 + t));
            let step_u = u.min(1.0);

            mesh.vertices.push(Vertex::new(
                (*anchor + direction * inner_radius).to_array(),
                [step_u, 0.0],
                style.color,
            ));
            mesh.vertices.push(Vertex::new(
                (*anchor + direction * outer_radius).to_array(),
                [step_u, 1.0],
                style.color,
            ));
            if style.fill_center {
                mesh.vertices
                    .push(Vertex::new(center, [step_u, 0.0], style.color));
            }

            u += if step < segments {
                segment_step
            } else {
                geometry.pace(geometry.edge_lengths[corner])
            };
        }
    }

    // Close the loop
    let stride = style.stride();
    for i in 0..stride {
        let first = mesh.vertices[i];
        mesh.vertices.push(first.with_uv([1.0, first.uv[1]]));
    }

    // Quad strip between consecutive step groups; the closing group is only
    // ever addressed as "next"
    let vertex_count = mesh.vertices.len() as u32;
    if style.fill_center {
        for v in (0..vertex_count - 3).step_by(3) {
            mesh.indices.extend_from_slice(&[v, v + 1, v + 4]);
            mesh.indices.extend_from_slice(&[v, v + 4, v + 3]);

            mesh.indices.extend_from_slice(&[v + 2, v, v + 3]);
            mesh.indices.extend_from_slice(&[v + 2, v + 3, v + 5]);
        }
    } else {
        for v in (0..vertex_count - 2).step_by(2) {
            mesh.indices.extend_from_slice(&[v, v + 1, v + 3]);
            mesh.indices.extend_from_slice(&[v, v + 3, v + 2]);
        }
    }

    log::trace!(
        "tessellated ring: radius={:.2} segments={} fill={} -> {} vertices, {} triangles",
        geometry.radius,
        segments,
        style.fill_center,
        mesh.vertices.len(),
        mesh.triangle_count()
    );
}

/// Tessellator converting ring shapes into triangle meshes.
///
/// Holds a single scratch mesh that is cleared and refilled on every call,
/// so rebuilding each frame does not reallocate. Use one tessellator per
/// thread.
pub struct RingTessellator {
    mesh: Mesh,
}

impl RingTessellator {
    pub fn new() -> Self {
        Self { mesh: Mesh::new() }
    }

    /// Tessellate a ring. Returns a reference to the internal mesh.
    pub fn tessellate(&mut self, shape: &RingShape) -> &Mesh {
        tessellate_ring(shape, &mut self.mesh);
        &self.mesh
    }
}

impl Default for RingTessellator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    const EPS: f32 = 1e-3;

    fn shape(width: f32, height: f32, style: RingStyle) -> RingShape {
        RingShape::new(Rect::from_min_size([0.0, 0.0], [width, height]), style)
    }

    fn scenario_style() -> RingStyle {
        RingStyle::new()
            .with_corner_radius(20.0)
            .with_outline_width(10.0)
            .with_corner_segments(4)
            .with_mapping_bias(0.5)
    }

    /// Twice the signed area; positive for the ring's winding in y-down space
    fn signed_area(mesh: &Mesh, tri: [u32; 3]) -> f32 {
        let [a, b, c] = tri.map(|i| Vec2::from_array(mesh.vertices[i as usize].pos));
        (b - a).perp_dot(c - a)
    }

    fn pos(mesh: &Mesh, index: usize) -> Vec2 {
        Vec2::from_array(mesh.vertices[index].pos)
    }

    #[test]
    fn test_scenario_counts() {
        let mesh = shape(200.0, 100.0, scenario_style()).to_mesh();

        assert_eq!(mesh.vertices.len(), 42);
        assert_eq!(mesh.triangle_count(), 40);
        assert!(mesh.indices.iter().all(|&i| i <= 41));
    }

    #[test]
    fn test_single_segment_fill_counts() {
        let style = scenario_style()
            .with_corner_segments(1)
            .with_fill_center(true);
        let mesh = shape(200.0, 100.0, style).to_mesh();

        assert_eq!(mesh.vertices.len(), 27);
        assert_eq!(mesh.triangle_count(), 32);
    }

    #[test]
    fn test_counts_and_bounds_for_all_segment_counts() {
        for segments in 1..=20 {
            for fill_center in [false, true] {
                let style = scenario_style()
                    .with_corner_segments(segments)
                    .with_fill_center(fill_center);
                let mesh = shape(200.0, 100.0, style).to_mesh();
                let stride = if fill_center { 3 } else { 2 };
                let per_quad = if fill_center { 4 } else { 2 };
                let segments = segments as usize;

                assert_eq!(mesh.vertices.len(), 4 * (segments + 1) * stride + stride);
                assert_eq!(mesh.vertices.len(), vertex_count(&style));
                assert_eq!(mesh.triangle_count(), 4 * (segments + 1) * per_quad);
                assert_eq!(mesh.triangle_count(), triangle_count(&style));

                let count = mesh.vertices.len() as u32;
                assert!(mesh.indices.iter().all(|&i| i < count));
            }
        }
    }

    #[test]
    fn test_u_monotonic_and_closed() {
        for fill_center in [false, true] {
            let mesh = shape(200.0, 100.0, scenario_style().with_fill_center(fill_center))
                .to_mesh();

            assert_eq!(mesh.vertices[0].uv[0], 0.0);
            for pair in mesh.vertices.windows(2) {
                assert!(pair[1].uv[0] >= pair[0].uv[0]);
            }

            let stride = if fill_center { 3 } else { 2 };
            let closing = &mesh.vertices[mesh.vertices.len() - stride..];
            assert!(closing.iter().all(|v| v.uv[0] == 1.0));
            for (closing, first) in closing.iter().zip(&mesh.vertices[..stride]) {
                assert_eq!(closing.pos, first.pos);
                assert_eq!(closing.uv[1], first.uv[1]);
            }
        }
    }

    #[test]
    fn test_u_paced_by_perimeter() {
        let ring = shape(200.0, 100.0, scenario_style());
        let geometry = ring.geometry();
        let mesh = ring.to_mesh();

        // Last real step sits one bottom edge short of the seam
        let last_inner = &mesh.vertices[mesh.vertices.len() - 4];
        let expected = 1.0 - geometry.edge_lengths[3] / geometry.uv_perimeter;
        assert!((last_inner.uv[0] - expected).abs() < EPS);

        // Leaving the first corner advances by the left edge
        let corner_end = &mesh.vertices[2 * 4];
        let edge_start = &mesh.vertices[2 * 5];
        let step = edge_start.uv[0] - corner_end.uv[0];
        assert!((step - geometry.edge_lengths[0] / geometry.uv_perimeter).abs() < 1e-5);
    }

    #[test]
    fn test_uv_v_coordinates() {
        let mesh = shape(200.0, 100.0, scenario_style().with_fill_center(true)).to_mesh();
        for group in mesh.vertices.chunks_exact(3) {
            assert_eq!(group[0].uv[1], 0.0);
            assert_eq!(group[1].uv[1], 1.0);
            assert_eq!(group[2].uv[1], 0.0);
        }
    }

    #[test]
    fn test_radius_clamped_to_half_smaller_side() {
        let ring = shape(100.0, 40.0, RingStyle::new().with_corner_radius(500.0));
        assert_eq!(ring.geometry().radius, 20.0);

        let ring = shape(100.0, 40.0, RingStyle::new().with_corner_radius(5.0));
        assert_eq!(ring.geometry().radius, 5.0);
    }

    #[test]
    fn test_geometry_derivation() {
        let geometry = shape(200.0, 100.0, scenario_style()).geometry();

        assert_eq!(geometry.edge_lengths, [60.0, 160.0, 60.0, 160.0]);
        assert_eq!(geometry.anchors[0], Vec2::new(20.0, 80.0));
        assert_eq!(geometry.anchors[1], Vec2::new(20.0, 20.0));
        assert_eq!(geometry.anchors[2], Vec2::new(180.0, 20.0));
        assert_eq!(geometry.anchors[3], Vec2::new(180.0, 80.0));
        assert_eq!(geometry.center, Vec2::new(100.0, 50.0));

        let expected_circumference = TAU * 25.0;
        assert!((geometry.uv_circumference - expected_circumference).abs() < EPS);
        assert!((geometry.uv_perimeter - (440.0 + expected_circumference)).abs() < EPS);
        assert!((geometry.segment_arc_length - expected_circumference / 16.0).abs() < EPS);
    }

    #[test]
    fn test_mapping_bias_blends_radius() {
        let inner = shape(200.0, 100.0, scenario_style().with_mapping_bias(0.0)).geometry();
        let outer = shape(200.0, 100.0, scenario_style().with_mapping_bias(1.0)).geometry();

        assert!((inner.uv_circumference - TAU * 20.0).abs() < EPS);
        assert!((outer.uv_circumference - TAU * 30.0).abs() < EPS);
    }

    #[test]
    fn test_vertices_on_arcs() {
        let ring = shape(200.0, 100.0, scenario_style());
        let geometry = ring.geometry();
        let mesh = ring.to_mesh();
        let steps_per_corner = 5;

        for corner in 0..4 {
            let anchor = geometry.anchors[corner];
            for step in 0..steps_per_corner {
                let base = (corner * steps_per_corner + step) * 2;
                assert!((pos(&mesh, base).distance(anchor) - 20.0).abs() < EPS);
                assert!((pos(&mesh, base + 1).distance(anchor) - 30.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_corners_continue_without_gap() {
        let ring = shape(200.0, 100.0, scenario_style());
        let geometry = ring.geometry();
        let mesh = ring.to_mesh();
        let steps_per_corner = 5;

        for corner in 0..4 {
            let end = (corner * steps_per_corner + steps_per_corner - 1) * 2;
            let next_start = ((corner + 1) * steps_per_corner) * 2;
            let gap = pos(&mesh, end).distance(pos(&mesh, next_start));
            assert!((gap - geometry.edge_lengths[corner]).abs() < EPS);
        }
    }

    #[test]
    fn test_ring_stays_around_rect() {
        let mesh = shape(200.0, 100.0, scenario_style()).to_mesh();

        for pair in mesh.vertices.chunks_exact(2) {
            let [x, y] = pair[0].pos;
            assert!((-EPS..=200.0 + EPS).contains(&x));
            assert!((-EPS..=100.0 + EPS).contains(&y));

            let [x, y] = pair[1].pos;
            assert!((-10.0 - EPS..=210.0 + EPS).contains(&x));
            assert!((-10.0 - EPS..=110.0 + EPS).contains(&y));
        }
    }

    #[test]
    fn test_winding_consistent() {
        for fill_center in [false, true] {
            let mesh = shape(200.0, 100.0, scenario_style().with_fill_center(fill_center))
                .to_mesh();

            let mut positive = 0;
            for tri in mesh.triangles() {
                let area = signed_area(&mesh, tri);
                assert!(area > -EPS, "triangle {tri:?} flipped (area {area})");
                if area > EPS {
                    positive += 1;
                }
            }
            assert!(positive > mesh.triangle_count() / 2);
        }
    }

    #[test]
    fn test_fill_center_keeps_ring_geometry() {
        let plain = shape(200.0, 100.0, scenario_style()).to_mesh();
        let filled = shape(200.0, 100.0, scenario_style().with_fill_center(true)).to_mesh();

        let ring_only: Vec<_> = filled
            .vertices
            .chunks_exact(3)
            .flat_map(|group| [group[0], group[1]])
            .collect();
        assert_eq!(ring_only, plain.vertices);

        // Outline quads come first in each group of four triangles
        let remap = |i: u32| (i / 3) * 2 + (i % 3);
        let ring_indices: Vec<u32> = filled
            .indices
            .chunks_exact(12)
            .flat_map(|quad| quad[..6].to_vec())
            .map(remap)
            .collect();
        assert_eq!(ring_indices, plain.indices);

        let center = [100.0, 50.0];
        assert!(filled.vertices.chunks_exact(3).all(|g| g[2].pos == center));
    }

    #[test]
    fn test_degenerate_rect() {
        let ring = shape(0.0, 0.0, scenario_style().with_corner_radius(80.0));
        assert_eq!(ring.geometry().radius, 0.0);

        let mesh = ring.to_mesh();
        assert_eq!(mesh.vertices.len(), 42);
        for pair in mesh.vertices.chunks_exact(2) {
            assert!(Vec2::from_array(pair[0].pos).length() < EPS);
            assert!((Vec2::from_array(pair[1].pos).length() - 10.0).abs() < EPS);
        }
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn test_negative_rect_treated_as_empty() {
        let ring = RingShape::new(Rect::new([10.0, 10.0], [0.0, 0.0]), scenario_style());
        let geometry = ring.geometry();

        assert_eq!(geometry.radius, 0.0);
        assert!(geometry.edge_lengths.iter().all(|&len| len == 0.0));
    }

    #[test]
    fn test_zero_perimeter_has_no_nan() {
        let style = scenario_style().with_outline_width(0.0);
        let mesh = shape(0.0, 0.0, style).to_mesh();

        assert!(mesh.vertices.iter().all(|v| v.uv[0].is_finite()));
        let last = mesh.vertices.last().map(|v| v.uv[0]);
        assert_eq!(last, Some(1.0));
    }

    #[test]
    fn test_zero_segments_clamped() {
        let style = scenario_style().with_corner_segments(0);
        let mesh = shape(200.0, 100.0, style).to_mesh();

        assert_eq!(mesh.vertices.len(), 4 * 2 * 2 + 2);
        assert!(mesh.vertices.iter().all(|v| v.uv[0].is_finite()));
    }

    #[test]
    fn test_color_applied_to_all_vertices() {
        let color = Color::rgb(0.2, 0.4, 0.6);
        let mesh = shape(50.0, 50.0, scenario_style().with_color(color)).to_mesh();
        assert!(mesh.vertices.iter().all(|v| v.color == color.to_array()));
    }

    #[test]
    fn test_tessellator_reuses_buffer() {
        let first = shape(200.0, 100.0, scenario_style());
        let second = shape(80.0, 300.0, scenario_style().with_fill_center(true));

        let mut tessellator = RingTessellator::new();
        tessellator.tessellate(&first);
        let mesh = tessellator.tessellate(&second);

        assert_eq!(*mesh, second.to_mesh());
    }

    #[test]
    fn test_deterministic() {
        let ring = shape(123.0, 77.0, scenario_style().with_corner_segments(7));
        assert_eq!(ring.to_mesh(), ring.to_mesh());
    }
}
