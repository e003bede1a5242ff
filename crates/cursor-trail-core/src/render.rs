//! Trail renderer: turns buffered points into a colored polyline.
//!
//! [`build`] is pure. It produces one vertex per trail point with a color
//! interpolated along the trail, faded by age, and gamma corrected. Drawing is
//! left to the host (a line strip with alpha blending, `trail_width` wide).

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::buffer::TrailPoint;
use crate::color::{gamma_correct, lerp_color};

/// Age in seconds over which a point's alpha falls to zero.
pub const FADE_WINDOW: f64 = 2.0;

/// Interleaved per-vertex data ready for upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TrailVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Output of [`build`]. `vertices` and `colors` always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailMesh {
    pub vertices: Vec<Vec2>,
    pub colors: Vec<Vec4>,
}

impl TrailMesh {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices in line-strip order.
    pub fn line_strip(&self) -> Vec<TrailVertex> {
        self.vertices
            .iter()
            .zip(&self.colors)
            .map(|(position, color)| TrailVertex {
                position: position.to_array(),
                color: color.to_array(),
            })
            .collect()
    }

    /// Vertices as independent segments (`LINES` topology): each consecutive
    /// pair of points becomes its own two-vertex segment.
    pub fn line_list(&self) -> Vec<TrailVertex> {
        let strip = self.line_strip();
        strip
            .windows(2)
            .flat_map(|segment| [segment[0], segment[1]])
            .collect()
    }
}

/// Raw bytes of a vertex slice for buffer upload.
pub fn vertex_bytes(vertices: &[TrailVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Linear age falloff, 1 for a fresh point and 0 at [`FADE_WINDOW`] or older.
pub fn fade_factor(age: f64) -> f32 {
    (1.0 - age / FADE_WINDOW).clamp(0.0, 1.0) as f32
}

/// Builds the polyline for `points` (oldest first) as seen at time `now`.
///
/// Fewer than two points yield an empty mesh.
pub fn build(points: &[TrailPoint], now: f64, start_color: Vec4, end_color: Vec4) -> TrailMesh {
    let n = points.len();
    if n < 2 {
        return TrailMesh::default();
    }

    let last = (n - 1) as f32;
    let mut mesh = TrailMesh {
        vertices: Vec::with_capacity(n),
        colors: Vec::with_capacity(n),
    };
    for (i, point) in points.iter().enumerate() {
        let t = i as f32 / last;
        let mut color = lerp_color(start_color, end_color, t);
        color.w *= fade_factor(now - point.timestamp);
        mesh.vertices.push(point.position);
        mesh.colors.push(gamma_correct(color));
    }
    mesh
}
