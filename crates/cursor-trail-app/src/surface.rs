use cursor_trail_core::render::vertex_bytes;
use cursor_trail_core::TrailMesh;
use cursor_trail_platform::{Result, TrailSurface, ViewportRect};
use tracing::debug;

/// Surface that records draw calls instead of rasterizing them.
pub struct LogSurface {
    viewport: ViewportRect,
    draw_calls: u64,
    non_empty_draws: u64,
    uploaded_bytes: usize,
    last_mesh: TrailMesh,
}

impl LogSurface {
    pub fn new(viewport: ViewportRect) -> Self {
        Self {
            viewport,
            draw_calls: 0,
            non_empty_draws: 0,
            uploaded_bytes: 0,
            last_mesh: TrailMesh::default(),
        }
    }

    /// Every `draw_line_strip` call, empty meshes included.
    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    /// Draw calls that had at least one segment to draw.
    pub fn non_empty_draws(&self) -> u64 {
        self.non_empty_draws
    }

    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }

    pub fn last_mesh(&self) -> &TrailMesh {
        &self.last_mesh
    }
}

impl TrailSurface for LogSurface {
    fn viewport(&self) -> ViewportRect {
        self.viewport
    }

    fn draw_line_strip(&mut self, mesh: &TrailMesh, line_width: f32) -> Result<()> {
        self.draw_calls += 1;
        if !mesh.is_empty() {
            let strip = mesh.line_strip();
            let bytes = vertex_bytes(&strip).len();
            self.non_empty_draws += 1;
            self.uploaded_bytes += bytes;
            debug!(draw = self.draw_calls, vertices = strip.len(), bytes, line_width, "draw trail");
        }
        self.last_mesh = mesh.clone();
        Ok(())
    }
}
