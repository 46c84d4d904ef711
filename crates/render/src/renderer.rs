use colorbot_scene::{AnimationState, DrawList};
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a composed draw list and the animation state it was
/// built from, then produces output.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, draws: &DrawList, state: &AnimationState) -> Self::Output;
}

/// Human-readable dump of a frame, used by the CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Also print the full PVM matrix of each part.
    pub show_pvm: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pvm(mut self) -> Self {
        self.show_pvm = true;
        self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, draws: &DrawList, state: &AnimationState) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Robot (swing={:.4}, phase={:?}, rotation={:.4} rad) ===",
            state.swing_angle, state.phase, state.body_rotation
        );
        let _ = writeln!(out, "Parts: {}", draws.len());

        for d in draws.iter() {
            let p = d.model.w_axis;
            let _ = writeln!(
                out,
                "  {:<16} origin=({:.3}, {:.3}, {:.3})",
                d.part.name(),
                p.x,
                p.y,
                p.z
            );
            if self.show_pvm {
                for row in 0..4 {
                    let r = d.pvm.row(row);
                    let _ = writeln!(
                        out,
                        "    [{:>8.4} {:>8.4} {:>8.4} {:>8.4}]",
                        r.x, r.y, r.z, r.w
                    );
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colorbot_scene::{Camera, compose};
    use glam::Mat4;

    #[test]
    fn debug_renderer_lists_every_part() {
        let state = AnimationState::default();
        let draws = compose(&state, &Camera::default(), Mat4::IDENTITY);
        let output = DebugTextRenderer::new().render(&draws, &state);

        assert!(output.contains("Parts: 10"));
        assert!(output.contains("phase=Extending"));
        assert!(output.contains("head"));
        assert!(output.contains("right lower arm"));
        assert!(output.contains("origin=(0.000, 0.600, 0.000)"));
    }

    #[test]
    fn pvm_rows_only_when_requested() {
        let state = AnimationState::default();
        let draws = compose(&state, &Camera::default(), Mat4::IDENTITY);
        let plain = DebugTextRenderer::new().render(&draws, &state);
        let full = DebugTextRenderer::new().with_pvm().render(&draws, &state);

        assert!(!plain.contains('['));
        assert_eq!(full.matches('[').count(), 40);
    }
}
