use bytemuck::{Pod, Zeroable};

/// (6 faces)(2 triangles/face)(3 vertices/triangle)
pub const CUBE_VERTEX_COUNT: usize = 36;
pub const CUBE_TRIANGLE_COUNT: usize = CUBE_VERTEX_COUNT / 3;

/// Corners of a unit cube centered at the origin, sides aligned with axes.
pub const CORNERS: [[f32; 4]; 8] = [
    [-0.5, -0.5, 0.5, 1.0],
    [-0.5, 0.5, 0.5, 1.0],
    [0.5, 0.5, 0.5, 1.0],
    [0.5, -0.5, 0.5, 1.0],
    [-0.5, -0.5, -0.5, 1.0],
    [-0.5, 0.5, -0.5, 1.0],
    [0.5, 0.5, -0.5, 1.0],
    [0.5, -0.5, -0.5, 1.0],
];

/// One RGBA color per corner, indexed like [`CORNERS`].
pub const CORNER_COLORS: [[f32; 4]; 8] = [
    [0.0, 0.0, 0.0, 1.0], // black
    [0.0, 1.0, 1.0, 1.0], // cyan
    [1.0, 0.0, 1.0, 1.0], // magenta
    [1.0, 1.0, 0.0, 1.0], // yellow
    [1.0, 0.0, 0.0, 1.0], // red
    [0.0, 1.0, 0.0, 1.0], // green
    [0.0, 0.0, 1.0, 1.0], // blue
    [1.0, 1.0, 1.0, 1.0], // white
];

/// Corner indices of each face, in emission order.
pub const FACES: [[usize; 4]; 6] = [
    [1, 0, 3, 2],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
    [6, 5, 1, 2],
    [4, 5, 6, 7],
    [5, 4, 0, 1],
];

/// A single mesh vertex: homogeneous position plus RGBA color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

/// The 36-vertex color cube. Positions and colors are kept as two separate
/// arrays so they can be uploaded back to back into one buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCube {
    pub positions: [[f32; 4]; CUBE_VERTEX_COUNT],
    pub colors: [[f32; 4]; CUBE_VERTEX_COUNT],
}

impl ColorCube {
    pub fn vertex_count(&self) -> u32 {
        CUBE_VERTEX_COUNT as u32
    }

    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.positions
            .iter()
            .zip(self.colors.iter())
            .map(|(&position, &color)| Vertex { position, color })
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        let verts: Vec<Vertex> = self.vertices().collect();
        (0..CUBE_TRIANGLE_COUNT).map(move |t| [verts[t * 3], verts[t * 3 + 1], verts[t * 3 + 2]])
    }

    /// Raw bytes of the position sub-range.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the color sub-range.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Write cursor for one generation pass.
struct MeshBuilder {
    cube: ColorCube,
    cursor: usize,
}

impl MeshBuilder {
    fn new() -> Self {
        Self {
            cube: ColorCube {
                positions: [[0.0; 4]; CUBE_VERTEX_COUNT],
                colors: [[0.0; 4]; CUBE_VERTEX_COUNT],
            },
            cursor: 0,
        }
    }

    fn push(&mut self, corner: usize) {
        self.cube.positions[self.cursor] = CORNERS[corner];
        self.cube.colors[self.cursor] = CORNER_COLORS[corner];
        self.cursor += 1;
    }

    /// Two triangles (a, b, c) and (a, c, d) for one face.
    fn quad(&mut self, [a, b, c, d]: [usize; 4]) {
        for corner in [a, b, c, a, c, d] {
            self.push(corner);
        }
    }

    fn finish(self) -> ColorCube {
        debug_assert_eq!(self.cursor, CUBE_VERTEX_COUNT);
        self.cube
    }
}

/// Generate 12 triangles: 36 vertices and 36 colors.
pub fn color_cube() -> ColorCube {
    let mut builder = MeshBuilder::new();
    for face in FACES {
        builder.quad(face);
    }
    builder.finish()
}
