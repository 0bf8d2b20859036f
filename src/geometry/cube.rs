use crate::types::ColorVertex;

pub const CUBE_VERTEX_COUNT: u32 = 36;

const RED: [f32; 3] = [1.0, 0.0, 0.0];
const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
const YELLOW: [f32; 3] = [1.0, 1.0, 0.0];
const MAGENTA: [f32; 3] = [1.0, 0.0, 1.0];
const CYAN: [f32; 3] = [0.0, 1.0, 1.0];

const CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
];

/// Two counter-clockwise triangles per face, one flat color per face
const FACES: [([usize; 6], [f32; 3]); 6] = [
    ([0, 1, 2, 0, 2, 3], RED),     // front
    ([5, 4, 7, 5, 7, 6], GREEN),   // back
    ([1, 5, 6, 1, 6, 2], BLUE),    // right
    ([4, 0, 3, 4, 3, 7], YELLOW),  // left
    ([3, 2, 6, 3, 6, 7], MAGENTA), // top
    ([4, 5, 1, 4, 1, 0], CYAN),    // bottom
];

/// Non-indexed vertex list for a 2x2x2 cube centered at the origin
pub fn cube_vertices() -> Vec<ColorVertex> {
    FACES
        .iter()
        .flat_map(|(corners, color)| {
            corners
                .iter()
                .map(move |&corner| ColorVertex::new(CORNERS[corner], *color))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_vertex_count() {
        assert_eq!(cube_vertices().len(), CUBE_VERTEX_COUNT as usize);
    }

    #[test]
    fn test_faces_wind_outward() {
        let vertices = cube_vertices();
        for tri in vertices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|v| Vec3::from_array(v.position));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "triangle {:?} faces inward", tri);
        }
    }
}
