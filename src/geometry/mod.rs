mod cube;
mod sphere;

pub use cube::{cube_vertices, CUBE_VERTEX_COUNT};
pub use sphere::{sphere_geometry, SphereGeometry};
