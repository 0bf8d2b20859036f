use std::f32::consts::PI;

use crate::types::SphereVertex;

/// Indexed UV sphere with single-vertex poles
#[derive(Debug, Clone)]
pub struct SphereGeometry {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u16>,
}

impl SphereGeometry {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Tessellate a sphere centered at the origin.
///
/// `width_segments` >= 3 and `height_segments` >= 2 are enforced. Vertices are
/// laid out as north pole, `height_segments - 1` rings of `width_segments + 1`
/// vertices (seam duplicated for uv), then the south pole.
pub fn sphere_geometry(radius: f32, width_segments: u32, height_segments: u32) -> SphereGeometry {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let ring = width_segments + 1;

    let mut vertices =
        Vec::with_capacity(2 + ((height_segments - 1) * ring) as usize);

    vertices.push(SphereVertex {
        position: [0.0, radius, 0.0],
        normal: [0.0, 1.0, 0.0],
        uv: [0.5, 1.0],
    });

    for y in 1..height_segments {
        let v = y as f32 / height_segments as f32;
        let phi = v * PI;
        let (sin_phi, cos_phi) = phi.sin_cos();

        for x in 0..=width_segments {
            let u = x as f32 / width_segments as f32;
            let theta = u * PI * 2.0;
            let (sin_theta, cos_theta) = theta.sin_cos();

            let normal = [sin_phi * cos_theta, cos_phi, sin_phi * sin_theta];
            vertices.push(SphereVertex {
                position: normal.map(|n| n * radius),
                normal,
                uv: [u, 1.0 - v],
            });
        }
    }

    vertices.push(SphereVertex {
        position: [0.0, -radius, 0.0],
        normal: [0.0, -1.0, 0.0],
        uv: [0.5, 0.0],
    });

    let south_pole = 1 + (height_segments - 1) * ring;
    let mut indices: Vec<u32> = Vec::new();

    for x in 0..width_segments {
        indices.extend([0, 2 + x, 1 + x]);
    }

    for y in 1..height_segments - 1 {
        for x in 0..width_segments {
            let a = 1 + (y - 1) * ring + x;
            let b = 1 + y * ring + x;
            let c = a + 1;
            let d = b + 1;
            indices.extend([a, b, c, c, b, d]);
        }
    }

    let last_ring = 1 + (height_segments - 2) * ring;
    for x in 0..width_segments {
        let a = last_ring + x;
        indices.extend([south_pole, a, a + 1]);
    }

    debug_assert!(vertices.len() <= u16::MAX as usize + 1, "sphere too dense for u16 indices");

    SphereGeometry {
        vertices,
        indices: indices.into_iter().map(|i| i as u16).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_globe_counts() {
        let sphere = sphere_geometry(1.0, 32, 16);
        assert_eq!(sphere.vertex_count(), 2 + 15 * 33);
        assert_eq!(sphere.index_count(), (32 * 3 + 14 * 32 * 6 + 32 * 3) as u32);
    }

    #[test]
    fn test_indices_in_range() {
        let sphere = sphere_geometry(2.0, 12, 6);
        let max = sphere.vertex_count() as u16;
        assert!(sphere.indices.iter().all(|&i| i < max));
        assert_eq!(sphere.indices.len() % 3, 0);
    }

    #[test]
    fn test_vertices_on_surface_with_unit_normals() {
        let radius = 3.0;
        let sphere = sphere_geometry(radius, 16, 8);
        for vertex in &sphere.vertices {
            let p = glam::Vec3::from_array(vertex.position);
            let n = glam::Vec3::from_array(vertex.normal);
            assert!((p.length() - radius).abs() < 1e-4);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_poles() {
        let sphere = sphere_geometry(1.0, 8, 4);
        assert_eq!(sphere.vertices[0].position, [0.0, 1.0, 0.0]);
        assert_eq!(sphere.vertices.last().unwrap().position, [0.0, -1.0, 0.0]);
    }

    #[test]
    fn test_degenerate_segments_raised() {
        let sphere = sphere_geometry(1.0, 0, 0);
        // 3 x 2 minimum: poles plus one ring of 4
        assert_eq!(sphere.vertex_count(), 6);
        assert_eq!(sphere.index_count(), 18);
    }
}
