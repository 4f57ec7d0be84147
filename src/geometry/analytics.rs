// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Geometry analytics and statistics

use super::Mesh;
use colored::Colorize;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Geometry statistics and analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryStats {
    /// Enclosed volume in cubic units
    pub volume: f64,
    /// Volume with orientation; negative when faces point inward
    pub signed_volume: f64,
    /// Total surface area in square units
    pub surface_area: f64,
    /// Bounding box [min_x, min_y, min_z, max_x, max_y, max_z]
    pub bbox: [f64; 6],
    /// Centre of mass [x, y, z]
    pub centroid: [f64; 3],
    pub vertex_count: usize,
    pub triangle_count: usize,
}

impl GeometryStats {
    pub fn empty() -> Self {
        Self {
            volume: 0.0,
            signed_volume: 0.0,
            surface_area: 0.0,
            bbox: [0.0; 6],
            centroid: [0.0; 3],
            vertex_count: 0,
            triangle_count: 0,
        }
    }

    pub fn size(&self) -> [f64; 3] {
        [
            self.bbox[3] - self.bbox[0],
            self.bbox[4] - self.bbox[1],
            self.bbox[5] - self.bbox[2],
        ]
    }

    /// Pretty print statistics
    pub fn print(&self, title: &str) {
        let size = self.size();
        println!("{}", title.bold());
        println!("  {} {:.3} mm³", "Volume:      ".bright_black(), self.volume);
        println!("  {} {:.3} mm²", "Surface area:".bright_black(), self.surface_area);
        println!(
            "  {} ({:.2}, {:.2}, {:.2}) .. ({:.2}, {:.2}, {:.2})",
            "Bounds:      ".bright_black(),
            self.bbox[0],
            self.bbox[1],
            self.bbox[2],
            self.bbox[3],
            self.bbox[4],
            self.bbox[5]
        );
        println!(
            "  {} {:.2} × {:.2} × {:.2} mm",
            "Size:        ".bright_black(),
            size[0],
            size[1],
            size[2]
        );
        println!(
            "  {} ({:.2}, {:.2}, {:.2})",
            "Centroid:    ".bright_black(),
            self.centroid[0],
            self.centroid[1],
            self.centroid[2]
        );
        println!(
            "  {} {} vertices, {} triangles",
            "Mesh:        ".bright_black(),
            self.vertex_count.to_string().cyan(),
            self.triangle_count.to_string().cyan()
        );
    }
}

/// Analyze mesh geometry and compute statistics
pub fn analyze(mesh: &Mesh) -> GeometryStats {
    if mesh.vertices.is_empty() || mesh.triangles.is_empty() {
        return GeometryStats::empty();
    }

    let bbox = mesh.bounding_box();
    let mut signed_volume: f64 = 0.0;
    let mut surface_area: f64 = 0.0;
    let mut moment: Vector3<f64> = Vector3::zeros();

    for triangle in &mesh.triangles {
        let v0 = mesh.vertices[triangle.indices[0]].position.coords;
        let v1 = mesh.vertices[triangle.indices[1]].position.coords;
        let v2 = mesh.vertices[triangle.indices[2]].position.coords;

        // Signed volume of the tetrahedron spanned with the origin
        let tetra = v0.dot(&v1.cross(&v2)) / 6.0;
        signed_volume += tetra;
        moment += (v0 + v1 + v2) * (tetra / 4.0);

        surface_area += (v1 - v0).cross(&(v2 - v0)).norm() / 2.0;
    }

    let centroid = if signed_volume.abs() > 1e-12 {
        moment / signed_volume
    } else {
        bbox.center().coords
    };

    GeometryStats {
        volume: signed_volume.abs(),
        signed_volume,
        surface_area,
        bbox: [
            bbox.min.x, bbox.min.y, bbox.min.z, bbox.max.x, bbox.max.y, bbox.max.z,
        ],
        centroid: [centroid.x, centroid.y, centroid.z],
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_analyze_cube() {
        let mesh = Primitive::cuboid(Vector3::new(10.0, 10.0, 10.0), Point3::new(1.0, 2.0, 3.0))
            .to_mesh()
            .unwrap();
        let stats = analyze(&mesh);

        assert_relative_eq!(stats.volume, 1000.0, epsilon = 1e-9);
        assert_relative_eq!(stats.surface_area, 600.0, epsilon = 1e-9);
        assert_relative_eq!(stats.centroid[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(stats.centroid[1], 2.0, epsilon = 1e-9);
        assert_relative_eq!(stats.centroid[2], 3.0, epsilon = 1e-9);
        assert_eq!(stats.size(), [10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_analyze_empty_mesh() {
        assert_eq!(analyze(&Mesh::empty()), GeometryStats::empty());
    }
}
