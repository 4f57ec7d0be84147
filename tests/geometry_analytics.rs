// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Geometry analytics verification tests

use anyhow::Result;
use approx::assert_relative_eq;
use nalgebra::{Point2, Point3, Vector3};
use std::f64::consts::PI;
use studmount::geometry::analytics::{analyze, GeometryStats};
use studmount::geometry::{Axis, GeometryBackend, MeshBackend, Primitive};

#[test]
fn test_cuboid_volume_and_surface_area() -> Result<()> {
    let mesh = Primitive::cuboid(Vector3::new(10.0, 10.0, 10.0), Point3::origin()).to_mesh()?;
    let stats = analyze(&mesh);

    assert_relative_eq!(stats.volume, 1000.0, epsilon = 1e-9);
    assert_relative_eq!(stats.surface_area, 600.0, epsilon = 1e-9);
    assert_eq!(stats.vertex_count, 8);
    assert_eq!(stats.triangle_count, 12);

    Ok(())
}

#[test]
fn test_cylinder_converges_with_segments() -> Result<()> {
    let (radius, height) = (5.0, 20.0);
    let exact = PI * radius * radius * height;

    let coarse = analyze(&Primitive::cylinder(radius, height, Point3::origin(), 16).to_mesh()?);
    let fine = analyze(&Primitive::cylinder(radius, height, Point3::origin(), 128).to_mesh()?);

    assert!(coarse.volume < fine.volume);
    assert!(fine.volume < exact);
    assert!((exact - fine.volume) / exact < 0.001);

    Ok(())
}

#[test]
fn test_bounding_box_accuracy() -> Result<()> {
    let mesh = Primitive::cuboid(Vector3::new(10.0, 20.0, 30.0), Point3::new(1.0, 2.0, 3.0))
        .to_mesh()?;
    let stats = analyze(&mesh);

    let expected = [-4.0, -8.0, -12.0, 6.0, 12.0, 18.0];
    for (actual, expected) in stats.bbox.iter().zip(expected) {
        assert_relative_eq!(*actual, expected, epsilon = 1e-9);
    }
    assert_eq!(stats.size(), [10.0, 20.0, 30.0]);

    Ok(())
}

#[test]
fn test_centroid_of_offset_block() -> Result<()> {
    let mesh = Primitive::cuboid(Vector3::new(4.0, 4.0, 4.0), Point3::new(10.0, -3.0, 2.0))
        .to_mesh()?;
    let stats = analyze(&mesh);

    assert_relative_eq!(stats.centroid[0], 10.0, epsilon = 1e-9);
    assert_relative_eq!(stats.centroid[1], -3.0, epsilon = 1e-9);
    assert_relative_eq!(stats.centroid[2], 2.0, epsilon = 1e-9);

    Ok(())
}

#[test]
fn test_mirroring_keeps_volume_positive() -> Result<()> {
    let backend = MeshBackend::default();
    let triangle = [
        Point2::new(0.0, 0.0),
        Point2::new(0.0, -24.0),
        Point2::new(33.0, 0.0),
    ];
    let gusset = backend.extrude_polygon(&triangle, 3.0)?;
    let mirrored = backend.mirror(&gusset, Axis::Y);

    let original = analyze(&gusset);
    let reflected = analyze(&mirrored);
    assert_relative_eq!(original.signed_volume, 0.5 * 24.0 * 33.0 * 3.0, epsilon = 1e-9);
    assert_relative_eq!(reflected.signed_volume, original.signed_volume, epsilon = 1e-9);
    assert_relative_eq!(reflected.bbox[4], 24.0, epsilon = 1e-9);

    Ok(())
}

#[test]
fn test_stats_json_serialization() -> Result<()> {
    let mesh = Primitive::cylinder(10.0, 4.0, Point3::origin(), 32).to_mesh()?;
    let stats = analyze(&mesh);

    let json = serde_json::to_string_pretty(&stats)?;
    let deserialized: GeometryStats = serde_json::from_str(&json)?;

    assert_eq!(deserialized.vertex_count, stats.vertex_count);
    assert_eq!(deserialized.triangle_count, stats.triangle_count);
    assert!((deserialized.volume - stats.volume).abs() < 0.01);

    Ok(())
}
