// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Connector primitives measured on the mesh backend

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;
use studmount::geometry::analytics::analyze;
use studmount::geometry::{GeometryBackend, MeshBackend};
use studmount::{merge, AxleProfile, ConnectorLibrary, DShaft, StudBore};

const SEGMENTS: u32 = 32;

/// Area of the regular polygon the backend uses for a circle of `radius`
fn polygon_area(radius: f64) -> f64 {
    let n = SEGMENTS as f64;
    0.5 * n * radius * radius * (2.0 * PI / n).sin()
}

#[test]
fn test_stud_bore_spans_the_panel() {
    let backend = MeshBackend::new(SEGMENTS, 1e-5);
    let library = ConnectorLibrary::new(&backend, StudBore::default(), AxleProfile::default());
    let bore = library.stud_bore(Point3::new(4.0, 4.0, 4.0)).unwrap();

    let bbox = backend.bounding_box(&bore);
    // Relief washers sit flush inside the panel faces, so the bore is exactly
    // one panel tall rather than 8 + 2 * 0.8
    assert_relative_eq!(bbox.min.z, 0.0, epsilon = 1e-9);
    assert_relative_eq!(bbox.max.z, 8.0, epsilon = 1e-9);
    // Widest at the washers
    assert_relative_eq!(bbox.max.x - 4.0, 3.1, epsilon = 1e-9);

    let expected = polygon_area(2.4) * (8.0 - 1.6) + polygon_area(3.1) * 1.6;
    assert_relative_eq!(analyze(&bore).volume, expected, max_relative = 1e-6);
}

#[test]
fn test_stud_bore_through_panel() {
    let backend = MeshBackend::new(SEGMENTS, 1e-5);
    let library = ConnectorLibrary::new(&backend, StudBore::default(), AxleProfile::default());
    let panel = backend
        .cuboid(Vector3::new(8.0, 8.0, 8.0), Point3::origin())
        .unwrap();
    let bore = library.stud_bore(Point3::origin()).unwrap();

    let cut = merge(&backend, &[panel], &[bore.clone()]).unwrap();
    let removed = 512.0 - analyze(&cut).volume;
    assert_relative_eq!(removed, analyze(&bore).volume, max_relative = 1e-6);
}

#[test]
fn test_custom_stud_dimensions() {
    let backend = MeshBackend::new(SEGMENTS, 1e-5);
    let stud = StudBore::new(5.0, 7.0, 1.0).unwrap();
    let library = ConnectorLibrary::new(&backend, stud, AxleProfile::default());
    let bore = library.stud_bore(Point3::origin()).unwrap();

    assert_relative_eq!(backend.bounding_box(&bore).max.x, 3.5, epsilon = 1e-9);
}

#[test]
fn test_d_shaft_without_flat_is_the_plain_cylinder() {
    let backend = MeshBackend::new(SEGMENTS, 1e-5);
    let library = ConnectorLibrary::new(&backend, StudBore::default(), AxleProfile::default());
    let shaft = DShaft::new(5.0, 0.0, 16.0).unwrap();

    let bore = library.d_shaft(&shaft).unwrap();
    let cylinder = backend.cylinder(2.5, 16.0, Point3::origin()).unwrap();
    assert_eq!(bore, cylinder);
}

#[test]
fn test_d_shaft_flat_trims_positive_y() {
    let backend = MeshBackend::new(SEGMENTS, 1e-5);
    let library = ConnectorLibrary::new(&backend, StudBore::default(), AxleProfile::default());
    let shaft = DShaft::new(5.0, 0.5, 16.0).unwrap();

    let bore = library.d_shaft(&shaft).unwrap();
    let bbox = backend.bounding_box(&bore);
    assert_relative_eq!(bbox.max.y, 2.0, epsilon = 1e-6);
    assert_relative_eq!(bbox.min.y, -2.5, epsilon = 1e-9);
    assert_relative_eq!(bbox.size().z, 16.0, epsilon = 1e-9);
    assert!(analyze(&bore).volume < polygon_area(2.5) * 16.0);
}

#[test]
fn test_axle_socket_volume_without_chamfer() {
    let backend = MeshBackend::new(SEGMENTS, 1e-5);
    let axle = AxleProfile::new(4.8, 1.8, 0.0).unwrap();
    let library = ConnectorLibrary::new(&backend, StudBore::default(), axle);

    let socket = library.axle_socket(Point3::origin(), 8.0).unwrap();
    let expected = 2.0 * 4.8 * 1.8 * 8.0 - 1.8 * 1.8 * 8.0;
    assert_relative_eq!(analyze(&socket).volume, expected, max_relative = 1e-6);
}

#[test]
fn test_chamfer_adds_relief_inside_the_arms() {
    let backend = MeshBackend::new(SEGMENTS, 1e-5);
    let library = ConnectorLibrary::new(&backend, StudBore::default(), AxleProfile::default());
    let plain = ConnectorLibrary::new(
        &backend,
        StudBore::default(),
        AxleProfile::new(4.8, 1.8, 0.0).unwrap(),
    );

    let chamfered = library.axle_socket(Point3::origin(), 8.0).unwrap();
    let square = plain.axle_socket(Point3::origin(), 8.0).unwrap();
    assert!(analyze(&chamfered).volume > analyze(&square).volume);
    assert!(backend
        .bounding_box(&chamfered)
        .approx_eq(&backend.bounding_box(&square), 1e-9));
}
