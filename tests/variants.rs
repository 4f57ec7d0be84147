// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Swivel base variant tables and the geometry they drive

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use std::f64::consts::FRAC_PI_2;
use studmount::geometry::analytics::analyze;
use studmount::geometry::mesh_utils::is_closed;
use studmount::geometry::{Axis, GeometryBackend, MeshBackend};
use studmount::parts::{CameraSwivelBase, PartGenerator};
use studmount::variant::GridCell;
use studmount::{
    merge, AxleProfile, BaseType, Choice, ConfigError, ConnectorLibrary, ParameterMap,
    ParameterValue, PartError, StudBore,
};

fn overrides(base: &str) -> ParameterMap {
    let mut map = ParameterMap::new();
    map.insert("type".into(), ParameterValue::Choice(base.into()));
    map
}

#[test]
fn test_a1_places_eleven_bores_and_skips_the_swivel_cell() {
    let layout = BaseType::A1.layout();

    assert_eq!(layout.footprint.size, Vector3::new(24.0, 16.0, 8.0));
    assert_eq!(layout.footprint.center, Point3::new(0.0, 8.0, 4.0));

    let positions = layout.stud_positions();
    assert_eq!(positions.len(), 11);

    let excluded = layout.grid.position(GridCell::new(1, 0));
    assert!(positions.iter().all(|p| (p - excluded).norm() > 0.1));
}

#[test]
fn test_every_variant_keeps_bores_off_the_swivel_tower() {
    for base in BaseType::ALL {
        let layout = base.layout();
        for anchor in layout.stud_positions() {
            // Distance from the washer centre to the 4 x 11 tower outline
            let dx = (anchor.x.abs() - 2.0).max(0.0);
            let dy = ((anchor.y - layout.swivel_offset).abs() - 5.5).max(0.0);
            assert!(
                dx.hypot(dy) > 3.1,
                "{} places a bore at {:?} under the swivel",
                base.label(),
                anchor
            );
        }
    }
}

#[test]
fn test_b_family_is_four_studs_wide() {
    for base in [BaseType::B1, BaseType::B2, BaseType::B3] {
        let layout = base.layout();
        assert_eq!(layout.footprint.size.x, 32.0);
        assert_eq!(layout.grid.columns, 4);
        let xs: Vec<f64> = layout.stud_positions().iter().map(|p| p.x).collect();
        assert!(xs.contains(&-12.0) && xs.contains(&12.0));
    }
}

#[test]
fn test_unknown_base_type_fails_before_geometry() {
    let backend = MeshBackend::new(8, 1e-5);
    let err = CameraSwivelBase.render(&backend, &overrides("C7")).unwrap_err();

    match err {
        PartError::Config(ConfigError::UnknownChoice { name, value, allowed }) => {
            assert_eq!(name, "type");
            assert_eq!(value, "C7");
            assert_eq!(allowed.len(), BaseType::ALL.len());
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_a1_volume_accounts_for_each_bore_inside_the_footprint() {
    let backend = MeshBackend::new(16, 1e-5);
    let layout = BaseType::A1.layout();

    let part = CameraSwivelBase
        .render(&backend, &overrides("A1"))
        .unwrap()
        .into_pieces()
        .remove(0);

    // Same base and tower, no bores
    let base = backend
        .cuboid(layout.footprint.size, layout.footprint.center)
        .unwrap();
    let pivot = Point3::new(0.0, layout.swivel_offset, 26.0);
    let cap = backend.rotate(
        &backend.cylinder(5.5, 4.0, Point3::origin()).unwrap(),
        Axis::Y,
        FRAC_PI_2,
    );
    let pin = backend.rotate(
        &backend.cylinder(1.7, 4.0, Point3::origin()).unwrap(),
        Axis::Y,
        FRAC_PI_2,
    );
    let tower = merge(
        &backend,
        &[
            backend
                .cuboid(Vector3::new(4.0, 11.0, 26.0), Point3::new(0.0, layout.swivel_offset, 13.0))
                .unwrap(),
            backend.translate(&cap, pivot.coords),
        ],
        &[backend.translate(&pin, pivot.coords)],
    )
    .unwrap();
    let body = merge(&backend, &[base, tower], &[]).unwrap();

    let library = ConnectorLibrary::new(&backend, StudBore::default(), AxleProfile::default());
    let bore = analyze(&library.stud_bore(Point3::origin()).unwrap()).volume;

    // Rows 2 and 3 of the A lattice fall outside the 16 mm deep footprint
    let inside = layout
        .stud_positions()
        .iter()
        .filter(|p| layout.footprint.contains_xy(p, 0.0))
        .count();
    assert_eq!(inside, 5);

    assert_relative_eq!(
        analyze(&part).volume,
        analyze(&body).volume - inside as f64 * bore,
        max_relative = 1e-6
    );
}

#[test]
fn test_tilt_keeps_the_part_above_the_floor() {
    let backend = MeshBackend::new(8, 1e-5);
    let mut map = overrides("A1");
    map.insert("tilt".into(), ParameterValue::Bool(true));

    let part = CameraSwivelBase
        .render(&backend, &map)
        .unwrap()
        .into_pieces()
        .remove(0);
    let bbox = backend.bounding_box(&part);
    assert_relative_eq!(bbox.min.z, 0.0, epsilon = 1e-6);
    assert!(is_closed(&part));
    // The tilted tower leans past the upright height
    assert!(bbox.max.z < 26.0 + 5.5);
}
