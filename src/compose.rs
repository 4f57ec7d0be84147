// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Boolean composition
//!
//! Every part is described as an ordered list of solids and an ordered list
//! of holes. [`merge`] unions the solids, unions the holes, and subtracts the
//! second from the first. Folds run in declaration order so that the same
//! inputs always produce the same mesh.

use crate::error::{GeometryError, GeometryResult};
use crate::geometry::GeometryBackend;
use tracing::debug;

/// Left-fold `items` with union; `None` when there is nothing to fold
pub fn union_all<B: GeometryBackend>(
    backend: &B,
    items: &[B::Solid],
) -> GeometryResult<Option<B::Solid>> {
    let Some((first, rest)) = items.split_first() else {
        return Ok(None);
    };

    let mut shape = first.clone();
    for item in rest {
        shape = backend.union(&shape, item)?;
    }
    Ok(Some(shape))
}

/// Union of `solids` minus the union of `holes`
pub fn merge<B: GeometryBackend>(
    backend: &B,
    solids: &[B::Solid],
    holes: &[B::Solid],
) -> GeometryResult<B::Solid> {
    if solids.is_empty() {
        return Err(GeometryError::EmptySolidSet);
    }
    debug!(
        backend = backend.name(),
        solids = solids.len(),
        holes = holes.len(),
        "merging"
    );

    let shape = union_all(backend, solids)?.ok_or(GeometryError::EmptySolidSet)?;
    match union_all(backend, holes)? {
        Some(cutter) => backend.subtract(&shape, &cutter),
        None => Ok(shape),
    }
}

/// Ordered solid and hole lists for one body
#[derive(Debug, Clone)]
pub struct Assembly<S> {
    solids: Vec<S>,
    holes: Vec<S>,
}

impl<S> Default for Assembly<S> {
    fn default() -> Self {
        Self {
            solids: Vec::new(),
            holes: Vec::new(),
        }
    }
}

impl<S: Clone> Assembly<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_solid(&mut self, solid: S) -> &mut Self {
        self.solids.push(solid);
        self
    }

    pub fn add_hole(&mut self, hole: S) -> &mut Self {
        self.holes.push(hole);
        self
    }

    pub fn extend_holes<I: IntoIterator<Item = S>>(&mut self, holes: I) -> &mut Self {
        self.holes.extend(holes);
        self
    }

    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    pub fn merge<B: GeometryBackend<Solid = S>>(&self, backend: &B) -> GeometryResult<S> {
        merge(backend, &self.solids, &self.holes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::analytics::analyze;
    use crate::geometry::{Mesh, MeshBackend};
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    fn cube(backend: &MeshBackend, size: f64, x: f64) -> Mesh {
        backend
            .cuboid(Vector3::new(size, size, size), Point3::new(x, 0.0, 0.0))
            .unwrap()
    }

    #[test]
    fn test_empty_solids_rejected() {
        let backend = MeshBackend::default();
        let hole = cube(&backend, 1.0, 0.0);
        assert_eq!(
            merge(&backend, &[], &[hole]).unwrap_err(),
            GeometryError::EmptySolidSet
        );
    }

    #[test]
    fn test_single_solid_without_holes_is_unchanged() {
        let backend = MeshBackend::default();
        let solid = cube(&backend, 8.0, 0.0);
        assert_eq!(merge(&backend, &[solid.clone()], &[]).unwrap(), solid);
    }

    #[test]
    fn test_holes_are_unioned_before_subtracting() {
        let backend = MeshBackend::default();
        let body = backend
            .cuboid(Vector3::new(16.0, 8.0, 8.0), Point3::origin())
            .unwrap();
        // Overlapping cutters
        let a = backend
            .cuboid(Vector3::new(4.0, 4.0, 10.0), Point3::new(-1.0, 0.0, 0.0))
            .unwrap();
        let b = backend
            .cuboid(Vector3::new(4.0, 4.0, 10.0), Point3::new(1.0, 0.0, 0.0))
            .unwrap();

        let result = merge(&backend, &[body], &[a, b]).unwrap();
        assert_relative_eq!(analyze(&result).volume, 16.0 * 64.0 - 6.0 * 4.0 * 8.0, epsilon = 1e-6);
    }

    #[test]
    fn test_assembly_builder() {
        let backend = MeshBackend::default();
        let mut assembly = Assembly::new();
        assembly
            .add_solid(cube(&backend, 8.0, 0.0))
            .add_solid(cube(&backend, 8.0, 8.0))
            .extend_holes([cube(&backend, 2.0, 4.0)]);
        assert_eq!(assembly.solid_count(), 2);
        assert_eq!(assembly.hole_count(), 1);

        let result = assembly.merge(&backend).unwrap();
        assert_relative_eq!(analyze(&result).volume, 1024.0 - 8.0, epsilon = 1e-6);
    }
}
