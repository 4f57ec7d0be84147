// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! CSG (Constructive Solid Geometry) operations using BSP trees
//!
//! Solids are converted to convex polygons, sorted into a BSP tree and
//! clipped against each other. Tree nodes live in an index arena and every
//! traversal uses an explicit work stack, so deep trees cannot overflow the
//! call stack.

use super::{Mesh, Triangle};
use nalgebra::{Point3, Vector3};
use std::collections::{HashMap, HashSet};
use std::mem;

/// Default tolerance for classifying points against a plane
pub const DEFAULT_EPSILON: f64 = 1e-5;

/// Largest sine of a fan corner angle still treated as a collinear sliver
const SLIVER_SINE: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
struct Plane {
    normal: Vector3<f64>,
    w: f64,
}

impl Plane {
    fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    fn distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) - self.w
    }
}

#[derive(Debug, Clone)]
struct Polygon {
    vertices: Vec<Point3<f64>>,
    plane: Plane,
}

impl Polygon {
    /// Build a polygon, or `None` when the points span no area.
    ///
    /// The plane comes from Newell's method, which tolerates slightly
    /// non-planar input better than a single cross product.
    fn new(vertices: Vec<Point3<f64>>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }

        let mut normal = Vector3::<f64>::zeros();
        for (i, current) in vertices.iter().enumerate() {
            let next = &vertices[(i + 1) % vertices.len()];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
        }

        let length = normal.norm();
        if !length.is_finite() || length < 1e-12 {
            return None;
        }
        let normal = normal / length;
        let w = normal.dot(&vertices[0].coords);

        Some(Self {
            vertices,
            plane: Plane { normal, w },
        })
    }

    fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }
}

/// Where a polygon ends up relative to a splitting plane
enum Split {
    CoplanarFront(Polygon),
    CoplanarBack(Polygon),
    Front(Polygon),
    Back(Polygon),
    Spanning {
        front: Option<Polygon>,
        back: Option<Polygon>,
    },
}

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

fn split_polygon(plane: &Plane, polygon: Polygon, epsilon: f64) -> Split {
    let types: Vec<u8> = polygon
        .vertices
        .iter()
        .map(|v| {
            let t = plane.distance(v);
            if t < -epsilon {
                BACK
            } else if t > epsilon {
                FRONT
            } else {
                COPLANAR
            }
        })
        .collect();
    let polygon_type = types.iter().fold(COPLANAR, |acc, t| acc | t);

    match polygon_type {
        COPLANAR => {
            if plane.normal.dot(&polygon.plane.normal) > 0.0 {
                Split::CoplanarFront(polygon)
            } else {
                Split::CoplanarBack(polygon)
            }
        }
        FRONT => Split::Front(polygon),
        BACK => Split::Back(polygon),
        _ => {
            let n = polygon.vertices.len();
            let mut front = Vec::with_capacity(n + 1);
            let mut back = Vec::with_capacity(n + 1);

            for i in 0..n {
                let j = (i + 1) % n;
                let (ti, tj) = (types[i], types[j]);
                let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);

                if ti != BACK {
                    front.push(vi);
                }
                if ti != FRONT {
                    back.push(vi);
                }
                if (ti | tj) == SPANNING {
                    let t = (plane.w - plane.normal.dot(&vi.coords))
                        / plane.normal.dot(&(vj - vi));
                    let v = vi + (vj - vi) * t;
                    front.push(v);
                    back.push(v);
                }
            }

            let piece = |vertices: Vec<Point3<f64>>| {
                (vertices.len() >= 3).then(|| Polygon {
                    vertices,
                    plane: polygon.plane,
                })
            };
            Split::Spanning {
                front: piece(front),
                back: piece(back),
            }
        }
    }
}

#[derive(Debug, Default)]
struct Node {
    plane: Option<Plane>,
    front: Option<usize>,
    back: Option<usize>,
    polygons: Vec<Polygon>,
}

/// BSP tree stored as an arena; node 0 is the root
struct BspTree {
    nodes: Vec<Node>,
    epsilon: f64,
}

impl BspTree {
    fn new(polygons: Vec<Polygon>, epsilon: f64) -> Self {
        let mut tree = Self {
            nodes: vec![Node::default()],
            epsilon,
        };
        tree.build(polygons);
        tree
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Insert polygons, extending the tree where they fall past a leaf
    fn build(&mut self, polygons: Vec<Polygon>) {
        let mut stack = vec![(0usize, polygons)];

        while let Some((index, polygons)) = stack.pop() {
            if polygons.is_empty() {
                continue;
            }

            let plane = match self.nodes[index].plane {
                Some(plane) => plane,
                None => {
                    let plane = polygons[0].plane;
                    self.nodes[index].plane = Some(plane);
                    plane
                }
            };

            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                match split_polygon(&plane, polygon, self.epsilon) {
                    Split::CoplanarFront(p) | Split::CoplanarBack(p) => {
                        self.nodes[index].polygons.push(p)
                    }
                    Split::Front(p) => front.push(p),
                    Split::Back(p) => back.push(p),
                    Split::Spanning { front: f, back: b } => {
                        front.extend(f);
                        back.extend(b);
                    }
                }
            }

            if !front.is_empty() {
                let child = self.child(index, true);
                stack.push((child, front));
            }
            if !back.is_empty() {
                let child = self.child(index, false);
                stack.push((child, back));
            }
        }
    }

    fn child(&mut self, index: usize, front: bool) -> usize {
        let existing = if front {
            self.nodes[index].front
        } else {
            self.nodes[index].back
        };
        if let Some(child) = existing {
            return child;
        }

        let child = self.nodes.len();
        self.nodes.push(Node::default());
        if front {
            self.nodes[index].front = Some(child);
        } else {
            self.nodes[index].back = Some(child);
        }
        child
    }

    /// Remove the parts of `polygons` that lie inside this tree's solid
    fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut result = Vec::with_capacity(polygons.len());
        let mut stack = vec![(0usize, polygons)];

        while let Some((index, polygons)) = stack.pop() {
            let node = &self.nodes[index];
            let Some(plane) = node.plane else {
                result.extend(polygons);
                continue;
            };

            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                match split_polygon(&plane, polygon, self.epsilon) {
                    Split::CoplanarFront(p) | Split::Front(p) => front.push(p),
                    Split::CoplanarBack(p) | Split::Back(p) => back.push(p),
                    Split::Spanning { front: f, back: b } => {
                        front.extend(f);
                        back.extend(b);
                    }
                }
            }

            match node.front {
                Some(child) => stack.push((child, front)),
                None => result.extend(front),
            }
            // Polygons behind a leaf are inside the solid and are dropped
            if let Some(child) = node.back {
                stack.push((child, back));
            }
        }

        result
    }

    /// Clip every polygon of this tree against `other`
    fn clip_to(&mut self, other: &BspTree) {
        for node in &mut self.nodes {
            let polygons = mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polygons);
        }
    }

    /// Turn the solid inside out
    fn invert(&mut self) {
        for node in &mut self.nodes {
            for polygon in &mut node.polygons {
                polygon.flip();
            }
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            mem::swap(&mut node.front, &mut node.back);
        }
    }

    fn all_polygons(&self) -> Vec<Polygon> {
        self.nodes
            .iter()
            .flat_map(|node| node.polygons.iter().cloned())
            .collect()
    }
}

fn mesh_to_polygons(mesh: &Mesh) -> Vec<Polygon> {
    mesh.triangles
        .iter()
        .filter_map(|tri| {
            Polygon::new(vec![
                mesh.vertices[tri.indices[0]].position,
                mesh.vertices[tri.indices[1]].position,
                mesh.vertices[tri.indices[2]].position,
            ])
        })
        .collect()
}

type CellKey = (i64, i64, i64);

fn cell_key(point: &Point3<f64>, cell_size: f64) -> CellKey {
    (
        (point.x / cell_size).floor() as i64,
        (point.y / cell_size).floor() as i64,
        (point.z / cell_size).floor() as i64,
    )
}

/// The 27 cells around and including `key`
fn neighbourhood(key: CellKey) -> impl Iterator<Item = CellKey> {
    (-1i64..=1).flat_map(move |dx| {
        (-1i64..=1).flat_map(move |dy| {
            (-1i64..=1).map(move |dz| (key.0 + dx, key.1 + dy, key.2 + dz))
        })
    })
}

/// Hands out one index per distinct position.
///
/// A point within `tolerance` of an earlier point reuses that point's index.
/// Neighbouring cells are searched too, so pairs straddling a cell boundary
/// still merge.
struct VertexWelder {
    tolerance: f64,
    cells: HashMap<CellKey, Vec<usize>>,
    points: Vec<Point3<f64>>,
}

impl VertexWelder {
    fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            cells: HashMap::new(),
            points: Vec::new(),
        }
    }

    fn insert(&mut self, point: Point3<f64>) -> usize {
        let key = cell_key(&point, self.tolerance);
        let limit = self.tolerance * self.tolerance;

        for cell in neighbourhood(key) {
            if let Some(bucket) = self.cells.get(&cell) {
                if let Some(&index) = bucket
                    .iter()
                    .find(|&&i| (self.points[i] - point).norm_squared() <= limit)
                {
                    return index;
                }
            }
        }

        let index = self.points.len();
        self.points.push(point);
        self.cells.entry(key).or_default().push(index);
        index
    }
}

/// Bucketed subset of the welded points, for segment queries
struct PointGrid {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl PointGrid {
    fn new(points: &[Point3<f64>], indices: &[usize], cell_size: f64) -> Self {
        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for &index in indices {
            cells
                .entry(cell_key(&points[index], cell_size))
                .or_default()
                .push(index);
        }
        Self { cell_size, cells }
    }

    /// Points strictly inside segment `a`-`b`, paired with their distance from `a`
    fn inside_segment(
        &self,
        points: &[Point3<f64>],
        a: usize,
        b: usize,
        tolerance: f64,
    ) -> Vec<(f64, usize)> {
        let start = points[a];
        let direction = points[b] - start;
        let length = direction.norm();
        if length <= 2.0 * tolerance {
            return Vec::new();
        }
        let unit = direction / length;

        // Samples at most half a cell apart, each checked with its neighbours
        let samples = (2.0 * length / self.cell_size).ceil() as usize + 1;
        let mut visited = HashSet::new();
        let mut found = Vec::new();

        for step in 0..=samples {
            let sample = start + direction * (step as f64 / samples as f64);
            for cell in neighbourhood(cell_key(&sample, self.cell_size)) {
                if !visited.insert(cell) {
                    continue;
                }
                let Some(bucket) = self.cells.get(&cell) else {
                    continue;
                };
                for &index in bucket {
                    if index == a || index == b {
                        continue;
                    }
                    let offset = points[index] - start;
                    let along = offset.dot(&unit);
                    if along <= tolerance || along >= length - tolerance {
                        continue;
                    }
                    if (offset - unit * along).norm() <= tolerance {
                        found.push((along, index));
                    }
                }
            }
        }

        found
    }
}

fn ring_edges(ring: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    (0..ring.len()).map(move |i| (ring[i], ring[(i + 1) % ring.len()]))
}

/// Split polygon edges at the vertices that lie along them.
///
/// A BSP split cuts one polygon but not its neighbour, which leaves the new
/// corner sitting inside the neighbour's edge. Such edges have no reversed
/// twin, and every stray corner is an endpoint of one, so only those edges and
/// endpoints are searched.
fn split_t_junctions(points: &[Point3<f64>], rings: &mut [Vec<usize>], tolerance: f64) {
    let directed: HashSet<(usize, usize)> = rings.iter().flat_map(|r| ring_edges(r)).collect();
    let open: HashSet<(usize, usize)> = directed
        .iter()
        .copied()
        .filter(|&(a, b)| !directed.contains(&(b, a)))
        .collect();
    if open.is_empty() {
        return;
    }

    let mut corners: Vec<usize> = open.iter().flat_map(|&(a, b)| [a, b]).collect();
    corners.sort_unstable();
    corners.dedup();

    let mean_length = open
        .iter()
        .map(|&(a, b)| (points[b] - points[a]).norm())
        .sum::<f64>()
        / open.len() as f64;
    let grid = PointGrid::new(points, &corners, mean_length.max(16.0 * tolerance));

    let mut repaired = 0usize;
    for ring in rings.iter_mut() {
        let mut expanded = Vec::with_capacity(ring.len());
        let mut changed = false;

        for (a, b) in ring_edges(ring) {
            expanded.push(a);
            if !open.contains(&(a, b)) {
                continue;
            }
            let mut inside = grid.inside_segment(points, a, b, tolerance);
            if !inside.is_empty() {
                inside.sort_by(|x, y| x.0.total_cmp(&y.0));
                expanded.extend(inside.into_iter().map(|(_, index)| index));
                changed = true;
            }
        }

        if changed {
            *ring = expanded;
            repaired += 1;
        }
    }

    tracing::trace!(open_edges = open.len(), repaired, "split T-junctions");
}

fn is_sliver(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> bool {
    let (ab, ac) = (b - a, c - a);
    ab.cross(&ac).norm() <= SLIVER_SINE * ab.norm() * ac.norm()
}

fn push_triangle(mesh: &mut Mesh, [a, b, c]: [usize; 3]) {
    if a != b && b != c && a != c {
        mesh.add_triangle(Triangle::new([a, b, c]));
    }
}

/// Triangulate a convex ring, fanning from its centroid when corners were
/// inserted along the edges next to the first corner
fn triangulate_ring(mesh: &mut Mesh, ring: &[usize]) {
    let corners: Vec<Point3<f64>> = ring.iter().map(|&i| mesh.vertices[i].position).collect();
    let clean_fan = (1..corners.len() - 1)
        .all(|k| !is_sliver(&corners[0], &corners[k], &corners[k + 1]));

    if clean_fan {
        for k in 1..ring.len() - 1 {
            push_triangle(mesh, [ring[0], ring[k], ring[k + 1]]);
        }
        return;
    }

    let sum = corners
        .iter()
        .fold(Vector3::<f64>::zeros(), |acc, corner| acc + corner.coords);
    let center = mesh.add_point(Point3::from(sum / corners.len() as f64));
    for (a, b) in ring_edges(ring) {
        push_triangle(mesh, [center, a, b]);
    }
}

/// Weld the polygons onto shared vertices, close T-junctions and triangulate
fn polygons_to_mesh(polygons: &[Polygon], epsilon: f64) -> Mesh {
    let mut welder = VertexWelder::new(epsilon);
    let mut rings: Vec<Vec<usize>> = polygons
        .iter()
        .filter_map(|polygon| {
            let mut ring: Vec<usize> = Vec::with_capacity(polygon.vertices.len());
            for vertex in &polygon.vertices {
                let index = welder.insert(*vertex);
                if ring.last() != Some(&index) {
                    ring.push(index);
                }
            }
            while ring.len() > 1 && ring.first() == ring.last() {
                ring.pop();
            }
            (ring.len() >= 3).then_some(ring)
        })
        .collect();

    let points = welder.points;
    split_t_junctions(&points, &mut rings, epsilon);

    let corner_count: usize = rings.iter().map(Vec::len).sum();
    let mut mesh = Mesh::with_capacity(points.len(), corner_count);
    for point in points {
        mesh.add_point(point);
    }
    for ring in &rings {
        triangulate_ring(&mut mesh, ring);
    }

    mesh.recompute_normals();
    mesh
}

fn trees(a: &Mesh, b: &Mesh, epsilon: f64) -> (BspTree, BspTree) {
    let tree_a = BspTree::new(mesh_to_polygons(a), epsilon);
    let tree_b = BspTree::new(mesh_to_polygons(b), epsilon);
    tracing::trace!(
        nodes_a = tree_a.node_count(),
        nodes_b = tree_b.node_count(),
        "built BSP trees"
    );
    (tree_a, tree_b)
}

/// Volume covered by either mesh
pub fn csg_union(a: &Mesh, b: &Mesh, epsilon: f64) -> Mesh {
    let (mut a, mut b) = trees(a, b, epsilon);

    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.build(b.all_polygons());

    polygons_to_mesh(&a.all_polygons(), epsilon)
}

/// Volume of `a` not covered by `b`
pub fn csg_difference(a: &Mesh, b: &Mesh, epsilon: f64) -> Mesh {
    let (mut a, mut b) = trees(a, b, epsilon);

    a.invert();
    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.build(b.all_polygons());
    a.invert();

    polygons_to_mesh(&a.all_polygons(), epsilon)
}

/// Volume covered by both meshes
pub fn csg_intersection(a: &Mesh, b: &Mesh, epsilon: f64) -> Mesh {
    let (mut a, mut b) = trees(a, b, epsilon);

    a.invert();
    b.clip_to(&a);
    b.invert();
    a.clip_to(&b);
    b.clip_to(&a);
    a.build(b.all_polygons());
    a.invert();

    polygons_to_mesh(&a.all_polygons(), epsilon)
}
