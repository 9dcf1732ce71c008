//! Uniform grid acceleration structure.
//!
//! Objects are bucketed into the cells of a regular 3D grid laid over their
//! combined bounding box. A ray walks the cells it crosses in order (3D-DDA)
//! and only tests the objects registered in those cells.
//!
//! The grid must be compiled with [`Grid::setup_cells`] after the last object
//! is added and before rendering starts. Adding objects afterwards leaves the
//! cells stale; a stale grid falls back to brute-force testing until it is
//! compiled again.

use std::sync::Arc;

use super::{nearest_hit, nearest_shadow_hit, GeometricObject};
use crate::{Hit, Material};
use wray_math::{Aabb, Interval, Ray, K_EPSILON};

/// Cells per object along each axis, before rounding.
pub const DEFAULT_GRID_MULTIPLIER: f32 = 2.0;

/// Upper bound on cells along one axis, so that very flat scenes cannot
/// allocate an unbounded number of cells.
const MAX_CELLS_PER_AXIS: usize = 256;

/// DDA state for one axis.
#[derive(Debug, Clone, Copy)]
struct AxisWalk {
    /// Ray parameter at which the ray leaves the current cell along this axis
    next: f32,
    /// Parameter increment between successive cell boundaries
    delta: f32,
    step: isize,
    stop: isize,
}

/// A regular grid of cells over a set of objects.
pub struct Grid {
    objects: Vec<Box<dyn GeometricObject>>,
    /// Indices of objects without a bounding box (planes); always tested
    unbounded: Vec<usize>,
    /// Object indices per cell, `x + nx * (y + ny * z)`
    cells: Vec<Vec<u32>>,
    bbox: Aabb,
    counts: [usize; 3],
    multiplier: f32,
    compiled: bool,
    shadows: bool,
}

impl Grid {
    /// Create a new empty grid.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            unbounded: Vec::new(),
            cells: Vec::new(),
            bbox: Aabb::EMPTY,
            counts: [0; 3],
            multiplier: DEFAULT_GRID_MULTIPLIER,
            compiled: false,
            shadows: true,
        }
    }

    /// Set the cell density multiplier (cells per object along each axis).
    pub fn with_multiplier(mut self, multiplier: f32) -> Self {
        self.multiplier = multiplier.max(f32::MIN_POSITIVE);
        self
    }

    /// Enable or disable shadow casting for the whole grid.
    pub fn with_shadows(mut self, shadows: bool) -> Self {
        self.shadows = shadows;
        self
    }

    /// Add an object. Call [`setup_cells`](Grid::setup_cells) once all objects are in.
    pub fn add_object(&mut self, object: Box<dyn GeometricObject>) {
        if self.compiled {
            log::warn!("Object added to a compiled grid; cells are stale until setup_cells runs again");
            self.compiled = false;
        }
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the grid has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether the cells reflect the current object set.
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Number of cells along x, y and z.
    pub fn cell_counts(&self) -> [usize; 3] {
        self.counts
    }

    /// Build the cells from the current object set.
    ///
    /// Cell counts follow the object density: with `n` bounded objects in a box
    /// of size `w`, the cell edge is `s = cbrt(wx * wy * wz / n)` and each axis
    /// gets `trunc(multiplier * w / s) + 1` cells. Every object is registered in
    /// all cells its bounding box overlaps.
    pub fn setup_cells(&mut self) {
        self.unbounded.clear();
        self.cells.clear();

        let mut bounded = Vec::with_capacity(self.objects.len());
        for (index, object) in self.objects.iter().enumerate() {
            match object.bounding_box() {
                Some(bbox) => bounded.push((index, bbox)),
                None => self.unbounded.push(index),
            }
        }

        if bounded.is_empty() {
            self.bbox = Aabb::EMPTY;
            self.counts = [0; 3];
            self.compiled = true;
            return;
        }

        self.bbox = bounded
            .iter()
            .fold(Aabb::EMPTY, |acc, (_, b)| Aabb::surrounding(&acc, b))
            .padded(K_EPSILON);

        let size = self.bbox.size();
        let s = (size.x * size.y * size.z / bounded.len() as f32).cbrt();
        for axis in 0..3 {
            let n = (self.multiplier * size[axis] / s) as usize + 1;
            self.counts[axis] = n.min(MAX_CELLS_PER_AXIS);
        }

        let [nx, ny, nz] = self.counts;
        self.cells = vec![Vec::new(); nx * ny * nz];

        for (index, bbox) in &bounded {
            let lo = [0, 1, 2].map(|axis| self.cell_index(bbox.axis_interval(axis).min, axis));
            let hi = [0, 1, 2].map(|axis| self.cell_index(bbox.axis_interval(axis).max, axis));

            for iz in lo[2]..=hi[2] {
                for iy in lo[1]..=hi[1] {
                    for ix in lo[0]..=hi[0] {
                        let offset = self.cell_offset(ix, iy, iz);
                        self.cells[offset].push(*index as u32);
                    }
                }
            }
        }

        self.compiled = true;

        let empty = self.cells.iter().filter(|c| c.is_empty()).count();
        log::info!(
            "Grid: {} objects ({} unbounded) in {}x{}x{} cells, {} empty",
            self.objects.len(),
            self.unbounded.len(),
            nx,
            ny,
            nz,
            empty
        );
    }

    /// Cell containing coordinate `v` along `axis`, clamped to the grid.
    fn cell_index(&self, v: f32, axis: usize) -> usize {
        let slab = self.bbox.axis_interval(axis);
        let n = self.counts[axis];
        let cell = ((v - slab.min) * n as f32 / slab.size()) as isize;
        cell.clamp(0, n as isize - 1) as usize
    }

    #[inline]
    fn cell_offset(&self, ix: usize, iy: usize, iz: usize) -> usize {
        ix + self.counts[0] * (iy + self.counts[1] * iz)
    }

    fn unbounded_objects(&self) -> impl Iterator<Item = &Box<dyn GeometricObject>> {
        self.unbounded.iter().map(|&i| &self.objects[i])
    }

    fn cell_objects<'a>(&'a self, cell: &'a [u32]) -> impl Iterator<Item = &'a Box<dyn GeometricObject>> {
        cell.iter().map(|&i| &self.objects[i as usize])
    }

    /// Walk the cells along `ray` in order, calling `probe` on each non-empty
    /// cell with the interval still worth searching.
    ///
    /// `probe` returns the nearest hit in the cell. The walk stops as soon as
    /// the best hit so far lies at or before the exit of the current cell,
    /// since every later cell is further along the ray.
    fn traverse<'a, R>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        mut probe: impl FnMut(&'a [u32], Interval) -> Option<R>,
        t_of: impl Fn(&R) -> f32,
    ) -> Option<R> {
        if self.cells.is_empty() {
            return None;
        }

        let range = self
            .bbox
            .hit_range(ray, Interval::new(f32::NEG_INFINITY, ray_t.max))?;
        if range.max <= ray_t.min {
            return None;
        }

        let origin = ray.origin();
        let dir = ray.direction();
        let start = if self.bbox.contains(origin) {
            origin
        } else {
            ray.at(range.min)
        };

        let mut index = [0isize; 3];
        let mut walk = [AxisWalk {
            next: f32::INFINITY,
            delta: f32::INFINITY,
            step: -1,
            stop: -1,
        }; 3];

        for axis in 0..3 {
            let slab = self.bbox.axis_interval(axis);
            let n = self.counts[axis] as isize;
            let i = self.cell_index(start[axis], axis) as isize;
            let (o, d) = (origin[axis], dir[axis]);
            index[axis] = i;

            if d > 0.0 {
                let t_min = (slab.min - o) / d;
                let delta = slab.size() / (n as f32 * d);
                walk[axis] = AxisWalk {
                    next: t_min + (i + 1) as f32 * delta,
                    delta,
                    step: 1,
                    stop: n,
                };
            } else if d < 0.0 {
                let t_min = (slab.max - o) / d;
                let delta = slab.size() / (n as f32 * -d);
                walk[axis] = AxisWalk {
                    next: t_min + (n - i) as f32 * delta,
                    delta,
                    step: -1,
                    stop: -1,
                };
            }
            // d == 0: the ray never crosses a boundary on this axis
        }

        let mut best: Option<R> = None;
        let mut best_t = ray_t.max;

        loop {
            let offset = self.cell_offset(index[0] as usize, index[1] as usize, index[2] as usize);
            let cell = &self.cells[offset];
            if !cell.is_empty() {
                if let Some(found) = probe(cell.as_slice(), ray_t.with_max(best_t)) {
                    best_t = t_of(&found);
                    best = Some(found);
                }
            }

            let axis = if walk[0].next < walk[1].next && walk[0].next < walk[2].next {
                0
            } else if walk[1].next < walk[2].next {
                1
            } else {
                2
            };

            if best_t <= walk[axis].next {
                return best;
            }

            index[axis] += walk[axis].step;
            if index[axis] == walk[axis].stop {
                return best;
            }
            walk[axis].next += walk[axis].delta;
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometricObject for Grid {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<Hit<'a>> {
        if !self.compiled {
            return nearest_hit(&self.objects, ray, ray_t);
        }

        let from_cells = self.traverse(
            ray,
            ray_t,
            |cell, interval| nearest_hit(self.cell_objects(cell), ray, interval),
            |hit| hit.t,
        );

        let max = from_cells.as_ref().map_or(ray_t.max, |hit| hit.t);
        nearest_hit(self.unbounded_objects(), ray, ray_t.with_max(max)).or(from_cells)
    }

    fn shadow_hit(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        if !self.shadows {
            return None;
        }
        if !self.compiled {
            return nearest_shadow_hit(&self.objects, ray, ray_t);
        }

        let from_cells = self.traverse(
            ray,
            ray_t,
            |cell, interval| nearest_shadow_hit(self.cell_objects(cell), ray, interval),
            |t| *t,
        );

        let max = from_cells.unwrap_or(ray_t.max);
        nearest_shadow_hit(self.unbounded_objects(), ray, ray_t.with_max(max)).or(from_cells)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        if !self.unbounded.is_empty() || self.objects.iter().any(|o| o.bounding_box().is_none()) {
            return None;
        }
        self.objects
            .iter()
            .filter_map(|o| o.bounding_box())
            .reduce(|acc, b| Aabb::surrounding(&acc, &b))
    }

    fn casts_shadows(&self) -> bool {
        self.shadows
    }

    fn set_material(&mut self, material: Arc<dyn Material>) {
        for object in &mut self.objects {
            object.set_material(material.clone());
        }
    }
}
