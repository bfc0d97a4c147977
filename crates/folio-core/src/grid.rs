//! Uniform-grid broad phase for the pairwise force pass.

use fnv::FnvHashMap;
use glam::Vec2;
use smallvec::SmallVec;

type Cell = (i32, i32);

/// Buckets entity indices by cell so neighbour queries only visit the
/// cells overlapping the query radius.
pub struct SpatialGrid {
    cell_size: f32,
    cells: FnvHashMap<Cell, SmallVec<[u32; 8]>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: FnvHashMap::default(),
        }
    }

    #[inline]
    fn cell_of(&self, p: Vec2) -> Cell {
        (
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    pub fn rebuild<'a>(&mut self, positions: impl Iterator<Item = &'a Vec2>) {
        // keep bucket allocations between frames
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        for (i, p) in positions.enumerate() {
            if !p.is_finite() {
                continue;
            }
            let c = self.cell_of(*p);
            self.cells.entry(c).or_default().push(i as u32);
        }
    }

    /// Calls `f` with every indexed entity whose cell overlaps the disc.
    /// Callers still check the exact distance.
    pub fn for_each_near(&self, p: Vec2, radius: f32, mut f: impl FnMut(usize)) {
        let (cx0, cy0) = self.cell_of(p - Vec2::splat(radius));
        let (cx1, cy1) = self.cell_of(p + Vec2::splat(radius));
        for cx in cx0..=cx1 {
            for cy in cy0..=cy1 {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    for &i in bucket {
                        f(i as usize);
                    }
                }
            }
        }
    }
}
