//! Occupancy quad-tree over the world rectangle.
//!
//! A pure observer: the tick pipeline never reads it. It answers "does
//! any agent occupy cell X" and "which occupied cells fall in this
//! rectangle" for diagnostics and visualisation without scanning the grid
//! index.

use crate::cell::{CellGrid, CellKey};
use crate::error::SpaceError;
use biocrowds_core::WorldExtent;

/// Points held by a leaf before it splits.
const NODE_CAPACITY: usize = 4;

/// Axis-aligned rectangle on the ground plane, `[x, x + width] × [z, z + height]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Minimum x.
    pub x: f32,
    /// Minimum z.
    pub z: f32,
    /// Extent along x.
    pub width: f32,
    /// Extent along z.
    pub height: f32,
}

impl Rect {
    /// Construct a rectangle from its minimum corner and size.
    pub fn new(x: f32, z: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            z,
            width,
            height,
        }
    }

    /// Whether the point lies inside, boundaries included.
    pub fn contains(&self, px: f32, pz: f32) -> bool {
        px >= self.x && px <= self.x + self.width && pz >= self.z && pz <= self.z + self.height
    }

    /// Whether the two rectangles share any point.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.z <= other.z + other.height
            && other.z <= self.z + self.height
    }

    fn quadrants(&self) -> [Rect; 4] {
        let hw = self.width * 0.5;
        let hh = self.height * 0.5;
        [
            Rect::new(self.x, self.z, hw, hh),
            Rect::new(self.x + hw, self.z, hw, hh),
            Rect::new(self.x, self.z + hh, hw, hh),
            Rect::new(self.x + hw, self.z + hh, hw, hh),
        ]
    }
}

#[derive(Clone, Debug)]
struct Node {
    bounds: Rect,
    depth: u32,
    items: Vec<(CellKey, f32, f32)>,
    children: Option<Box<[Node; 4]>>,
}

impl Node {
    fn new(bounds: Rect, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }

    fn insert(&mut self, item: (CellKey, f32, f32), max_depth: u32) -> bool {
        if !self.bounds.contains(item.1, item.2) {
            return false;
        }
        if self.children.is_none() {
            if self.items.len() < NODE_CAPACITY || self.depth >= max_depth {
                self.items.push(item);
                return true;
            }
            self.split(max_depth);
        }
        let placed = self
            .children
            .as_deref_mut()
            .is_some_and(|cs| cs.iter_mut().any(|c| c.insert(item, max_depth)));
        if !placed {
            // Rounding at a quadrant seam; keep it here.
            self.items.push(item);
        }
        true
    }

    fn split(&mut self, max_depth: u32) {
        let [a, b, c, d] = self.bounds.quadrants();
        let depth = self.depth + 1;
        let mut children = Box::new([
            Node::new(a, depth),
            Node::new(b, depth),
            Node::new(c, depth),
            Node::new(d, depth),
        ]);
        let items = std::mem::take(&mut self.items);
        for item in items {
            if !children.iter_mut().any(|c| c.insert(item, max_depth)) {
                self.items.push(item);
            }
        }
        self.children = Some(children);
    }

    fn find(&self, key: CellKey, px: f32, pz: f32) -> bool {
        if !self.bounds.contains(px, pz) {
            return false;
        }
        if self.items.iter().any(|(k, _, _)| *k == key) {
            return true;
        }
        self.children
            .as_deref()
            .is_some_and(|cs| cs.iter().any(|c| c.find(key, px, pz)))
    }

    fn query(&self, area: &Rect, out: &mut Vec<CellKey>) {
        if !self.bounds.intersects(area) {
            return;
        }
        out.extend(
            self.items
                .iter()
                .filter(|(_, x, z)| area.contains(*x, *z))
                .map(|(k, _, _)| *k),
        );
        if let Some(children) = self.children.as_deref() {
            for c in children.iter() {
                c.query(area, out);
            }
        }
    }

    fn max_depth(&self) -> u32 {
        match self.children.as_deref() {
            Some(cs) => cs.iter().map(Node::max_depth).max().unwrap_or(self.depth),
            None => self.depth,
        }
    }
}

/// Region quad-tree of occupied cells.
///
/// A cell belongs to the world when its half-open square `[min, min + w)`
/// overlaps the closed world rectangle on both axes, so the cells agents
/// clamped onto the far edge land in are accepted. Each cell is stored at
/// its centre pulled onto the world rectangle.
#[derive(Clone, Debug)]
pub struct QuadTree {
    grid: CellGrid,
    root: Node,
    max_depth: u32,
    len: usize,
}

impl QuadTree {
    /// An empty tree covering `extent`, splitting at most `max_depth` times.
    ///
    /// Returns `Err(SpaceError::InvalidExtent)` if the extent is degenerate.
    pub fn new(extent: WorldExtent, grid: CellGrid, max_depth: u32) -> Result<Self, SpaceError> {
        if !extent.is_valid() {
            return Err(SpaceError::InvalidExtent {
                x: extent.x,
                z: extent.z,
            });
        }
        Ok(Self {
            grid,
            root: Node::new(Rect::new(0.0, 0.0, extent.x, extent.z), 0),
            max_depth,
            len: 0,
        })
    }

    /// Drop every entry, keeping the bounds.
    pub fn reset(&mut self) {
        self.root = Node::new(self.root.bounds, 0);
        self.len = 0;
    }

    /// Where `key` sits in the tree, or `None` if the cell lies outside
    /// the world.
    fn anchor(&self, key: CellKey) -> Option<(f32, f32)> {
        let b = self.root.bounds;
        let half = self.grid.width() * 0.5;
        let c = self.grid.center(key);
        let overlaps = |centre: f32, max: f32| centre - half <= max && centre + half > 0.0;
        if !(overlaps(c.x, b.width) && overlaps(c.z, b.height)) {
            return None;
        }
        Some((c.x.clamp(0.0, b.width), c.z.clamp(0.0, b.height)))
    }

    /// Insert a cell. Returns `false` if the cell lies outside the world.
    pub fn insert(&mut self, key: CellKey) -> bool {
        let Some((x, z)) = self.anchor(key) else {
            return false;
        };
        let inserted = self.root.insert((key, x, z), self.max_depth);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Whether `key` was inserted since the last reset.
    pub fn contains(&self, key: CellKey) -> bool {
        self.anchor(key)
            .is_some_and(|(x, z)| self.root.find(key, x, z))
    }

    /// Number of cells inserted since the last reset.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no cells.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Occupied cells whose anchor lies in `area`, sorted.
    pub fn query(&self, area: &Rect) -> Vec<CellKey> {
        let mut out = Vec::new();
        self.root.query(area, &mut out);
        out.sort_unstable();
        out
    }

    /// Depth of the deepest node currently allocated.
    pub fn depth(&self) -> u32 {
        self.root.max_depth()
    }

    /// The configured split limit.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
