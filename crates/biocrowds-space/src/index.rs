//! Per-tick agent index: cell → agents and agent → position.

use crate::cell::{CellGrid, CellKey};
use crate::error::SpaceError;
use crate::quadtree::QuadTree;
use biocrowds_core::{Agent, AgentId, Vec3, WorldExtent};
use dashmap::DashMap;
use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::debug;

/// Agents listed under one cell key.
pub type CellMembers = SmallVec<[AgentId; 16]>;

/// Room reserved per agent when the position map is reallocated.
const POSITION_SLACK: usize = 2;

/// Cell keys written per agent: the home cell and its 8 neighbours.
const RING_LEN: usize = 9;

/// Grid index rebuilt from committed positions at the start of every tick.
///
/// Every agent is listed under its own cell and under each of the 8
/// neighbouring cells, so the members of an agent's home cell are exactly
/// the agents in that cell or an adjacent one. No second neighbour pass
/// is ever needed.
///
/// The backing maps are concurrent: [`GridIndex::rebuild`] fans out over
/// agents with rayon and each worker appends into the destination cell's
/// bucket. Buckets are sorted afterwards so readers see a deterministic
/// order regardless of worker interleaving.
#[derive(Debug)]
pub struct GridIndex {
    grid: CellGrid,
    cells: DashMap<CellKey, CellMembers>,
    positions: DashMap<AgentId, Vec3>,
    occupancy: QuadTree,
    reallocations: usize,
}

impl GridIndex {
    /// An empty index over `extent` with an occupancy tree of `quad_tree_depth`.
    pub fn new(
        grid: CellGrid,
        extent: WorldExtent,
        quad_tree_depth: u32,
    ) -> Result<Self, SpaceError> {
        Self::with_capacity(grid, extent, quad_tree_depth, 0)
    }

    /// Like [`GridIndex::new`], pre-sized for `agents` agents.
    pub fn with_capacity(
        grid: CellGrid,
        extent: WorldExtent,
        quad_tree_depth: u32,
        agents: usize,
    ) -> Result<Self, SpaceError> {
        Ok(Self {
            grid,
            cells: DashMap::with_capacity(agents * RING_LEN),
            positions: DashMap::with_capacity(agents * POSITION_SLACK),
            occupancy: QuadTree::new(extent, grid, quad_tree_depth)?,
            reallocations: 0,
        })
    }

    /// Rebuild both maps and the occupancy tree from `agents`.
    ///
    /// Maps smaller than the crowd are reallocated first; otherwise they
    /// are cleared and their storage reused. Never shrinks.
    pub fn rebuild(&mut self, agents: &[Agent]) {
        self.occupancy.reset();

        let n = agents.len();
        if self.positions.capacity() < n {
            self.positions = DashMap::with_capacity(n * POSITION_SLACK);
            self.cells = DashMap::with_capacity(n * RING_LEN);
            self.reallocations += 1;
            debug!(agents = n, "grid index maps reallocated");
        } else {
            self.positions.clear();
            self.cells.clear();
        }

        let grid = self.grid;
        let cells = &self.cells;
        let positions = &self.positions;
        agents.par_iter().for_each(|agent| {
            positions.insert(agent.id, agent.position);
            for key in grid.ring(grid.key_for(agent.position)) {
                cells.entry(key).or_default().push(agent.id);
            }
        });

        for mut entry in self.cells.iter_mut() {
            entry.value_mut().sort_unstable();
        }

        // Home cells only: the ring keys are listing slots, not occupancy.
        let mut occupied: Vec<CellKey> = agents.iter().map(|a| grid.key_for(a.position)).collect();
        occupied.sort_unstable();
        occupied.dedup();
        for key in occupied {
            self.occupancy.insert(key);
        }

        debug!(
            agents = n,
            cells = self.cells.len(),
            occupied = self.occupancy.len(),
            "grid index rebuilt"
        );
    }

    /// The key scheme in use.
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Agents listed under `key`, sorted by id. Empty if none.
    pub fn members(&self, key: CellKey) -> CellMembers {
        self.cells
            .get(&key)
            .map(|m| m.value().clone())
            .unwrap_or_default()
    }

    /// Agents in the same or an adjacent cell as `id`, excluding `id`.
    ///
    /// Empty if `id` was not indexed this tick.
    pub fn neighbours(&self, id: AgentId) -> CellMembers {
        match self.key_of(id) {
            Some(key) => {
                let mut m = self.members(key);
                m.retain(|other| *other != id);
                m
            }
            None => CellMembers::new(),
        }
    }

    /// Indexed position of `id`.
    pub fn position(&self, id: AgentId) -> Option<Vec3> {
        self.positions.get(&id).map(|p| *p.value())
    }

    /// Home cell of `id`.
    pub fn key_of(&self, id: AgentId) -> Option<CellKey> {
        self.position(id).map(|p| self.grid.key_for(p))
    }

    /// Whether any agent is listed under `key`.
    pub fn is_marked(&self, key: CellKey) -> bool {
        self.cells.contains_key(&key)
    }

    /// Occupancy observer filled by the last rebuild.
    pub fn occupancy(&self) -> &QuadTree {
        &self.occupancy
    }

    /// Number of agents indexed by the last rebuild.
    pub fn agent_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of distinct cell keys written by the last rebuild.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Current capacity of the position map.
    pub fn capacity(&self) -> usize {
        self.positions.capacity()
    }

    /// How many times the maps were reallocated for a larger crowd.
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn index() -> GridIndex {
        GridIndex::new(
            CellGrid::new(2.0).unwrap(),
            WorldExtent::new(100.0, 50.0),
            4,
        )
        .unwrap()
    }

    fn agent(id: u32, x: f32, z: f32) -> Agent {
        Agent::new(AgentId(id), Vec3::new(x, 0.0, z))
    }

    #[test]
    fn agent_is_listed_in_its_ring() {
        let mut idx = index();
        idx.rebuild(&[agent(0, 5.0, 5.0)]);
        assert_eq!(idx.cell_count(), 9);
        let home = idx.key_of(AgentId(0)).unwrap();
        assert_eq!(home, CellKey::new(5, 5));
        for key in idx.grid().ring(home) {
            assert_eq!(idx.members(key).as_slice(), &[AgentId(0)]);
        }
        assert!(idx.members(CellKey::new(9, 5)).is_empty());
    }

    #[test]
    fn adjacent_agents_see_each_other() {
        let mut idx = index();
        idx.rebuild(&[agent(0, 1.0, 1.0), agent(1, 3.5, 1.0), agent(2, 9.0, 9.0)]);
        assert_eq!(idx.neighbours(AgentId(0)).as_slice(), &[AgentId(1)]);
        assert_eq!(idx.neighbours(AgentId(1)).as_slice(), &[AgentId(0)]);
        assert!(idx.neighbours(AgentId(2)).is_empty());
    }

    #[test]
    fn rebuild_discards_previous_tick() {
        let mut idx = index();
        idx.rebuild(&[agent(0, 1.0, 1.0)]);
        idx.rebuild(&[agent(0, 41.0, 21.0)]);
        assert!(!idx.is_marked(CellKey::new(1, 1)));
        assert_eq!(idx.position(AgentId(0)), Some(Vec3::new(41.0, 0.0, 21.0)));
        assert_eq!(idx.agent_count(), 1);
    }

    #[test]
    fn undersized_maps_are_reallocated_and_never_shrunk() {
        let mut idx = index();
        let crowd: Vec<_> = (0..64).map(|i| agent(i, (i % 50) as f32, 3.0)).collect();
        idx.rebuild(&crowd);
        assert_eq!(idx.reallocations(), 1);
        assert!(idx.capacity() >= 64);
        let cap = idx.capacity();
        idx.rebuild(&crowd[..4]);
        assert_eq!(idx.reallocations(), 1);
        assert!(idx.capacity() >= cap);
        assert_eq!(idx.agent_count(), 4);
    }

    #[test]
    fn occupancy_tracks_home_cells_only() {
        let mut idx = index();
        idx.rebuild(&[agent(0, 0.5, 0.5), agent(1, 1.5, 0.2)]);
        assert!(idx.occupancy().contains(CellKey::new(1, 1)));
        // Ring cells are listed for neighbour lookups but nobody stands there.
        assert!(idx.is_marked(CellKey::new(3, 3)));
        assert!(!idx.occupancy().contains(CellKey::new(3, 3)));
        assert!(idx.is_marked(CellKey::new(-1, -1)));
        assert!(!idx.occupancy().contains(CellKey::new(-1, -1)));
        assert_eq!(idx.occupancy().len(), 1);
    }

    #[test]
    fn agent_on_far_edge_is_occupying() {
        let mut idx = index();
        idx.rebuild(&[agent(0, 100.0, 50.0)]);
        let home = idx.key_of(AgentId(0)).unwrap();
        assert_eq!(home, CellKey::new(101, 51));
        assert!(idx.occupancy().contains(home));
        assert_eq!(idx.occupancy().len(), 1);
    }

    #[test]
    fn buckets_are_sorted() {
        let mut idx = index();
        let crowd: Vec<_> = (0..20).rev().map(|i| agent(i, 10.0, 10.0)).collect();
        idx.rebuild(&crowd);
        let m = idx.members(CellKey::new(11, 11));
        assert_eq!(m.len(), 20);
        assert!(m.windows(2).all(|w| w[0] < w[1]));
    }

    proptest! {
        #[test]
        fn neighbour_queries_are_symmetric(
            ax in 0.0f32..100.0, az in 0.0f32..50.0,
            bx in 0.0f32..100.0, bz in 0.0f32..50.0,
        ) {
            let mut idx = index();
            idx.rebuild(&[agent(0, ax, az), agent(1, bx, bz)]);
            let a_sees_b = idx.neighbours(AgentId(0)).contains(&AgentId(1));
            let b_sees_a = idx.neighbours(AgentId(1)).contains(&AgentId(0));
            prop_assert_eq!(a_sees_b, b_sees_a);

            let ka = idx.key_of(AgentId(0)).unwrap();
            let kb = idx.key_of(AgentId(1)).unwrap();
            prop_assert_eq!(a_sees_b, ka.is_adjacent(&kb));
        }

        #[test]
        fn far_apart_agents_are_invisible(
            ax in 0.0f32..40.0, az in 0.0f32..20.0,
            dx in 4.01f32..50.0, dz in 4.01f32..25.0,
        ) {
            let mut idx = index();
            idx.rebuild(&[agent(0, ax, az), agent(1, ax + dx, az + dz)]);
            prop_assert!(!idx.neighbours(AgentId(0)).contains(&AgentId(1)));
            prop_assert!(!idx.neighbours(AgentId(1)).contains(&AgentId(0)));
        }
    }
}
