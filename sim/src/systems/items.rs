use bevy_math::{DVec2, IVec2};
use std::collections::HashMap;

use common::{
    components::{ItemId, ItemKind},
    maze::{MazeLayout, cell_center, wrap_cell},
    spatial::SpatialIndex,
};

// ============================================================================
// Item Map
// ============================================================================

// Dots and energizers still lying in the maze.
#[derive(Clone, Debug, Default)]
pub struct ItemMap {
    field: SpatialIndex<ItemId>,
    kinds: HashMap<ItemId, ItemKind>,
}

impl ItemMap {
    // Fresh set of collectibles for a level. Every energizer sits on top of a dot.
    #[must_use]
    pub fn from_layout(maze: &MazeLayout) -> Self {
        let mut items = Self::default();
        let placements = maze
            .dots
            .iter()
            .map(|cell| (*cell, ItemKind::Dot))
            .chain(maze.energizers.iter().map(|cell| (*cell, ItemKind::Energizer)));

        for (index, (cell, kind)) in placements.enumerate() {
            items.place(ItemId(index as u32), kind, cell);
        }
        items
    }

    pub fn place(&mut self, id: ItemId, kind: ItemKind, cell: IVec2) {
        self.field.insert(id, cell_center(cell));
        self.kinds.insert(id, kind);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    #[must_use]
    pub fn kind(&self, id: ItemId) -> Option<ItemKind> {
        self.kinds.get(&id).copied()
    }

    #[must_use]
    pub fn location_of(&self, id: ItemId) -> Option<DVec2> {
        self.field.location_of(id)
    }

    #[must_use]
    pub fn within(&self, pos: DVec2, radius: f64) -> Vec<ItemId> {
        self.field.neighbors_within(pos, radius)
    }

    // True if anything lies on the (tunnel-wrapped) cell.
    #[must_use]
    pub fn occupied(&self, cell: IVec2) -> bool {
        !self.field.objects_at(cell_center(wrap_cell(cell))).is_empty()
    }

    pub fn take(&mut self, id: ItemId) -> Option<ItemKind> {
        self.field.remove(id)?;
        self.kinds.remove(&id)
    }
}
