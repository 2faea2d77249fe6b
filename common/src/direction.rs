use bevy_math::{DVec2, IVec2};

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

// Movement direction on the maze grid. The discriminant order is used for score indexing and
// every tie-break, so it must stay North, East, South, West.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    // Unit step in grid coordinates. North is towards row 0.
    #[must_use]
    pub const fn offset(self) -> IVec2 {
        match self {
            Self::North => IVec2::new(0, -1),
            Self::East => IVec2::new(1, 0),
            Self::South => IVec2::new(0, 1),
            Self::West => IVec2::new(-1, 0),
        }
    }

    #[must_use]
    pub fn unit(self) -> DVec2 {
        self.offset().as_dvec2()
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    // Quarter turn clockwise (used by the death spin).
    #[must_use]
    pub const fn rotated(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::East | Self::West)
    }
}
