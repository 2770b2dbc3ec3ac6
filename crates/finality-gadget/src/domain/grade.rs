//! Grade of finality lattice and its atomic storage cell.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Discrete confidence level that an entity will never be reverted.
///
/// Totally ordered: `None < Low < Medium < High`.
#[repr(u8)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum GradeOfFinality {
    #[default]
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl GradeOfFinality {
    /// All grades in ascending order.
    pub const ALL: [Self; 4] = [Self::None, Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            0 => Some(Self::None),
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for GradeOfFinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(name)
    }
}

/// Outcome of a compare-and-raise on a [`GradeCell`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Raise {
    /// Value held before the raise.
    pub previous: GradeOfFinality,
    /// Value held after the raise.
    pub current: GradeOfFinality,
}

impl Raise {
    /// Whether the stored value strictly increased.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.current > self.previous
    }

    /// Whether this raise moved the value from below `level` to at least `level`.
    ///
    /// Exactly one raise per cell can cross a given level.
    #[must_use]
    pub fn crossed(&self, level: GradeOfFinality) -> bool {
        self.previous < level && self.current >= level
    }
}

/// Grade of finality stored so that concurrent writers can only raise it.
#[derive(Debug, Default)]
pub struct GradeCell(AtomicU8);

impl GradeCell {
    #[must_use]
    pub const fn new(grade: GradeOfFinality) -> Self {
        Self(AtomicU8::new(grade.rank()))
    }

    #[must_use]
    pub fn get(&self) -> GradeOfFinality {
        // Only ranks produced by `GradeOfFinality::rank` are ever stored.
        GradeOfFinality::from_rank(self.0.load(Ordering::Acquire)).unwrap_or_default()
    }

    /// Atomically replace the stored grade with `max(stored, candidate)`.
    pub fn raise(&self, candidate: GradeOfFinality) -> Raise {
        let previous = self.0.fetch_max(candidate.rank(), Ordering::AcqRel);
        let previous = GradeOfFinality::from_rank(previous).unwrap_or_default();
        Raise {
            previous,
            current: previous.max(candidate),
        }
    }
}

/// Implemented by every metadata record that carries a grade of finality.
pub trait HasGradeOfFinality {
    /// Storage backing the grade.
    fn grade_cell(&self) -> &GradeCell;

    fn grade_of_finality(&self) -> GradeOfFinality {
        self.grade_cell().get()
    }

    /// Raise the grade to `candidate` if it is strictly higher than the stored one.
    fn raise_grade_of_finality(&self, candidate: GradeOfFinality) -> Raise {
        self.grade_cell().raise(candidate)
    }
}
