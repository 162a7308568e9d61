/// Difficulty class of a shape, used by the bag generator's weighted
/// sampling. Weights shift with board fill (see `bag`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Immutable named polyomino template: cell offsets relative to the
/// placement anchor. Offsets are arbitrary integers; the catalog below
/// happens to keep them 0-based.
#[derive(Debug, PartialEq, Eq)]
pub struct Shape {
    pub id: &'static str,
    pub difficulty: Difficulty,
    pub cells: &'static [(i32, i32)],
}

impl Shape {
    pub fn cell_count(&self) -> u32 {
        self.cells.len() as u32
    }

    pub fn width(&self) -> i32 {
        let min = self.cells.iter().map(|&(_, c)| c).min().unwrap_or(0);
        let max = self.cells.iter().map(|&(_, c)| c).max().unwrap_or(0);
        max - min + 1
    }

    pub fn height(&self) -> i32 {
        let min = self.cells.iter().map(|&(r, _)| r).min().unwrap_or(0);
        let max = self.cells.iter().map(|&(r, _)| r).max().unwrap_or(0);
        max - min + 1
    }
}

/// The fixed shape library: single cell through 3×3 block, lines up to
/// length 5 in both orientations, small and large L. No zigzag or T.
pub const CATALOG: &[Shape] = &[
    Shape {
        id: "one",
        difficulty: Difficulty::Easy,
        cells: &[(0, 0)],
    },
    Shape {
        id: "line2h",
        difficulty: Difficulty::Easy,
        cells: &[(0, 0), (0, 1)],
    },
    Shape {
        id: "line2v",
        difficulty: Difficulty::Easy,
        cells: &[(0, 0), (1, 0)],
    },
    Shape {
        id: "line3h",
        difficulty: Difficulty::Easy,
        cells: &[(0, 0), (0, 1), (0, 2)],
    },
    Shape {
        id: "line3v",
        difficulty: Difficulty::Easy,
        cells: &[(0, 0), (1, 0), (2, 0)],
    },
    Shape {
        id: "square2",
        difficulty: Difficulty::Medium,
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
    },
    Shape {
        id: "l3",
        difficulty: Difficulty::Medium,
        cells: &[(0, 0), (1, 0), (1, 1)],
    },
    Shape {
        id: "l4",
        difficulty: Difficulty::Medium,
        cells: &[(0, 0), (1, 0), (2, 0), (2, 1)],
    },
    Shape {
        id: "line4h",
        difficulty: Difficulty::Medium,
        cells: &[(0, 0), (0, 1), (0, 2), (0, 3)],
    },
    Shape {
        id: "line4v",
        difficulty: Difficulty::Medium,
        cells: &[(0, 0), (1, 0), (2, 0), (3, 0)],
    },
    Shape {
        id: "line5h",
        difficulty: Difficulty::Hard,
        cells: &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)],
    },
    Shape {
        id: "line5v",
        difficulty: Difficulty::Hard,
        cells: &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)],
    },
    Shape {
        id: "square3",
        difficulty: Difficulty::Hard,
        cells: &[
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 0),
            (1, 1),
            (1, 2),
            (2, 0),
            (2, 1),
            (2, 2),
        ],
    },
];

pub fn shape_by_id(id: &str) -> Option<&'static Shape> {
    CATALOG.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_unique() {
        let ids: HashSet<&str> = CATALOG.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), CATALOG.len());
    }

    #[test]
    fn test_catalog_shapes_nonempty_and_distinct_cells() {
        for shape in CATALOG {
            assert!(!shape.cells.is_empty(), "shape {} has no cells", shape.id);
            let unique: HashSet<(i32, i32)> = shape.cells.iter().copied().collect();
            assert_eq!(
                unique.len(),
                shape.cells.len(),
                "shape {} has duplicate cells",
                shape.id
            );
        }
    }

    #[test]
    fn test_every_difficulty_represented() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert!(CATALOG.iter().any(|s| s.difficulty == difficulty));
        }
    }

    #[test]
    fn test_bounding_boxes() {
        let single = shape_by_id("one").unwrap();
        assert_eq!((single.width(), single.height()), (1, 1));

        let line5h = shape_by_id("line5h").unwrap();
        assert_eq!((line5h.width(), line5h.height()), (5, 1));

        let square3 = shape_by_id("square3").unwrap();
        assert_eq!((square3.width(), square3.height()), (3, 3));
        assert_eq!(square3.cell_count(), 9);

        let l4 = shape_by_id("l4").unwrap();
        assert_eq!((l4.width(), l4.height()), (2, 3));
    }

    #[test]
    fn test_shape_by_id_unknown() {
        assert!(shape_by_id("zigzag").is_none());
    }
}
