//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Grid iterators

use crate::grid::{TileCell, TileGrid};

/// Column-by-column iterator
pub struct GridIterator<'a> {
    grid: &'a TileGrid,
    column: u32,
    row: u32,
    finished: bool,
}

impl<'a> GridIterator<'a> {
    pub fn new(grid: &'a TileGrid) -> GridIterator<'a> {
        GridIterator {
            grid,
            column: 0,
            row: 0,
            finished: grid.columns == 0 || grid.rows == 0,
        }
    }
}

impl<'a> Iterator for GridIterator<'a> {
    type Item = TileCell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let current = self.grid.cell(self.column, self.row);
        if self.row < self.grid.rows - 1 {
            self.row += 1;
        } else if self.column < self.grid.columns - 1 {
            self.column += 1;
            self.row = 0;
        } else {
            self.finished = true;
        }
        Some(current)
    }
}

#[test]
fn test_column_order() {
    use crate::grid::Extent;
    let extent = Extent {
        minx: 0.0,
        miny: 0.0,
        maxx: 30.0,
        maxy: 20.0,
    };
    let grid = TileGrid::new(extent, 30, 20, 10).unwrap();
    let cells = grid
        .iter()
        .map(|cell| (cell.column, cell.row))
        .collect::<Vec<_>>();
    assert_eq!(
        cells,
        vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]
    );
}
