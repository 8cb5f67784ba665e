//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::grid::{Extent, GridError, TileGrid};

fn utm_km() -> Extent {
    Extent {
        minx: 500000.0,
        miny: 5900000.0,
        maxx: 501000.0,
        maxy: 5901000.0,
    }
}

#[test]
fn test_dimensions() {
    let grid = TileGrid::new(utm_km(), 4000, 4000, 1000).unwrap();
    assert_eq!((grid.columns, grid.rows), (4, 4));
    assert_eq!(grid.len(), 16);

    let grid = TileGrid::new(utm_km(), 12000, 12000, 1000).unwrap();
    assert_eq!((grid.columns, grid.rows), (12, 12));

    let grid = TileGrid::new(utm_km(), 1001, 999, 1000).unwrap();
    assert_eq!((grid.columns, grid.rows), (2, 1));
    assert_eq!(grid.column_width(0), 1000);
    assert_eq!(grid.column_width(1), 1);
    assert_eq!(grid.row_height(0), 999);
}

#[test]
fn test_empty_grid() {
    assert_eq!(
        TileGrid::new(utm_km(), 0, 100, 1000).err(),
        Some(GridError::Dimension {
            columns: 0,
            rows: 1
        })
    );
    assert_eq!(
        TileGrid::new(utm_km(), 100, 100, 0).err(),
        Some(GridError::Dimension {
            columns: 0,
            rows: 0
        })
    );
}

#[test]
fn test_remainder_sums() {
    let grid = TileGrid::new(utm_km(), 2345, 1234, 500).unwrap();
    for row in 0..grid.rows {
        let sum: u32 = (0..grid.columns).map(|col| grid.cell(col, row).width).sum();
        assert_eq!(sum, 2345);
    }
    for col in 0..grid.columns {
        let sum: u32 = (0..grid.rows).map(|row| grid.cell(col, row).height).sum();
        assert_eq!(sum, 1234);
    }
    for cell in grid.iter() {
        assert!(cell.width <= 500 && cell.height <= 500);
        assert!(cell.validate().is_ok());
    }
}

#[test]
fn test_cell_extents() {
    let grid = TileGrid::new(utm_km(), 4000, 4000, 1000).unwrap();
    let first = grid.cell(0, 0);
    assert_eq!(
        first.extent,
        Extent {
            minx: 500000.0,
            miny: 5900750.0,
            maxx: 500250.0,
            maxy: 5901000.0,
        }
    );
    assert_eq!((first.pixel_x, first.pixel_y), (0, 0));

    let last = grid.cell(3, 3);
    assert_eq!(
        last.extent,
        Extent {
            minx: 500750.0,
            miny: 5900000.0,
            maxx: 501000.0,
            maxy: 5900250.0,
        }
    );
    assert_eq!((last.pixel_x, last.pixel_y), (3000, 3000));
}

#[test]
fn test_union_covers_extent() {
    let grid = TileGrid::new(utm_km(), 2345, 1234, 500).unwrap();
    let covered: f64 = grid
        .iter()
        .map(|cell| cell.extent.width() * cell.extent.height())
        .sum();
    let total = utm_km().width() * utm_km().height();
    assert!((covered - total).abs() < 1e-2);
    let minx = grid.iter().map(|c| c.extent.minx).fold(f64::MAX, f64::min);
    let maxy = grid.iter().map(|c| c.extent.maxy).fold(f64::MIN, f64::max);
    assert_eq!(minx, 500000.0);
    assert_eq!(maxy, 5901000.0);
}

#[test]
fn test_invalid_cell() {
    let grid = TileGrid::new(utm_km(), 10, 10, 10).unwrap();
    let mut cell = grid.cell(0, 0);
    cell.height = 0;
    assert_eq!(
        cell.validate(),
        Err(GridError::InvalidCell {
            width: 10,
            height: 0
        })
    );
}
