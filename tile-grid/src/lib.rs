//! A library for partitioning large raster requests into tile grids
//!
//! A map server usually limits the pixel size of a single image request.
//! A [`TileGrid`] splits a `width × height` pixel request covering an
//! [`Extent`] into `columns × rows` cells, each at most `max_pixels` wide and
//! high. The last column and the last row absorb the remainder.
//!
//! ```rust
//! use tile_grid::{Extent, TileGrid};
//!
//! let extent = Extent {
//!     minx: 500000.0,
//!     miny: 5900000.0,
//!     maxx: 501000.0,
//!     maxy: 5901000.0,
//! };
//! let grid = TileGrid::new(extent, 2500, 2500, 1000).unwrap();
//! assert_eq!((grid.columns, grid.rows), (3, 3));
//! let last = grid.cell(2, 2);
//! assert_eq!((last.width, last.height), (500, 500));
//! assert_eq!(last.extent.miny, 5900000.0);
//! ```
//!
//! ## Grid iterators
//!
//! Cells are visited column by column, each column top to bottom:
//!
//! ```rust
//! use tile_grid::{Extent, TileGrid};
//!
//! let extent = Extent { minx: 0.0, miny: 0.0, maxx: 20.0, maxy: 20.0 };
//! let grid = TileGrid::new(extent, 20, 20, 10).unwrap();
//! let order: Vec<_> = grid.iter().map(|cell| (cell.column, cell.row)).collect();
//! assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
//! ```

mod grid;
mod grid_iterator;
#[cfg(test)]
mod grid_test;

pub use grid::{Extent, GridError, TileCell, TileGrid};
pub use grid_iterator::GridIterator;
