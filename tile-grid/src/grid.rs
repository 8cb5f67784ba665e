//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Raster tile grids

use crate::grid_iterator::GridIterator;
use std::fmt;

/// Geographic extent
#[derive(PartialEq, Clone, Debug)]
pub struct Extent {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl Extent {
    pub fn width(&self) -> f64 {
        self.maxx - self.minx
    }
    pub fn height(&self) -> f64 {
        self.maxy - self.miny
    }
}

/// Errors raised while partitioning a raster request
#[derive(PartialEq, Clone, Debug)]
pub enum GridError {
    /// The request results in an empty grid.
    Dimension { columns: u32, rows: u32 },
    /// A cell without pixels.
    InvalidCell { width: u32, height: u32 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GridError::Dimension { columns, rows } => write!(
                f,
                "tile grid needs at least one column and row (columns: {}, rows: {})",
                columns, rows
            ),
            GridError::InvalidCell { width, height } => write!(
                f,
                "tile cell must have a positive pixel size ({}x{})",
                width, height
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// A single request of a tile grid
#[derive(PartialEq, Clone, Debug)]
pub struct TileCell {
    pub column: u32,
    pub row: u32,
    /// Requested width in pixels
    pub width: u32,
    /// Requested height in pixels
    pub height: u32,
    /// Geographic extent covered by this cell
    pub extent: Extent,
    /// Pixel offset of the upper left corner within the full raster
    pub pixel_x: u32,
    pub pixel_y: u32,
}

/// Partition of a `width × height` pixel raster into cells of at most
/// `max_pixels × max_pixels`.
#[derive(Clone, Debug)]
pub struct TileGrid {
    pub columns: u32,
    pub rows: u32,
    /// Total raster width in pixels
    pub width: u32,
    /// Total raster height in pixels
    pub height: u32,
    /// Pixel cap per request
    pub max_pixels: u32,
    /// Geographic extent covered by the full raster
    pub extent: Extent,
}

impl TileGrid {
    pub fn new(extent: Extent, width: u32, height: u32, max_pixels: u32) -> Result<TileGrid, GridError> {
        let (columns, rows) = if max_pixels == 0 {
            (0, 0)
        } else {
            (
                (width as f64 / max_pixels as f64).ceil() as u32,
                (height as f64 / max_pixels as f64).ceil() as u32,
            )
        };
        if columns == 0 || rows == 0 {
            return Err(GridError::Dimension { columns, rows });
        }
        Ok(TileGrid {
            columns,
            rows,
            width,
            height,
            max_pixels,
            extent,
        })
    }
    /// Number of cells
    pub fn len(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
    /// Ground units per pixel in x direction
    pub fn resolution_x(&self) -> f64 {
        self.extent.width() / self.width as f64
    }
    /// Ground units per pixel in y direction
    pub fn resolution_y(&self) -> f64 {
        self.extent.height() / self.height as f64
    }
    /// Width of column in pixels
    pub fn column_width(&self, column: u32) -> u32 {
        let consumed = column * self.max_pixels;
        std::cmp::min(self.width.saturating_sub(consumed), self.max_pixels)
    }
    /// Height of row in pixels
    pub fn row_height(&self, row: u32) -> u32 {
        let consumed = row * self.max_pixels;
        std::cmp::min(self.height.saturating_sub(consumed), self.max_pixels)
    }
    /// Cell at `column`, `row`. Rows are counted from the top.
    pub fn cell(&self, column: u32, row: u32) -> TileCell {
        let width = self.column_width(column);
        let height = self.row_height(row);
        let pixel_x = column * self.max_pixels;
        let pixel_y = row * self.max_pixels;
        // running easting starts at the upper left corner and moves right,
        // running northing moves down
        let minx = self.extent.minx + pixel_x as f64 * self.resolution_x();
        let maxy = self.extent.maxy - pixel_y as f64 * self.resolution_y();
        let maxx = if column + 1 == self.columns {
            self.extent.maxx
        } else {
            minx + width as f64 * self.resolution_x()
        };
        let miny = if row + 1 == self.rows {
            self.extent.miny
        } else {
            maxy - height as f64 * self.resolution_y()
        };
        TileCell {
            column,
            row,
            width,
            height,
            extent: Extent {
                minx,
                miny,
                maxx,
                maxy,
            },
            pixel_x,
            pixel_y,
        }
    }
    /// Iterate over all cells, column by column
    pub fn iter(&self) -> GridIterator<'_> {
        GridIterator::new(self)
    }
}

impl TileCell {
    /// Check pixel dimensions of a cell
    pub fn validate(&self) -> Result<(), GridError> {
        if self.width == 0 || self.height == 0 {
            Err(GridError::InvalidCell {
                width: self.width,
                height: self.height,
            })
        } else {
            Ok(())
        }
    }
}
