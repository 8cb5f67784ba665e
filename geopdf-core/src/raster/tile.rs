//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::bbox::BoundingBox;
use crate::core::error::{GeoPdfError, Result};
use image::RgbaImage;
use tile_grid::{TileCell, TileGrid};

/// Single image request of a raster layer
#[derive(Debug)]
pub struct Tile {
    cell: TileCell,
    bbox: BoundingBox,
    /// Number of requests issued for this tile
    pub tries: u32,
    pub image: Option<RgbaImage>,
}

impl Tile {
    pub fn new(cell: TileCell) -> Result<Tile> {
        cell.validate()?;
        let bbox = BoundingBox::from_extent(&cell.extent)
            .map_err(|e| GeoPdfError::TileInvalid(e.to_string()))?;
        Ok(Tile {
            cell,
            bbox,
            tries: 0,
            image: None,
        })
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Requested width in pixels
    pub fn width(&self) -> u32 {
        self.cell.width
    }

    /// Requested height in pixels
    pub fn height(&self) -> u32 {
        self.cell.height
    }

    pub fn column(&self) -> u32 {
        self.cell.column
    }

    pub fn row(&self) -> u32 {
        self.cell.row
    }

    /// Position of the upper left pixel in the composed raster
    pub fn pixel_origin(&self) -> (u32, u32) {
        (self.cell.pixel_x, self.cell.pixel_y)
    }
}

/// Grid of tiles covering the bounding box of a raster layer
#[derive(Debug)]
pub struct TileArray {
    grid: TileGrid,
    tiles: Vec<Tile>,
}

impl TileArray {
    /// Partition a `width × height` raster of `bbox` into requests of at
    /// most `max_pixels` in each direction.
    pub fn new(bbox: &BoundingBox, width: u32, height: u32, max_pixels: u32) -> Result<TileArray> {
        let grid = TileGrid::new(bbox.extent(), width, height, max_pixels)?;
        let tiles = grid
            .iter()
            .map(Tile::new)
            .collect::<Result<Vec<_>>>()?;
        debug!(
            "Tile array {}x{} for {}x{} pixels",
            grid.columns, grid.rows, width, height
        );
        Ok(TileArray { grid, tiles })
    }

    pub fn columns(&self) -> u32 {
        self.grid.columns
    }

    pub fn rows(&self) -> u32 {
        self.grid.rows
    }

    /// Width of the full raster in pixels
    pub fn width(&self) -> u32 {
        self.grid.width
    }

    /// Height of the full raster in pixels
    pub fn height(&self) -> u32 {
        self.grid.height
    }

    pub fn max_pixels(&self) -> u32 {
        self.grid.max_pixels
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }
}
