//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod image_handler;
pub mod layer_image;
pub mod tile;

pub use self::layer_image::LayerImage;
pub use self::tile::{Tile, TileArray};

#[cfg(test)]
mod image_handler_test;
