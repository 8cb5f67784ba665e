//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use image::RgbaImage;

/// Raster placed on the page.
///
/// Offset is the lower left corner in page coordinates, all values in points.
#[derive(Debug, Clone)]
pub struct LayerImage {
    pub image: RgbaImage,
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayerImage {
    pub fn new(image: RgbaImage, width: f64, height: f64) -> LayerImage {
        LayerImage {
            image,
            offset_x: 0.0,
            offset_y: 0.0,
            width,
            height,
        }
    }

    /// Move the image by `dx`, `dy` points
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}
