//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Raster helpers for tiles and layer images

use crate::core::error::Result;
use crate::raster::tile::Tile;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Bytes per pixel assumed for estimating raster memory
pub const BYTES_PER_PIXEL: f64 = 2.0;

/// Estimated size of a `width × height` raster in MB
pub fn estimated_megabytes(width: u32, height: u32) -> f64 {
    width as f64 * height as f64 * BYTES_PER_PIXEL / 1_048_576.0
}

pub fn blank_canvas(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

pub fn transparent(width: u32, height: u32) -> RgbaImage {
    blank_canvas(width, height, Rgba([0, 0, 0, 0]))
}

/// Decode a PNG or JPEG response
pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Resample `image` if it doesn't have the requested size
pub fn fit(image: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        image
    } else {
        debug!(
            "Resizing {}x{} image to {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );
        imageops::resize(&image, width, height, FilterType::Triangle)
    }
}

/// Stitch tiles into one raster. Missing tiles stay transparent.
pub fn compose(tiles: &[Tile], width: u32, height: u32) -> RgbaImage {
    let mut canvas = transparent(width, height);
    for tile in tiles {
        if let Some(ref image) = tile.image {
            let (x, y) = tile.pixel_origin();
            imageops::replace(&mut canvas, image, x as i64, y as i64);
        }
    }
    canvas
}

/// Scale the alpha channel by `opacity` (0 transparent, 255 unchanged)
pub fn apply_alpha(image: &mut RgbaImage, opacity: u8) {
    if opacity == u8::MAX {
        return;
    }
    for pixel in image.pixels_mut() {
        pixel[3] = (pixel[3] as u32 * opacity as u32 / 255) as u8;
    }
}

/// Split into RGB samples and alpha samples as stored in PDF image streams
pub fn split_alpha(image: &RgbaImage) -> (Vec<u8>, Option<Vec<u8>>) {
    let pixels = image.width() as usize * image.height() as usize;
    let mut rgb = Vec::with_capacity(pixels * 3);
    let mut alpha = Vec::with_capacity(pixels);
    for pixel in image.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel[3]);
    }
    let opaque = alpha.iter().all(|a| *a == u8::MAX);
    (rgb, if opaque { None } else { Some(alpha) })
}
