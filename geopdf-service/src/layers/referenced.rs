//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::layers::{DrawContext, LayerBase, MapLayer};
use crate::talker::ServerTalker;
use geopdf_core::core::bbox::BoundingBox;
use geopdf_core::pdf::measure::add_measure;
use geopdf_core::raster::image_handler::blank_canvas;
use geopdf_core::raster::layer_image::LayerImage;
use geopdf_core::{GeoPdfError, Result};
use image::Rgba;
use lopdf::Object;

/// Fill of the carrier image, fully transparent
pub const CARRIER_COLOR: Rgba<u8> = Rgba([255, 185, 185, 0]);

/// Invisible image covering the map, carrying the georeferencing
pub struct ReferencedLayer {
    base: LayerBase,
    image: Option<LayerImage>,
}

impl ReferencedLayer {
    pub fn new(map_bbox: BoundingBox) -> ReferencedLayer {
        ReferencedLayer {
            base: LayerBase::new("Reference-Layer", map_bbox),
            image: None,
        }
    }

    pub fn image(&self) -> Option<&LayerImage> {
        self.image.as_ref()
    }
}

impl MapLayer for ReferencedLayer {
    fn base(&self) -> &LayerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn receive(&mut self, _talker: &ServerTalker) -> Result<()> {
        let width = self.base.point_width().round() as u32;
        let height = self.base.point_height().round() as u32;
        if width == 0 || height == 0 {
            return Err(GeoPdfError::LayerInchesUncomputable(self.base.name.clone()));
        }
        self.image = Some(LayerImage::new(
            blank_canvas(width, height, CARRIER_COLOR),
            self.base.point_width(),
            self.base.point_height(),
        ));
        Ok(())
    }

    fn prepare(&mut self, margin: f64) -> Result<()> {
        let name = &self.base.name;
        let image = self
            .image
            .as_mut()
            .ok_or_else(|| GeoPdfError::not_receivable(name, "no carrier image"))?;
        image.translate(margin, margin);
        Ok(())
    }

    fn draw(&mut self, ctx: &mut DrawContext) -> Result<()> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| GeoPdfError::not_receivable(&self.base.name, "no carrier image"))?;
        ctx.surface.begin_layer(&self.base.name);
        let image_id = ctx.surface.draw_image(
            &image.image,
            image.offset_x,
            image.offset_y,
            image.width,
            image.height,
        )?;
        let measure_id = add_measure(ctx.surface, self.base.bbox(), ctx.georeference_crs)?;
        ctx.surface
            .set_entry(image_id, "Measure", Object::Reference(measure_id))?;
        ctx.surface.add_viewport(
            [
                image.offset_x,
                image.offset_y,
                image.offset_x + image.width,
                image.offset_y + image.height,
            ],
            &self.base.name,
            measure_id,
        );
        ctx.surface.end_layer();
        Ok(())
    }
}
