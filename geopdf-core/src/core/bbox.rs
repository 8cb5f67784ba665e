//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::crs::Crs;
use crate::core::error::{GeoPdfError, Result};
use crate::core::position::DirectPosition2D;
use crate::core::transform::CoordinateTransformer;
use geo::{Coord, LineString, Polygon};
use tile_grid::Extent;

/// Rectangle in the canonical reference system
///
/// Built from a lower left and an upper right position, which are
/// reprojected first. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    ll: DirectPosition2D,
    ul: DirectPosition2D,
    ur: DirectPosition2D,
    lr: DirectPosition2D,
    center: DirectPosition2D,
    geo_width: f64,
    geo_height: f64,
}

impl BoundingBox {
    pub fn new(ll: DirectPosition2D, ur: DirectPosition2D) -> Result<BoundingBox> {
        BoundingBox::with_transformer(CoordinateTransformer::global(), ll, ur)
    }

    pub fn with_transformer(
        transformer: &CoordinateTransformer,
        ll: DirectPosition2D,
        ur: DirectPosition2D,
    ) -> Result<BoundingBox> {
        let reproject = |pos: &DirectPosition2D| {
            transformer
                .to_canonical(pos)
                .map_err(|e| GeoPdfError::BBoxNotCreatable(e.to_string()))
        };
        let mut ll = reproject(&ll)?;
        let mut ur = reproject(&ur)?;
        if ll.east() < ur.east() && ll.north() < ur.north() {
            // well ordered
        } else if ll.east() > ur.east() && ll.north() > ur.north() {
            std::mem::swap(&mut ll, &mut ur);
        } else {
            return Err(GeoPdfError::BBoxNotCreatable(format!(
                "corners ({}, {}) and ({}, {}) are not in lower left / upper right order",
                ll.east(),
                ll.north(),
                ur.east(),
                ur.north()
            )));
        }
        let crs = transformer.canonical();
        let lr = DirectPosition2D::new(crs, ur.east(), ll.north());
        let ul = DirectPosition2D::new(crs, ll.east(), ur.north());
        let center = ll.midpoint(&ur);
        let geo_width = ll.distance(&lr)?;
        let geo_height = ll.distance(&ul)?;
        Ok(BoundingBox {
            ll,
            ul,
            ur,
            lr,
            center,
            geo_width,
            geo_height,
        })
    }

    /// Box from coordinates given in `crs`
    pub fn from_coords(crs: Crs, minx: f64, miny: f64, maxx: f64, maxy: f64) -> Result<BoundingBox> {
        BoundingBox::new(
            DirectPosition2D::new(crs, minx, miny),
            DirectPosition2D::new(crs, maxx, maxy),
        )
    }

    /// Box from an extent in the canonical system
    pub fn from_extent(extent: &Extent) -> Result<BoundingBox> {
        let crs = CoordinateTransformer::global().canonical();
        BoundingBox::from_coords(crs, extent.minx, extent.miny, extent.maxx, extent.maxy)
    }

    /// Smallest box containing all boxes
    pub fn union_all<'a, I>(boxes: I) -> Result<BoundingBox>
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        let mut extent: Option<Extent> = None;
        for bbox in boxes {
            extent = Some(match extent {
                None => bbox.extent(),
                Some(e) => Extent {
                    minx: e.minx.min(bbox.ll.east()),
                    miny: e.miny.min(bbox.ll.north()),
                    maxx: e.maxx.max(bbox.ur.east()),
                    maxy: e.maxy.max(bbox.ur.north()),
                },
            });
        }
        match extent {
            Some(extent) => BoundingBox::from_extent(&extent),
            None => Err(GeoPdfError::BBoxNotCreatable(
                "no boxes to unite".to_string(),
            )),
        }
    }

    pub fn union(&self, other: &BoundingBox) -> Result<BoundingBox> {
        BoundingBox::union_all(vec![self, other])
    }

    pub fn ll(&self) -> &DirectPosition2D {
        &self.ll
    }
    pub fn ul(&self) -> &DirectPosition2D {
        &self.ul
    }
    pub fn ur(&self) -> &DirectPosition2D {
        &self.ur
    }
    pub fn lr(&self) -> &DirectPosition2D {
        &self.lr
    }
    pub fn center(&self) -> &DirectPosition2D {
        &self.center
    }
    /// Width in meters
    pub fn geo_width(&self) -> f64 {
        self.geo_width
    }
    /// Height in meters
    pub fn geo_height(&self) -> f64 {
        self.geo_height
    }

    pub fn extent(&self) -> Extent {
        Extent {
            minx: self.ll.east(),
            miny: self.ll.north(),
            maxx: self.ur.east(),
            maxy: self.ur.north(),
        }
    }

    /// `BBOX` parameter of OGC requests: `minx,miny,maxx,maxy`
    pub fn corners_for_request(&self) -> String {
        format!(
            "{},{},{},{}",
            self.ll.east(),
            self.ll.north(),
            self.ur.east(),
            self.ur.north()
        )
    }

    /// Closed ring ll, ul, ur, lr, ll
    pub fn coords(&self) -> Vec<DirectPosition2D> {
        vec![self.ll, self.ul, self.ur, self.lr, self.ll]
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        let ring: Vec<Coord<f64>> = self
            .coords()
            .iter()
            .map(|p| Coord {
                x: p.east(),
                y: p.north(),
            })
            .collect();
        Polygon::new(LineString::from(ring), vec![])
    }

    pub fn contains(&self, pos: &DirectPosition2D) -> bool {
        pos.east() >= self.ll.east()
            && pos.east() <= self.ur.east()
            && pos.north() >= self.ll.north()
            && pos.north() <= self.ur.north()
    }

    /// Corners ll, ul, ur, lr reprojected into `crs`
    pub fn corners_in(&self, crs: Crs) -> Result<Vec<DirectPosition2D>> {
        let transformer = CoordinateTransformer::global();
        [self.ll, self.ul, self.ur, self.lr]
            .iter()
            .map(|corner| transformer.transform(corner, crs))
            .collect()
    }

    /// Box of the same height, `width` meters wide, adjoining on the right
    pub fn right_of(&self, width: f64) -> Result<BoundingBox> {
        let crs = CoordinateTransformer::global().canonical();
        BoundingBox::from_coords(
            crs,
            self.ur.east(),
            self.ll.north(),
            self.ur.east() + width,
            self.ur.north(),
        )
    }

    /// Box of the same height, `width` meters wide, adjoining on the left
    pub fn left_of(&self, width: f64) -> Result<BoundingBox> {
        let crs = CoordinateTransformer::global().canonical();
        BoundingBox::from_coords(
            crs,
            self.ll.east() - width,
            self.ll.north(),
            self.ll.east(),
            self.ur.north(),
        )
    }

    /// Box of the same width, `height` meters high, adjoining above
    pub fn above(&self, height: f64) -> Result<BoundingBox> {
        let crs = CoordinateTransformer::global().canonical();
        BoundingBox::from_coords(
            crs,
            self.ll.east(),
            self.ur.north(),
            self.ur.east(),
            self.ur.north() + height,
        )
    }

    /// Box of the same width, `height` meters high, adjoining below
    pub fn below(&self, height: f64) -> Result<BoundingBox> {
        let crs = CoordinateTransformer::global().canonical();
        BoundingBox::from_coords(
            crs,
            self.ll.east(),
            self.ll.north() - height,
            self.ur.east(),
            self.ll.north(),
        )
    }
}
