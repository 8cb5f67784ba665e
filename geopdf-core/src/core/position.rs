//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::crs::Crs;
use crate::core::error::{GeoPdfError, Result};
use crate::core::transform::CoordinateTransformer;

const MEAN_EARTH_RADIUS: f64 = 6371008.8;

/// Ordered coordinate pair with its reference system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectPosition2D {
    pub ord0: f64,
    pub ord1: f64,
    pub crs: Option<Crs>,
}

impl DirectPosition2D {
    pub fn new(crs: Crs, ord0: f64, ord1: f64) -> DirectPosition2D {
        DirectPosition2D {
            ord0,
            ord1,
            crs: Some(crs),
        }
    }

    /// Position without reference system
    pub fn untagged(ord0: f64, ord1: f64) -> DirectPosition2D {
        DirectPosition2D {
            ord0,
            ord1,
            crs: None,
        }
    }

    /// Easting of a projected position
    pub fn east(&self) -> f64 {
        self.ord0
    }

    /// Northing of a projected position
    pub fn north(&self) -> f64 {
        self.ord1
    }

    /// Distance in meters. `other` is reprojected into the system of `self`
    /// when they differ.
    pub fn distance(&self, other: &DirectPosition2D) -> Result<f64> {
        let crs = self.crs.ok_or(GeoPdfError::MissingCrs)?;
        let other = match other.crs {
            None => return Err(GeoPdfError::MissingCrs),
            Some(other_crs) if other_crs.same_as(&crs) => *other,
            Some(_) => CoordinateTransformer::global().transform(other, crs)?,
        };
        if crs.is_geographic() {
            Ok(haversine(self.ord0, self.ord1, other.ord0, other.ord1))
        } else {
            let dx = other.ord0 - self.ord0;
            let dy = other.ord1 - self.ord1;
            Ok((dx * dx + dy * dy).sqrt())
        }
    }

    pub fn midpoint(&self, other: &DirectPosition2D) -> DirectPosition2D {
        DirectPosition2D {
            ord0: (self.ord0 + other.ord0) / 2.0,
            ord1: (self.ord1 + other.ord1) / 2.0,
            crs: self.crs,
        }
    }
}

fn haversine(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS * a.sqrt().asin()
}
