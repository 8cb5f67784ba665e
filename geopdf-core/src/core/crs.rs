//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Coordinate reference systems known to the registry

use crate::core::error::{GeoPdfError, Result};
use std::fmt;

/// Reference ellipsoids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ellipsoid {
    Grs80,
    Wgs84,
}

impl Ellipsoid {
    /// Semi-major axis in meters
    pub fn a(&self) -> f64 {
        6378137.0
    }
    /// Inverse flattening
    pub fn inv_f(&self) -> f64 {
        match self {
            Ellipsoid::Grs80 => 298.257222101,
            Ellipsoid::Wgs84 => 298.257223563,
        }
    }
    pub fn f(&self) -> f64 {
        1.0 / self.inv_f()
    }
    fn wkt_spheroid(&self) -> String {
        match self {
            Ellipsoid::Grs80 => format!("SPHEROID[\"GRS 1980\",6378137,{}]", self.inv_f()),
            Ellipsoid::Wgs84 => format!("SPHEROID[\"WGS 84\",6378137,{}]", self.inv_f()),
        }
    }
}

/// Coordinate reference system
///
/// Positions are always stored x first: longitude/latitude for geographic
/// systems, easting/northing for projected ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crs {
    /// Longitude/latitude in degrees (EPSG:4326, EPSG:4258)
    Geographic { epsg: u32, ellipsoid: Ellipsoid },
    /// Spherical web mercator (EPSG:3857)
    WebMercator,
    /// Universal transverse mercator (EPSG:258xx, EPSG:326xx, EPSG:327xx)
    Utm {
        epsg: u32,
        zone: u8,
        south: bool,
        ellipsoid: Ellipsoid,
    },
    /// Registered code without transformation support
    Unsupported(u32),
}

/// ETRS89 / UTM zone 32N, the system all geometries are stored in.
pub const CANONICAL_CRS: Crs = Crs::Utm {
    epsg: 25832,
    zone: 32,
    south: false,
    ellipsoid: Ellipsoid::Grs80,
};

/// WGS 84 geographic
pub const WGS84: Crs = Crs::Geographic {
    epsg: 4326,
    ellipsoid: Ellipsoid::Wgs84,
};

impl Crs {
    pub fn from_epsg(code: u32) -> Crs {
        match code {
            4326 => WGS84,
            4258 => Crs::Geographic {
                epsg: 4258,
                ellipsoid: Ellipsoid::Grs80,
            },
            3857 | 900913 => Crs::WebMercator,
            25828..=25838 => Crs::Utm {
                epsg: code,
                zone: (code - 25800) as u8,
                south: false,
                ellipsoid: Ellipsoid::Grs80,
            },
            32601..=32660 => Crs::Utm {
                epsg: code,
                zone: (code - 32600) as u8,
                south: false,
                ellipsoid: Ellipsoid::Wgs84,
            },
            32701..=32760 => Crs::Utm {
                epsg: code,
                zone: (code - 32700) as u8,
                south: true,
                ellipsoid: Ellipsoid::Wgs84,
            },
            other => Crs::Unsupported(other),
        }
    }

    /// Parse `EPSG:25832`, `urn:ogc:def:crs:EPSG::25832`, `CRS:84` or `25832`
    pub fn parse(s: &str) -> Result<Crs> {
        let normalized = s.trim().to_uppercase();
        if normalized == "CRS:84" {
            return Ok(WGS84);
        }
        let code = normalized
            .rsplit(':')
            .next()
            .unwrap_or("")
            .parse::<u32>()
            .map_err(|_| GeoPdfError::Config(format!("Invalid CRS identifier `{}`", s)))?;
        Ok(Crs::from_epsg(code))
    }

    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Geographic { epsg, .. } => *epsg,
            Crs::WebMercator => 3857,
            Crs::Utm { epsg, .. } => *epsg,
            Crs::Unsupported(epsg) => *epsg,
        }
    }

    pub fn is_geographic(&self) -> bool {
        match self {
            Crs::Geographic { .. } => true,
            _ => false,
        }
    }

    /// Same authority code
    pub fn same_as(&self, other: &Crs) -> bool {
        self.epsg() == other.epsg()
    }

    /// Central meridian of UTM zone in degrees
    pub fn central_meridian(zone: u8) -> f64 {
        zone as f64 * 6.0 - 183.0
    }

    fn wkt_geogcs(ellipsoid: Ellipsoid) -> String {
        let (name, datum) = match ellipsoid {
            Ellipsoid::Grs80 => ("ETRS89", "European_Terrestrial_Reference_System_1989"),
            Ellipsoid::Wgs84 => ("WGS 84", "WGS_1984"),
        };
        format!(
            "GEOGCS[\"{}\",DATUM[\"{}\",{}],PRIMEM[\"Greenwich\",0],UNIT[\"degree\",0.0174532925199433]]",
            name,
            datum,
            ellipsoid.wkt_spheroid()
        )
    }

    /// Well-known text definition
    pub fn wkt(&self) -> Option<String> {
        match self {
            Crs::Geographic { ellipsoid, .. } => Some(Crs::wkt_geogcs(*ellipsoid)),
            Crs::WebMercator => Some(format!(
                "PROJCS[\"WGS 84 / Pseudo-Mercator\",{},PROJECTION[\"Mercator_1SP\"],\
                 PARAMETER[\"central_meridian\",0],PARAMETER[\"scale_factor\",1],\
                 PARAMETER[\"false_easting\",0],PARAMETER[\"false_northing\",0],UNIT[\"metre\",1]]",
                Crs::wkt_geogcs(Ellipsoid::Wgs84)
            )),
            Crs::Utm {
                zone,
                south,
                ellipsoid,
                ..
            } => {
                let prefix = match ellipsoid {
                    Ellipsoid::Grs80 => "ETRS89",
                    Ellipsoid::Wgs84 => "WGS 84",
                };
                Some(format!(
                    "PROJCS[\"{} / UTM zone {}{}\",{},PROJECTION[\"Transverse_Mercator\"],\
                     PARAMETER[\"latitude_of_origin\",0],PARAMETER[\"central_meridian\",{}],\
                     PARAMETER[\"scale_factor\",0.9996],PARAMETER[\"false_easting\",500000],\
                     PARAMETER[\"false_northing\",{}],UNIT[\"metre\",1]]",
                    prefix,
                    zone,
                    if *south { "S" } else { "N" },
                    Crs::wkt_geogcs(*ellipsoid),
                    Crs::central_meridian(*zone),
                    if *south { 10000000 } else { 0 }
                ))
            }
            Crs::Unsupported(_) => None,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}
