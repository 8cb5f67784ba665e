//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod bbox;
pub mod config;
pub mod crs;
pub mod error;
pub mod position;
pub mod stats;
pub mod transform;

pub use self::bbox::BoundingBox;
pub use self::config::{parse_config, read_config, ApplicationCfg, Config};
pub use self::crs::{Crs, CANONICAL_CRS, WGS84};
pub use self::position::DirectPosition2D;
pub use self::transform::CoordinateTransformer;

#[cfg(test)]
mod config_test;
