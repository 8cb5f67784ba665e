//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod color;
pub mod container;
pub mod geometry;
pub mod info;
pub mod style;
pub mod symbol;

pub use self::color::Color;
pub use self::container::GeometryContainer;
pub use self::geometry::{ClipOutcome, DrawGeometry, Geometry};
pub use self::info::AdditionalInfo;
pub use self::style::{LineStringStyle, PointStyle, PointSymbol, PolygonStyle, WfsStyle};
