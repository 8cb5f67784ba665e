//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate lazy_static;

pub mod core;
pub mod draw;
pub mod pdf;
pub mod raster;

pub use crate::core::error::{GeoPdfError, Result};
