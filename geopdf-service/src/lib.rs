//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate log;

pub mod capabilities;
pub mod gml;
pub mod handler;
pub mod layers;
pub mod map;
pub mod talker;

#[cfg(test)]
mod mock_fetcher;

pub use crate::handler::PdfHandler;
pub use crate::map::Map;
pub use crate::talker::{CurlFetcher, Fetcher, ServerTalker};

#[cfg(test)]
mod capabilities_test;
#[cfg(test)]
mod gml_test;
#[cfg(test)]
mod talker_test;
