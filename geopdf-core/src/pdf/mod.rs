//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod document;
pub mod measure;
pub mod painter;
pub mod surface;

pub use self::document::PdfDocument;
pub use self::surface::{DocumentInfo, PdfSurface};

#[cfg(test)]
mod surface_test;
