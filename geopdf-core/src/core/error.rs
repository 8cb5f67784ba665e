//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeoPdfError>;

#[derive(Debug, Error)]
pub enum GeoPdfError {
    #[error("bounding box not creatable: {0}")]
    BBoxNotCreatable(String),
    #[error("position without coordinate reference system")]
    MissingCrs,
    #[error("no transformation from {from} to {to}")]
    UnavailableTransform { from: String, to: String },
    #[error("tile array needs columns and rows > 0 (columns: {columns}, rows: {rows})")]
    TileArrayDimension { columns: u32, rows: u32 },
    #[error("invalid tile: {0}")]
    TileInvalid(String),
    #[error("layer `{layer}` not receivable: {reason}")]
    LayerNotReceivable { layer: String, reason: String },
    #[error("inches of layer `{0}` not computable")]
    LayerInchesUncomputable(String),
    #[error("capabilities request failed: {0}")]
    CapabilitiesRequest(String),
    #[error("invalid page size {width}x{height}")]
    PageSize { width: f64, height: f64 },
    #[error("PDF creation failed: {0}")]
    PdfCreation(String),
    #[error("PDF handler needs {0}")]
    PdfHandler(String),
    #[error("layer `{layer}` in state {state} can't {action}")]
    LayerState {
        layer: String,
        state: String,
        action: String,
    },
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Pdf(#[from] lopdf::Error),
}

impl From<tile_grid::GridError> for GeoPdfError {
    fn from(err: tile_grid::GridError) -> Self {
        match err {
            tile_grid::GridError::Dimension { columns, rows } => {
                GeoPdfError::TileArrayDimension { columns, rows }
            }
            e @ tile_grid::GridError::InvalidCell { .. } => GeoPdfError::TileInvalid(e.to_string()),
        }
    }
}

impl GeoPdfError {
    /// Wrap any failure of a layer into `LayerNotReceivable`
    pub fn not_receivable<E: ToString>(layer: &str, err: E) -> GeoPdfError {
        GeoPdfError::LayerNotReceivable {
            layer: layer.to_string(),
            reason: err.to_string(),
        }
    }
}
