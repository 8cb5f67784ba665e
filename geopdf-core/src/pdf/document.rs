//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::{parse_length, Config, DocumentCfg, CM_TO_INCH, MM_TO_INCH};
use crate::core::crs::{Crs, CANONICAL_CRS};
use crate::core::error::{GeoPdfError, Result};
use crate::draw::color::BLACK;
use crate::pdf::surface::{DocumentInfo, PdfSurface};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_MARGIN: f64 = 50.0;
/// Points per inch
pub const POINTS: f64 = 72.0;

/// Page setup and metadata of the generated PDF
#[derive(Clone, Debug)]
pub struct PdfDocument {
    pub name: String,
    pub output_dir: PathBuf,
    pub info: DocumentInfo,
    /// Page size in inches
    width: f64,
    height: f64,
    /// Margin in points
    margin: f64,
    pub print_margins: bool,
    /// Reference system of the georeferencing points
    pub georeference_crs: Crs,
}

/// Default file name `GeospatialPDF4J_<epoch_ms>`
pub fn default_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("GeospatialPDF4J_{}", millis)
}

impl PdfDocument {
    /// A4 landscape document written to `output_dir`
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> PdfDocument {
        PdfDocument {
            name: default_name(),
            output_dir: output_dir.into(),
            info: DocumentInfo::default(),
            width: 297.0 * MM_TO_INCH,
            height: 210.0 * MM_TO_INCH,
            margin: DEFAULT_MARGIN,
            print_margins: false,
            georeference_crs: CANONICAL_CRS,
        }
    }

    pub fn set_page_size_inch(&mut self, width: f64, height: f64) -> Result<()> {
        if width == 0.0 || height == 0.0 {
            return Err(GeoPdfError::PageSize { width, height });
        }
        self.width = width.abs();
        self.height = height.abs();
        Ok(())
    }

    pub fn set_page_size_mm(&mut self, width: f64, height: f64) -> Result<()> {
        self.set_page_size_inch(width * MM_TO_INCH, height * MM_TO_INCH)
    }

    pub fn set_page_size_cm(&mut self, width: f64, height: f64) -> Result<()> {
        self.set_page_size_inch(width * CM_TO_INCH, height * CM_TO_INCH)
    }

    pub fn set_margin(&mut self, margin: f64) {
        self.margin = margin.abs();
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Page width in points
    pub fn width(&self) -> f64 {
        self.width * POINTS
    }

    /// Page height in points
    pub fn height(&self) -> f64 {
        self.height * POINTS
    }

    /// Printable width in inches
    pub fn available_inches_width(&self) -> f64 {
        (self.width() - 2.0 * self.margin) / POINTS
    }

    /// Printable height in inches
    pub fn available_inches_height(&self) -> f64 {
        (self.height() - 2.0 * self.margin) / POINTS
    }

    pub fn path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.pdf", self.name))
    }

    pub fn open_surface(&self) -> PdfSurface {
        PdfSurface::new(self.width(), self.height())
    }

    /// Frame around the printable area
    pub fn draw_margins(&self, surface: &mut PdfSurface) {
        surface.save_state();
        surface.set_line_width(0.5);
        surface.set_stroke_color(&BLACK);
        surface.rectangle(
            self.margin,
            self.margin,
            self.width() - 2.0 * self.margin,
            self.height() - 2.0 * self.margin,
        );
        surface.stroke();
        surface.restore_state();
    }
}

impl<'a> Config<'a, DocumentCfg> for PdfDocument {
    fn from_config(cfg: &DocumentCfg) -> std::result::Result<Self, String> {
        let mut doc = PdfDocument::new(cfg.output_dir.clone());
        if let Some(ref name) = cfg.name {
            doc.name = name.clone();
        }
        doc.info = DocumentInfo {
            title: cfg.title.clone(),
            author: cfg.author.clone(),
            subject: cfg.subject.clone(),
        };
        let width = parse_length(&cfg.page_width)?;
        let height = parse_length(&cfg.page_height)?;
        doc.set_page_size_inch(width, height)
            .map_err(|e| e.to_string())?;
        doc.set_margin(cfg.margin.unwrap_or(DEFAULT_MARGIN));
        doc.print_margins = cfg.print_margins;
        if let Some(ref crs) = cfg.georeference_crs {
            let crs = Crs::parse(crs).map_err(|e| e.to_string())?;
            if crs.wkt().is_none() {
                return Err(format!("Unsupported georeference_crs `{}`", crs));
            }
            doc.georeference_crs = crs;
        }
        Ok(doc)
    }

    fn gen_config() -> String {
        r#"[document]
output_dir = "."
#name = "map"
#title = ""
author = ""
subject = ""
page_width = "297mm"
page_height = "210mm"
margin = 50 # points
print_margins = false
#georeference_crs = "EPSG:4326"
"#
        .to_string()
    }

    fn gen_runtime_config(&self) -> String {
        format!(
            r#"[document]
output_dir = "{}"
name = "{}"
page_width = "{}in"
page_height = "{}in"
margin = {}
print_margins = {}
georeference_crs = "{}"
"#,
            self.output_dir.display(),
            self.name,
            self.width,
            self.height,
            self.margin,
            self.print_margins,
            self.georeference_crs
        )
    }
}
