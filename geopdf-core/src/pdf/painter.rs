//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Rendering of draw geometries onto a surface

use crate::core::error::Result;
use crate::draw::color::Color;
use crate::draw::geometry::{DrawGeometry, Geometry};
use crate::draw::style::{LineStringStyle, PointStyle, PolygonStyle};
use crate::draw::symbol::{symbol_paths, SymbolPath};
use crate::pdf::surface::PdfSurface;
use geo::{Coord, LineString, Polygon};

/// Control point distance of a cubic Bézier quarter circle
const KAPPA: f64 = 0.552_284_749_8;

fn circle(surface: &mut PdfSurface, (cx, cy): (f64, f64), r: f64) {
    let k = r * KAPPA;
    surface.move_to(cx + r, cy);
    surface.curve_to((cx + r, cy + k), (cx + k, cy + r), (cx, cy + r));
    surface.curve_to((cx - k, cy + r), (cx - r, cy + k), (cx - r, cy));
    surface.curve_to((cx - r, cy - k), (cx - k, cy - r), (cx, cy - r));
    surface.curve_to((cx + k, cy - r), (cx + r, cy - k), (cx + r, cy));
    surface.close_path();
}

fn path(surface: &mut PdfSurface, coords: &[Coord<f64>]) {
    if let Some((first, rest)) = coords.split_first() {
        surface.move_to(first.x, first.y);
        for c in rest {
            surface.line_to(c.x, c.y);
        }
    }
}

fn symbol(surface: &mut PdfSurface, x: f64, y: f64, style: &PointStyle) {
    surface.set_line_width(style.line_width);
    surface.set_stroke_color(&style.color);
    if style.filled {
        surface.set_fill_color(&style.fill_color);
    }
    let finish = |surface: &mut PdfSurface| {
        if style.filled {
            surface.fill_stroke();
        } else {
            surface.stroke();
        }
    };
    for shape in symbol_paths(style.symbol, x, y, style.radius, style.centered) {
        match shape {
            SymbolPath::Circle { center, radius } => {
                circle(surface, center, radius);
                finish(surface);
            }
            SymbolPath::Polygon(vertices) => {
                if let Some((first, rest)) = vertices.split_first() {
                    surface.move_to(first.0, first.1);
                    for v in rest {
                        surface.line_to(v.0, v.1);
                    }
                    surface.close_path();
                    finish(surface);
                }
            }
            SymbolPath::Segment(from, to) => {
                surface.move_to(from.0, from.1);
                surface.line_to(to.0, to.1);
                surface.stroke();
            }
        }
    }
}

/// Draw a point symbol or icon at page coordinate `(x, y)`
pub fn draw_point(surface: &mut PdfSurface, x: f64, y: f64, style: &PointStyle) -> Result<()> {
    surface.save_state();
    match style.icon {
        Some(ref icon) => {
            let width = icon.width.map(|inch| inch * 72.0).unwrap_or(style.radius);
            let height = width * icon.image.height() as f64 / icon.image.width().max(1) as f64;
            let (x, y) = if style.centered {
                (x - width / 2.0, y - height / 2.0)
            } else {
                (x, y)
            };
            if let Err(e) = surface.draw_image(&icon.image, x, y, width, height) {
                warn!("Drawing icon failed, using symbol instead: {}", e);
                symbol(surface, x, y, style);
            }
        }
        None => symbol(surface, x, y, style),
    }
    surface.restore_state();
    Ok(())
}

fn vertex_points(surface: &mut PdfSurface, coords: &[Coord<f64>], radius: f64, color: &Color) -> Result<()> {
    let style = PointStyle {
        radius,
        color: *color,
        fill_color: *color,
        filled: true,
        centered: true,
        ..Default::default()
    };
    for c in coords {
        draw_point(surface, c.x, c.y, &style)?;
    }
    Ok(())
}

fn line(surface: &mut PdfSurface, line: &LineString<f64>, style: &LineStringStyle) -> Result<()> {
    surface.save_state();
    surface.set_line_width(style.width);
    surface.set_stroke_color(&style.color);
    path(surface, &line.0);
    surface.stroke();
    surface.restore_state();
    if style.points {
        vertex_points(surface, &line.0, style.point_radius, &style.color)?;
    }
    Ok(())
}

fn polygon(surface: &mut PdfSurface, polygon: &Polygon<f64>, style: &PolygonStyle) -> Result<()> {
    surface.save_state();
    surface.set_line_width(style.stroke_width);
    surface.set_stroke_color(&style.color);
    if style.filled {
        surface.set_fill_color(&style.fill_color);
    }
    path(surface, &polygon.exterior().0);
    surface.close_path();
    for interior in polygon.interiors() {
        path(surface, &interior.0);
        surface.close_path();
    }
    if style.filled {
        surface.fill_stroke();
    } else {
        surface.stroke();
    }
    surface.restore_state();
    if style.points {
        vertex_points(surface, &polygon.exterior().0, style.point_radius, &style.color)?;
    }
    Ok(())
}

/// Styles for each geometry variant
#[derive(Clone, Copy)]
pub struct GeometryStyles<'a> {
    pub point: &'a PointStyle,
    pub line: &'a LineStringStyle,
    pub polygon: &'a PolygonStyle,
}

/// Draw `geometry` in page coordinates, tagged with its attributes
pub fn draw_geometry(surface: &mut PdfSurface, geometry: &DrawGeometry, styles: GeometryStyles) -> Result<()> {
    let tagged = surface.begin_tagged(&geometry.info);
    let result = match geometry.geometry {
        Geometry::Point(ref p) => draw_point(surface, p.x(), p.y(), styles.point),
        Geometry::LineString(ref ls) => line(surface, ls, styles.line),
        Geometry::MultiLineString(ref mls) => mls.0.iter().try_for_each(|ls| line(surface, ls, styles.line)),
        Geometry::Polygon(ref p) => polygon(surface, p, styles.polygon),
        Geometry::MultiPolygon(ref mp) => mp.0.iter().try_for_each(|p| polygon(surface, p, styles.polygon)),
    };
    if tagged {
        surface.end_tagged();
    }
    result
}
