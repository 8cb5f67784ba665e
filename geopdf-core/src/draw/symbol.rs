//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::draw::style::PointSymbol;

/// Page coordinate in points
pub type PagePoint = (f64, f64);

/// Path primitive of a point symbol in page coordinates
#[derive(Clone, Debug, PartialEq)]
pub enum SymbolPath {
    /// Closed polygon, may be filled
    Polygon(Vec<PagePoint>),
    /// Open line segment
    Segment(PagePoint, PagePoint),
    Circle { center: PagePoint, radius: f64 },
}

// Vertices on a unit box, scaled by the symbol size
const SQUARE: &[(f64, f64)] = &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
const TRIANGLE: &[(f64, f64)] = &[(0.0, 0.0), (0.5, 1.0), (1.0, 0.0)];
const TRIANGLE_UPSIDE: &[(f64, f64)] = &[(0.0, 1.0), (1.0, 1.0), (0.5, 0.0)];
const TRIANGLE_LYING_LEFT: &[(f64, f64)] = &[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)];
const DIAMOND: &[(f64, f64)] = &[(0.0, 0.5), (0.5, 1.0), (1.0, 0.5), (0.5, 0.0)];
const HOURGLASS: &[(f64, f64)] = &[(0.0, 0.0), (1.0, 1.0), (0.0, 1.0), (1.0, 0.0)];
const HOURGLASS_LYING: &[(f64, f64)] = &[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)];
const HOURGLASS_LEFT: &[(f64, f64)] = &[(0.0, 0.5), (0.5, 1.0), (0.5, 0.0), (1.0, 0.5)];
const HOURGLASS_RIGHT: &[(f64, f64)] = &[(0.5, 1.0), (1.0, 0.5), (0.0, 0.5), (0.5, 0.0)];
const CROSS: &[((f64, f64), (f64, f64))] = &[((0.0, 0.5), (1.0, 0.5)), ((0.5, 1.0), (0.5, 0.0))];
const X: &[((f64, f64), (f64, f64))] = &[((0.0, 0.0), (1.0, 1.0)), ((0.0, 1.0), (1.0, 0.0))];

/// Outline of `symbol` with size `size` at `(x, y)`.
///
/// Without centering, `(x, y)` is the lower left corner of the symbol box.
pub fn symbol_paths(symbol: PointSymbol, x: f64, y: f64, size: f64, centered: bool) -> Vec<SymbolPath> {
    let (ox, oy) = if centered {
        (x - size / 2.0, y - size / 2.0)
    } else {
        (x, y)
    };
    let place = |(u, v): (f64, f64)| (ox + u * size, oy + v * size);
    let polygon = |vertices: &[(f64, f64)]| {
        vec![SymbolPath::Polygon(vertices.iter().cloned().map(place).collect())]
    };
    let segments = |lines: &[((f64, f64), (f64, f64))]| -> Vec<SymbolPath> {
        lines
            .iter()
            .map(|&(from, to)| SymbolPath::Segment(place(from), place(to)))
            .collect()
    };
    match symbol {
        PointSymbol::Circle => vec![SymbolPath::Circle {
            center: place((0.5, 0.5)),
            radius: size / 2.0,
        }],
        PointSymbol::Square => polygon(SQUARE),
        PointSymbol::Triangle => polygon(TRIANGLE),
        PointSymbol::TriangleUpside => polygon(TRIANGLE_UPSIDE),
        PointSymbol::TriangleLyingLeft => polygon(TRIANGLE_LYING_LEFT),
        PointSymbol::Diamond => polygon(DIAMOND),
        PointSymbol::Hourglass => polygon(HOURGLASS),
        PointSymbol::HourglassLying => polygon(HOURGLASS_LYING),
        PointSymbol::HourglassLeft => polygon(HOURGLASS_LEFT),
        PointSymbol::HourglassRight => polygon(HOURGLASS_RIGHT),
        PointSymbol::Cross => segments(CROSS),
        PointSymbol::X => segments(X),
        PointSymbol::Star => {
            let mut paths = segments(X);
            paths.extend(segments(CROSS));
            paths
        }
    }
}

#[test]
fn test_symbols() {
    assert_eq!(
        symbol_paths(PointSymbol::Triangle, 10.0, 20.0, 4.0, false),
        vec![SymbolPath::Polygon(vec![(10.0, 20.0), (12.0, 24.0), (14.0, 20.0)])]
    );
    assert_eq!(
        symbol_paths(PointSymbol::Square, 10.0, 20.0, 4.0, true),
        vec![SymbolPath::Polygon(vec![
            (8.0, 18.0),
            (8.0, 22.0),
            (12.0, 22.0),
            (12.0, 18.0)
        ])]
    );
    assert_eq!(
        symbol_paths(PointSymbol::Circle, 10.0, 20.0, 4.0, true),
        vec![SymbolPath::Circle {
            center: (10.0, 20.0),
            radius: 2.0
        }]
    );
    assert_eq!(
        symbol_paths(PointSymbol::Circle, 10.0, 20.0, 4.0, false),
        vec![SymbolPath::Circle {
            center: (12.0, 22.0),
            radius: 2.0
        }]
    );
    assert_eq!(symbol_paths(PointSymbol::Star, 0.0, 0.0, 2.0, false).len(), 4);
    assert_eq!(
        symbol_paths(PointSymbol::Cross, 0.0, 0.0, 2.0, false)[0],
        SymbolPath::Segment((0.0, 1.0), (2.0, 1.0))
    );
}
