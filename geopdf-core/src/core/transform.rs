//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Reprojection between the registered coordinate reference systems
//!
//! Every transformation passes through geographic longitude/latitude.
//! Datum shifts between ETRS89 and WGS 84 are ignored.

use crate::core::crs::{Crs, Ellipsoid, CANONICAL_CRS};
use crate::core::error::{GeoPdfError, Result};
use crate::core::position::DirectPosition2D;
use std::f64::consts;

const EARTH_RADIUS: f64 = 6378137.0;
const UTM_SCALE: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500000.0;
const UTM_FALSE_NORTHING_SOUTH: f64 = 10000000.0;

lazy_static! {
    static ref TRANSFORMER: CoordinateTransformer = CoordinateTransformer::new(CANONICAL_CRS);
}

/// Transverse mercator projection with the 6th order Krüger series
struct TransverseMercator {
    e: f64,
    big_a: f64,
    alpha: [f64; 6],
    beta: [f64; 6],
    lon0: f64,
    k0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl TransverseMercator {
    fn utm(zone: u8, south: bool, ellipsoid: Ellipsoid) -> TransverseMercator {
        let f = ellipsoid.f();
        let n = f / (2.0 - f);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;
        let big_a = ellipsoid.a() / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);
        let alpha = [
            n / 2.0 - 2.0 / 3.0 * n2 + 5.0 / 16.0 * n3 + 41.0 / 180.0 * n4 - 127.0 / 288.0 * n5
                + 7891.0 / 37800.0 * n6,
            13.0 / 48.0 * n2 - 3.0 / 5.0 * n3 + 557.0 / 1440.0 * n4 + 281.0 / 630.0 * n5
                - 1983433.0 / 1935360.0 * n6,
            61.0 / 240.0 * n3 - 103.0 / 140.0 * n4 + 15061.0 / 26880.0 * n5
                + 167603.0 / 181440.0 * n6,
            49561.0 / 161280.0 * n4 - 179.0 / 168.0 * n5 + 6601661.0 / 7257600.0 * n6,
            34729.0 / 80640.0 * n5 - 3418889.0 / 1995840.0 * n6,
            212378941.0 / 319334400.0 * n6,
        ];
        let beta = [
            n / 2.0 - 2.0 / 3.0 * n2 + 37.0 / 96.0 * n3 - 1.0 / 360.0 * n4 - 81.0 / 512.0 * n5
                + 96199.0 / 604800.0 * n6,
            1.0 / 48.0 * n2 + 1.0 / 15.0 * n3 - 437.0 / 1440.0 * n4 + 46.0 / 105.0 * n5
                - 1118711.0 / 3870720.0 * n6,
            17.0 / 480.0 * n3 - 37.0 / 840.0 * n4 - 209.0 / 4480.0 * n5 + 5569.0 / 90720.0 * n6,
            4397.0 / 161280.0 * n4 - 11.0 / 504.0 * n5 - 830251.0 / 7257600.0 * n6,
            4583.0 / 161280.0 * n5 - 108847.0 / 3991680.0 * n6,
            20648693.0 / 638668800.0 * n6,
        ];
        TransverseMercator {
            e: (f * (2.0 - f)).sqrt(),
            big_a,
            alpha,
            beta,
            lon0: Crs::central_meridian(zone).to_radians(),
            k0: UTM_SCALE,
            false_easting: UTM_FALSE_EASTING,
            false_northing: if south { UTM_FALSE_NORTHING_SOUTH } else { 0.0 },
        }
    }

    /// (lon, lat) in degrees to (easting, northing)
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let phi = lat.to_radians();
        let lambda = lon.to_radians() - self.lon0;
        let tau = phi.tan();
        let sigma = (self.e * (self.e * tau / (1.0 + tau * tau).sqrt()).atanh()).sinh();
        let tau_p = tau * (1.0 + sigma * sigma).sqrt() - sigma * (1.0 + tau * tau).sqrt();
        let xi_p = tau_p.atan2(lambda.cos());
        let eta_p = (lambda.sin() / (tau_p * tau_p + lambda.cos() * lambda.cos()).sqrt()).asinh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, alpha) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += alpha * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += alpha * (k * xi_p).cos() * (k * eta_p).sinh();
        }
        (
            self.false_easting + self.k0 * self.big_a * eta,
            self.false_northing + self.k0 * self.big_a * xi,
        )
    }

    /// (easting, northing) to (lon, lat) in degrees
    fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let xi = (northing - self.false_northing) / (self.k0 * self.big_a);
        let eta = (easting - self.false_easting) / (self.k0 * self.big_a);

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, beta) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_p -= beta * (k * xi).cos() * (k * eta).sinh();
        }
        let sinh_eta_p = eta_p.sinh();
        let sin_xi_p = xi_p.sin();
        let cos_xi_p = xi_p.cos();
        let tau_p = sin_xi_p / (sinh_eta_p * sinh_eta_p + cos_xi_p * cos_xi_p).sqrt();

        // Newton-Raphson for tau = tan(phi)
        let e2 = self.e * self.e;
        let mut tau = tau_p;
        for _ in 0..16 {
            let sigma = (self.e * (self.e * tau / (1.0 + tau * tau).sqrt()).atanh()).sinh();
            let tau_i = tau * (1.0 + sigma * sigma).sqrt() - sigma * (1.0 + tau * tau).sqrt();
            let delta = (tau_p - tau_i) / (1.0 + tau_i * tau_i).sqrt() * (1.0 + (1.0 - e2) * tau * tau)
                / ((1.0 - e2) * (1.0 + tau * tau).sqrt());
            tau += delta;
            if delta.abs() < 1e-12 {
                break;
            }
        }
        let lat = tau.atan().to_degrees();
        let lon = (self.lon0 + sinh_eta_p.atan2(cos_xi_p)).to_degrees();
        (lon, lat)
    }
}

/// Immutable, process-wide reprojection service
#[derive(Debug)]
pub struct CoordinateTransformer {
    canonical: Crs,
}

impl CoordinateTransformer {
    pub fn new(canonical: Crs) -> CoordinateTransformer {
        CoordinateTransformer { canonical }
    }

    /// Shared instance with ETRS89 / UTM 32N as canonical system
    pub fn global() -> &'static CoordinateTransformer {
        &TRANSFORMER
    }

    pub fn canonical(&self) -> Crs {
        self.canonical
    }

    pub fn to_canonical(&self, pos: &DirectPosition2D) -> Result<DirectPosition2D> {
        self.transform(pos, self.canonical)
    }

    /// Reproject `pos` into `target`
    pub fn transform(&self, pos: &DirectPosition2D, target: Crs) -> Result<DirectPosition2D> {
        let source = pos.crs.ok_or(GeoPdfError::MissingCrs)?;
        if source == target || source.same_as(&target) {
            return Ok(DirectPosition2D::new(target, pos.ord0, pos.ord1));
        }
        let unavailable = || GeoPdfError::UnavailableTransform {
            from: source.to_string(),
            to: target.to_string(),
        };
        let (lon, lat) = to_lonlat(source, pos.ord0, pos.ord1).ok_or_else(unavailable)?;
        let (x, y) = from_lonlat(target, lon, lat).ok_or_else(unavailable)?;
        if !(x.is_finite() && y.is_finite()) {
            return Err(unavailable());
        }
        Ok(DirectPosition2D::new(target, x, y))
    }
}

fn to_lonlat(crs: Crs, x: f64, y: f64) -> Option<(f64, f64)> {
    match crs {
        Crs::Geographic { .. } => Some((x, y)),
        Crs::WebMercator => Some(merc_to_lonlat(x, y)),
        Crs::Utm {
            zone,
            south,
            ellipsoid,
            ..
        } => Some(TransverseMercator::utm(zone, south, ellipsoid).inverse(x, y)),
        Crs::Unsupported(_) => None,
    }
}

fn from_lonlat(crs: Crs, lon: f64, lat: f64) -> Option<(f64, f64)> {
    match crs {
        Crs::Geographic { .. } => Some((lon, lat)),
        Crs::WebMercator => Some(lonlat_to_merc(lon, lat)),
        Crs::Utm {
            zone,
            south,
            ellipsoid,
            ..
        } => Some(TransverseMercator::utm(zone, south, ellipsoid).forward(lon, lat)),
        Crs::Unsupported(_) => None,
    }
}

/// Returns the Spherical Mercator (x, y) in meters
pub fn lonlat_to_merc(lon: f64, lat: f64) -> (f64, f64) {
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * ((consts::PI * 0.25) + (0.5 * lat.to_radians())).tan().ln();
    (x, y)
}

/// Returns (lon, lat) in degrees of a Spherical Mercator position
pub fn merc_to_lonlat(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - consts::PI * 0.5).to_degrees();
    (lon, lat)
}
