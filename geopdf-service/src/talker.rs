//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Requests against OGC web services

use crate::capabilities::Capabilities;
use curl::easy::Easy;
use elementtree::Element;
use geopdf_core::core::bbox::BoundingBox;
use geopdf_core::core::config::TilesCfg;
use geopdf_core::core::crs::Crs;
use geopdf_core::core::stats::Statistics;
use geopdf_core::raster::image_handler;
use geopdf_core::raster::tile::Tile;
use geopdf_core::{GeoPdfError, Result};
use pbr::ProgressBar;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use rayon::prelude::*;
use std::io::{stderr, Stderr};
use std::time::{Duration, Instant};

/// Characters encoded in query parameter values
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>');

/// Transport used for service requests
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, String>;
}

/// HTTP transport based on libcurl
pub struct CurlFetcher {
    pub timeout: Duration,
}

impl Default for CurlFetcher {
    fn default() -> Self {
        CurlFetcher {
            timeout: Duration::from_secs(60),
        }
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, String> {
        let mut data = Vec::new();
        let mut easy = Easy::new();
        easy.url(url).map_err(|e| e.to_string())?;
        easy.follow_location(true).map_err(|e| e.to_string())?;
        easy.timeout(self.timeout).map_err(|e| e.to_string())?;
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|chunk| {
                    data.extend_from_slice(chunk);
                    Ok(chunk.len())
                })
                .map_err(|e| e.to_string())?;
            transfer.perform().map_err(|e| e.to_string())?;
        }
        let status = easy.response_code().map_err(|e| e.to_string())?;
        if status >= 400 {
            return Err(format!("HTTP status {}", status));
        }
        Ok(data)
    }
}

/// Append query parameters to a service URL
pub fn request_url(base: &str, params: &[(&str, String)]) -> String {
    let mut url = base.to_string();
    if !url.contains('?') {
        url.push('?');
    } else if !url.ends_with('?') && !url.ends_with('&') {
        url.push('&');
    }
    let query: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, utf8_percent_encode(value, QUERY_VALUE)))
        .collect();
    url.push_str(&query.join("&"));
    url
}

/// Parameters of GetMap requests of one sublayer
#[derive(Clone, Debug)]
pub struct MapRequest {
    pub url: String,
    pub version: String,
    pub layer: String,
    pub style: String,
    pub crs: Crs,
}

impl MapRequest {
    pub fn url(&self, bbox: &BoundingBox, width: u32, height: u32) -> String {
        let crs_param = if self.version.starts_with("1.1") {
            "SRS"
        } else {
            "CRS"
        };
        request_url(
            &self.url,
            &[
                ("REQUEST", "GETMAP".to_string()),
                ("VERSION", self.version.clone()),
                ("WIDTH", width.to_string()),
                ("HEIGHT", height.to_string()),
                ("FORMAT", "image/png".to_string()),
                ("STYLES", self.style.clone()),
                ("TRANSPARENT", "TRUE".to_string()),
                ("BBOX", bbox.corners_for_request()),
                ("LAYERS", self.layer.clone()),
                (crs_param, self.crs.to_string()),
            ],
        )
    }
}

/// Issues capabilities, map and feature requests.
///
/// Map tiles are fetched in parallel on a dedicated thread pool.
pub struct ServerTalker {
    fetcher: Box<dyn Fetcher>,
    pub max_request_pixel: u32,
    pub max_image_mb: u32,
    pub max_request_tries: u32,
    threads: usize,
    pool: rayon::ThreadPool,
    pub stats: Statistics,
    /// Show progress of tile requests on stderr
    pub progress: bool,
}

impl ServerTalker {
    pub fn new(fetcher: Box<dyn Fetcher>, cfg: &TilesCfg) -> Result<ServerTalker> {
        let threads = cfg.threads.unwrap_or_else(num_cpus::get).max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("tile-fetch-{}", i))
            .build()
            .map_err(|e| GeoPdfError::Config(e.to_string()))?;
        Ok(ServerTalker {
            fetcher,
            max_request_pixel: cfg.max_request_pixel,
            max_image_mb: cfg.max_image_mb,
            max_request_tries: cfg.max_request_tries.max(1),
            threads,
            pool,
            stats: Statistics::new(),
            progress: false,
        })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, String> {
        debug!("Request {}", url);
        self.fetcher.fetch(url)
    }

    pub fn capabilities(&self, url: &str, version: &str) -> Result<Capabilities> {
        let request = request_url(
            url,
            &[
                ("SERVICE", "WMS".to_string()),
                ("REQUEST", "GETCAPABILITIES".to_string()),
                ("VERSION", version.to_string()),
            ],
        );
        let bytes = self
            .fetch(&request)
            .map_err(|e| GeoPdfError::CapabilitiesRequest(format!("{}: {}", url, e)))?;
        Capabilities::from_bytes(&bytes)
    }

    /// Fetch the image of `tile`, retrying up to `max_request_tries` times.
    /// A transparent image is used when all tries fail.
    pub fn fetch_tile(&self, request: &MapRequest, tile: &mut Tile) {
        let url = request.url(tile.bbox(), tile.width(), tile.height());
        let stats_key = format!("WMS.{}", request.layer);
        while tile.tries < self.max_request_tries {
            tile.tries += 1;
            let start = Instant::now();
            let result = self
                .fetch(&url)
                .and_then(|bytes| image_handler::decode(&bytes).map_err(|e| e.to_string()));
            self.stats
                .add_duration(&format!("{}.request_ms", stats_key), start.elapsed());
            match result {
                Ok(image) => {
                    tile.image = Some(image_handler::fit(image, tile.width(), tile.height()));
                    self.stats.add(&format!("{}.tries", stats_key), tile.tries as u64);
                    return;
                }
                Err(e) => warn!(
                    "Tile {}/{} of `{}` failed (try {}/{}): {}",
                    tile.column(),
                    tile.row(),
                    request.layer,
                    tile.tries,
                    self.max_request_tries,
                    e
                ),
            }
        }
        error!(
            "Giving up tile {}/{} of `{}`, using transparent image",
            tile.column(),
            tile.row(),
            request.layer
        );
        self.stats.add(&format!("{}.failed", stats_key), 1);
        tile.image = Some(image_handler::transparent(tile.width(), tile.height()));
    }

    /// Fetch all `tiles` in parallel
    pub fn fetch_tiles(&self, request: &MapRequest, tiles: &mut [Tile]) {
        self.pool.install(|| {
            tiles
                .par_iter_mut()
                .for_each(|tile| self.fetch_tile(request, tile))
        });
    }

    pub fn progress_bar(&self, msg: &str, count: u64) -> Option<ProgressBar<Stderr>> {
        if !self.progress {
            return None;
        }
        let mut pb = ProgressBar::on(stderr(), count);
        pb.message(msg);
        pb.show_speed = false;
        pb.show_time_left = false;
        Some(pb)
    }

    /// GetFeature request for `typename` within `bbox`. Errors are reported
    /// for `layer`.
    pub fn get_feature(
        &self,
        layer: &str,
        url: &str,
        version: &str,
        typename: &str,
        bbox: &BoundingBox,
        crs: Crs,
    ) -> Result<Element> {
        let request = request_url(
            url,
            &[
                ("SERVICE", "wfs".to_string()),
                ("REQUEST", "GetFeature".to_string()),
                ("VERSION", version.to_string()),
                ("TYPENAMES", typename.to_string()),
                ("BBOX", bbox.corners_for_request()),
                ("SRSNAME", crs.to_string()),
            ],
        );
        let start = Instant::now();
        let bytes = self
            .fetch(&request)
            .map_err(|e| GeoPdfError::not_receivable(layer, format!("{}: {}", typename, e)))?;
        self.stats
            .add_duration(&format!("WFS.{}.request_ms", typename), start.elapsed());
        Element::from_reader(&bytes[..])
            .map_err(|e| GeoPdfError::not_receivable(layer, format!("{}: {}", typename, e)))
    }
}
