//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! In-memory service responses for tests

use crate::talker::Fetcher;
use geopdf_core::raster::image_handler::encode_png;
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockFetcher {
    pub requests: Arc<Mutex<Vec<String>>>,
    /// Responses by URL substring, checked before the built-in ones
    pub responses: HashMap<String, Vec<u8>>,
    /// Number of map requests failing before the first success
    pub failing_maps: Arc<AtomicUsize>,
}

/// Query parameter of `url`
pub fn param<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    let query = url.splitn(2, '?').nth(1)?;
    query.split('&').find_map(|kv| {
        let mut parts = kv.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k.eq_ignore_ascii_case(key) => Some(v),
            _ => None,
        }
    })
}

impl MockFetcher {
    pub fn new() -> MockFetcher {
        MockFetcher::default()
    }

    pub fn with_response(mut self, pattern: &str, body: &str) -> MockFetcher {
        self.responses
            .insert(pattern.to_string(), body.as_bytes().to_vec());
        self
    }

    pub fn failing_maps(self, count: usize) -> MockFetcher {
        self.failing_maps.store(count, Ordering::SeqCst);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn count(&self, pattern: &str) -> usize {
        self.requests().iter().filter(|url| url.contains(pattern)).count()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        for (pattern, body) in &self.responses {
            if url.contains(pattern.as_str()) {
                return Ok(body.clone());
            }
        }
        if url.contains("REQUEST=GETMAP") {
            let failed = self
                .failing_maps
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failed {
                return Err("connection refused".to_string());
            }
            // single pixel, shaded by the left edge of the requested box
            let minx: f64 = param(url, "BBOX")
                .and_then(|bbox| bbox.split(',').next())
                .and_then(|x| x.parse().ok())
                .unwrap_or(0.0);
            let shade = (minx as u64 % 256) as u8;
            let image = RgbaImage::from_pixel(1, 1, Rgba([shade, 100, 0, 255]));
            return encode_png(&image).map_err(|e| e.to_string());
        }
        Err(format!("no response for {}", url))
    }
}
