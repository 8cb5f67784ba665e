//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! WMS GetCapabilities reader

use elementtree::Element;
use geopdf_core::{GeoPdfError, Result};

/// Parts of a capabilities document relevant for map requests
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Capabilities {
    /// Service version announced by the server
    pub version: Option<String>,
    /// Named layers, without the `default` layer
    pub layers: Vec<String>,
    /// Supported reference systems
    pub crs: Vec<String>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl Capabilities {
    pub fn from_bytes(bytes: &[u8]) -> Result<Capabilities> {
        let root = Element::from_reader(bytes)
            .map_err(|e| GeoPdfError::CapabilitiesRequest(e.to_string()))?;
        Ok(Capabilities::from_element(&root))
    }

    pub fn from_element(root: &Element) -> Capabilities {
        let mut caps = Capabilities {
            version: root.get_attr("version").map(|v| v.to_string()),
            ..Default::default()
        };
        caps.collect(root, false);
        caps
    }

    fn collect(&mut self, el: &Element, in_layer: bool) {
        for child in el.children() {
            let name = child.tag().name();
            let text = child.text().trim();
            match name.to_lowercase().as_str() {
                "layer" => self.collect(child, true),
                "name" if in_layer => {
                    if !text.is_empty() && text != "default" && !self.layers.iter().any(|l| l == text) {
                        self.layers.push(text.to_string());
                    }
                }
                "crs" | "srs" => {
                    for crs in text.split_whitespace() {
                        if !self.crs.iter().any(|c| c == crs) {
                            self.crs.push(crs.to_string());
                        }
                    }
                }
                "maxwidth" => self.max_width = text.parse().ok(),
                "maxheight" => self.max_height = text.parse().ok(),
                // Style, Attribution etc. carry their own Name elements
                "style" | "attribution" | "authorityurl" | "keywordlist" => {}
                _ => self.collect(child, in_layer),
            }
        }
    }

    /// Pixel limit per request given the configured limit
    pub fn max_request_pixel(&self, configured: u32) -> u32 {
        [self.max_width, self.max_height]
            .iter()
            .flatten()
            .fold(configured, |max, limit| max.min(*limit))
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l == name)
    }

    pub fn supports_crs(&self, crs: &str) -> bool {
        self.crs.iter().any(|c| c.eq_ignore_ascii_case(crs))
    }
}
