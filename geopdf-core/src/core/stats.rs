//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Request statistics

use stats::{MinMax, OnlineStats};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

struct StatCollector {
    online: OnlineStats,
    minmax: MinMax<u64>,
}

pub struct StatResults {
    pub len: usize,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub stddev: f64,
}

/// Measurements grouped by key, e.g. `WMS.osm.tile_ms`.
/// Shared between parallel tile fetches.
pub struct Statistics(Mutex<BTreeMap<String, StatCollector>>);

impl Statistics {
    pub fn new() -> Statistics {
        Statistics(Mutex::new(BTreeMap::new()))
    }
    pub fn add(&self, key: &str, value: u64) {
        if let Ok(mut collectors) = self.0.lock() {
            let collector = collectors
                .entry(key.to_string())
                .or_insert_with(|| StatCollector {
                    online: OnlineStats::new(),
                    minmax: MinMax::new(),
                });
            collector.online.add(value);
            collector.minmax.add(value);
        }
    }
    pub fn add_duration(&self, key: &str, duration: Duration) {
        self.add(key, duration.as_millis() as u64);
    }
    /// Return the current results.
    pub fn results(&self, key: &str) -> StatResults {
        let collectors = match self.0.lock() {
            Ok(collectors) => collectors,
            Err(poisoned) => poisoned.into_inner(),
        };
        match collectors.get(key) {
            Some(collector) => StatResults {
                len: collector.minmax.len(),
                min: *collector.minmax.min().unwrap_or(&0),
                max: *collector.minmax.max().unwrap_or(&0),
                mean: collector.online.mean(),
                stddev: collector.online.stddev(),
            },
            None => StatResults {
                len: 0,
                min: 0,
                max: 0,
                mean: 0.0,
                stddev: 0.0,
            },
        }
    }
    pub fn keys(&self) -> Vec<String> {
        match self.0.lock() {
            Ok(collectors) => collectors.keys().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().keys().cloned().collect(),
        }
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Statistics::new()
    }
}

impl fmt::Debug for StatResults {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "#measurements: {}, min: {}, max: {}, mean: {:.3} +/- {:.3}",
            self.len, self.min, self.max, self.mean, self.stddev
        )
    }
}

impl fmt::Debug for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for key in self.keys() {
            writeln!(f, "{}: {:?}", key, self.results(&key))?;
        }
        Ok(())
    }
}

#[test]
fn usage() {
    let stats = Statistics::new();
    stats.add("WMS.osm.tries", 1);
    assert_eq!(stats.results("WMS.osm.tries").mean, 1.0);
    stats.add("WMS.osm.tries", 2);
    stats.add("WMS.osm.tries", 3);
    stats.add_duration("WMS.osm.tile_ms", Duration::from_millis(40));
    let tries = stats.results("WMS.osm.tries");
    assert_eq!(tries.len, 3);
    assert_eq!(tries.mean, 2.0);
    assert_eq!((tries.min, tries.max), (1, 3));
    assert_eq!(stats.results("WMS.osm.tile_ms").max, 40);
    assert_eq!(stats.results("WMS.other.tries").len, 0);
    assert_eq!(stats.keys(), vec!["WMS.osm.tile_ms", "WMS.osm.tries"]);
}
