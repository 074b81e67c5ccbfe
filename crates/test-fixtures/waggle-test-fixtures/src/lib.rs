//! Shared fixtures: curve definitions, stop lists, and timelines that pair
//! a wide curve, a tall curve and a stop list by name.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    curves: HashMap<String, String>,
    stops: HashMap<String, String>,
    #[serde(default)]
    timelines: HashMap<String, TimelineEntry>,
}

/// Fixture names (not paths) making up one timeline.
#[derive(Clone, Debug, Deserialize)]
pub struct TimelineEntry {
    pub wide: String,
    pub tall: String,
    pub stops: String,
}

fn fixture_path(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../../fixtures")
        .join(rel)
}

fn read_fixture(rel: &str) -> Result<String> {
    let path = fixture_path(rel);
    fs::read_to_string(&path).with_context(|| format!("reading fixture {}", path.display()))
}

fn parse_fixture<T: DeserializeOwned>(rel: &str) -> Result<T> {
    serde_json::from_str(&read_fixture(rel)?).with_context(|| format!("parsing fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

fn sorted_keys<T>(map: &HashMap<String, T>) -> Vec<String> {
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}

/// Curve definitions (`{ variant, view_box, d }`).
pub mod curves {
    use super::*;

    pub fn keys() -> Vec<String> {
        sorted_keys(&MANIFEST.curves)
    }

    pub fn json(name: &str) -> Result<String> {
        read_fixture(lookup(&MANIFEST.curves, "curve", name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        parse_fixture(lookup(&MANIFEST.curves, "curve", name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(fixture_path(lookup(&MANIFEST.curves, "curve", name)?))
    }
}

/// Ordered stop lists.
pub mod stops {
    use super::*;

    pub fn keys() -> Vec<String> {
        sorted_keys(&MANIFEST.stops)
    }

    pub fn json(name: &str) -> Result<String> {
        read_fixture(lookup(&MANIFEST.stops, "stops", name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        parse_fixture(lookup(&MANIFEST.stops, "stops", name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(fixture_path(lookup(&MANIFEST.stops, "stops", name)?))
    }
}

/// Named (wide curve, tall curve, stops) triples.
pub mod timelines {
    use super::*;

    pub fn keys() -> Vec<String> {
        sorted_keys(&MANIFEST.timelines)
    }

    pub fn entry(name: &str) -> Result<&'static TimelineEntry> {
        lookup(&MANIFEST.timelines, "timeline", name)
    }

    /// Load the wide curve, tall curve and stop list, in that order.
    pub fn load<C, S>(name: &str) -> Result<(C, C, S)>
    where
        C: DeserializeOwned,
        S: DeserializeOwned,
    {
        let e = entry(name)?;
        let wide = curves::load(&e.wide).with_context(|| format!("timeline '{name}' wide curve"))?;
        let tall = curves::load(&e.tall).with_context(|| format!("timeline '{name}' tall curve"))?;
        let stops = stops::load(&e.stops).with_context(|| format!("timeline '{name}' stops"))?;
        Ok((wide, tall, stops))
    }
}
