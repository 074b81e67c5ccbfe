//! Ordered milestone list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{StopListError, WaggleError};

/// Display content of a stop. Opaque to the animator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StopPayload {
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
}

/// One milestone along the curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    /// Display position; defaults to the position in the list when omitted.
    #[serde(default)]
    pub index: Option<usize>,
    #[serde(flatten)]
    pub payload: StopPayload,
}

/// Validated, fixed-order list of stops.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StopList {
    stops: Vec<Stop>,
}

impl StopList {
    /// Validate order and uniqueness; fills in missing indices.
    pub fn new(mut stops: Vec<Stop>) -> Result<Self, StopListError> {
        if stops.is_empty() {
            return Err(StopListError::Empty);
        }
        let mut seen = HashSet::with_capacity(stops.len());
        for (position, stop) in stops.iter_mut().enumerate() {
            if !seen.insert(stop.id.clone()) {
                return Err(StopListError::DuplicateId(stop.id.clone()));
            }
            match stop.index {
                Some(declared) if declared != position => {
                    return Err(StopListError::IndexMismatch {
                        id: stop.id.clone(),
                        declared,
                        position,
                    })
                }
                _ => stop.index = Some(position),
            }
        }
        Ok(Self { stops })
    }

    pub fn from_json_str(s: &str) -> Result<Self, WaggleError> {
        let stops: Vec<Stop> = serde_json::from_str(s)?;
        Ok(Self::new(stops)?)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Stop> {
        self.stops.get(index)
    }

    /// Position of the stop with `id`.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.stops.iter().position(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter()
    }
}

impl<'de> Deserialize<'de> for StopList {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stops = Vec::<Stop>::deserialize(deserializer)?;
        StopList::new(stops).map_err(serde::de::Error::custom)
    }
}
