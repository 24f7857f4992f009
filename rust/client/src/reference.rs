use crate::error::{EnvError, EnvResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSample {
    pub altitude: f64,
    pub pitch: f64,
}

/// Ground-truth ascent profile, one sample per step index. Read-only once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    samples: Vec<ReferenceSample>,
}

impl ReferenceTable {
    pub fn new(samples: Vec<ReferenceSample>) -> EnvResult<Self> {
        if samples.is_empty() {
            return Err(EnvError::InvalidConfig(
                "reference trajectory is empty".to_string(),
            ));
        }

        Ok(Self { samples })
    }

    /// Parse a JSON array of `{"altitude": .., "pitch": ..}` objects.
    pub fn from_json(json: &str) -> EnvResult<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> EnvResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let table = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), len = table.len(), "loaded reference trajectory");
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false: `new` rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample(&self, index: usize) -> EnvResult<&ReferenceSample> {
        self.samples
            .get(index)
            .ok_or(EnvError::ReferenceExhausted {
                index,
                len: self.samples.len(),
            })
    }
}
