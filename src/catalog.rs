use serde::{Deserialize, Serialize};

/// One entry in the fetched-data store, keyed by request id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchEntry {
    pub id: String,
    #[serde(default)]
    pub succeed: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Descriptive metadata for a single planet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanetInfo {
    pub planet: String,
    #[serde(default)]
    pub info: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoIconCatalog {
    #[serde(default)]
    pub planets: Vec<PlanetInfo>,
}

impl InfoIconCatalog {
    /// Pull the catalog out of the fetched-data store.
    ///
    /// An absent entry, a failed fetch, or a payload without a planet list
    /// all yield an empty catalog.
    pub fn from_fetch_data(entries: &[FetchEntry], key: &str) -> Self {
        let Some(entry) = entries.iter().find(|entry| entry.id == key) else {
            return Self::default();
        };
        if !entry.succeed {
            tracing::debug!(key, "info icon fetch did not succeed");
            return Self::default();
        }
        entry
            .data
            .clone()
            .and_then(|data| serde_json::from_value(data).ok())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }

    pub fn lookup(&self, identifier: &str) -> Option<&PlanetInfo> {
        self.planets.iter().find(|planet| planet.planet == identifier)
    }
}
