use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestCounts {
    pub products: usize,
    pub services: usize,
    pub versions: usize,
    pub release_notes: usize,
    pub info_cards: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LastUpdated {
    pub products: DateTime<Utc>,
    pub services: DateTime<Utc>,
    pub versions: DateTime<Utc>,
}

/// Bookkeeping written alongside the content: when it was generated and how much of it there is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub generated_at: DateTime<Utc>,
    pub counts: ManifestCounts,
    pub last_updated: LastUpdated,
}

impl Manifest {
    /// Stamp `generated_at` and every `last_updated` entry with `now`.
    pub fn refresh_timestamps(&mut self, now: DateTime<Utc>) {
        self.generated_at = now;
        self.last_updated = LastUpdated {
            products: now,
            services: now,
            versions: now,
        };
    }
}
