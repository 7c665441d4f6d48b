//! Published ads.
//!
//! An ad occupies a solid rectangle of plots. Its plot list is kept sorted
//! row-major with duplicates removed, both when built with [`Ad::new`] and
//! when deserialized, so `plots[0]` is always the top-left plot that triggers
//! the ad's render unit.

#[cfg(test)]
#[path = "ad_test.rs"]
mod ad_test;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::cell::{CellId, CellSet};
use crate::rect::{CellRect, bounding_box};

/// Unique identifier for an ad.
pub type AdId = Uuid;

/// A published ad as held by the client and sent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    /// Stable identifier for the ad's lifetime.
    pub id: AdId,
    /// Plots covered by the ad, row-major, no duplicates.
    #[serde(deserialize_with = "deserialize_plots")]
    pub plots: Vec<CellId>,
    /// Public URL of the uploaded image.
    pub image_url: String,
    /// Short message shown on hover.
    pub message: String,
    /// User who bought the ad, if known.
    #[serde(default)]
    pub owner_id: Option<Uuid>,
}

impl Ad {
    /// Build an ad, normalizing `plots` to row-major order.
    #[must_use]
    pub fn new(
        id: AdId,
        plots: impl IntoIterator<Item = CellId>,
        image_url: impl Into<String>,
        message: impl Into<String>,
        owner_id: Option<Uuid>,
    ) -> Self {
        let plots: CellSet = plots.into_iter().collect();
        Self {
            id,
            plots: plots.into_iter().collect(),
            image_url: image_url.into(),
            message: message.into(),
            owner_id,
        }
    }

    /// The plot whose render slot draws this ad. `None` for an ad with no plots.
    #[must_use]
    pub fn top_left(&self) -> Option<CellId> {
        self.plots.first().copied()
    }

    /// Placement rectangle for the ad. `None` for an ad with no plots.
    #[must_use]
    pub fn bounding_box(&self) -> Option<CellRect> {
        bounding_box(self.plots.iter().copied())
    }
}

fn deserialize_plots<'de, D>(deserializer: D) -> Result<Vec<CellId>, D::Error>
where
    D: Deserializer<'de>,
{
    let plots = CellSet::deserialize(deserializer)?;
    Ok(plots.into_iter().collect())
}
