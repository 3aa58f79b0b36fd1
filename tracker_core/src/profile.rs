//! Profile fields read from external storage.
//!
//! The app keeps client id, gym id, gender, body weight and gym presence in a
//! small JSON document. It is read once when a workout screen gains focus and
//! cached for the rest of the session.

use crate::{Profile, Result};
use std::path::Path;

/// Body weight assumed when the profile doesn't carry one
pub const DEFAULT_BODY_WEIGHT_KG: f64 = 70.0;

impl Profile {
    /// Load the profile from a JSON file
    ///
    /// A missing file yields an empty profile. A malformed one is logged and
    /// also yields an empty profile, so a broken profile never blocks tracking;
    /// submission still fails later without a client id.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No profile found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Failed to read profile at {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        match serde_json::from_str::<Profile>(&contents) {
            Ok(profile) => {
                tracing::debug!("Loaded profile from {:?}", path);
                Ok(profile)
            }
            Err(e) => {
                tracing::warn!("Failed to parse profile at {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Body weight for calorie calculation, falling back to `default_kg`
    ///
    /// Non-positive stored weights are treated as missing.
    pub fn body_weight_or(&self, default_kg: f64) -> f64 {
        self.body_weight_kg
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(default_kg)
    }
}
