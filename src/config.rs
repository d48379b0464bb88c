use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional refinement stages layered over plain coverage.
///
/// All stages are on by default. Turning them off reproduces the coarser
/// verdicts of earlier versions of the analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Restrict pinned pieces to the line through their king.
    pub pin_filtering: bool,
    /// Ignore king-only threats on squares the mover defends.
    pub defense_refinement: bool,
    /// Re-run coverage with the captured piece removed to find hidden recaptures.
    pub capture_simulation: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            pin_filtering: true,
            defense_refinement: true,
            capture_simulation: true,
        }
    }
}

impl AnalysisConfig {
    /// Plain coverage with every refinement disabled.
    pub fn legacy_unrefined() -> Self {
        AnalysisConfig {
            pin_filtering: false,
            defense_refinement: false,
            capture_simulation: false,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_json(&text)?)
    }

    /// Sets the flag called `name`. Returns `false` for an unknown name.
    pub fn set_option(&mut self, name: &str, value: bool) -> bool {
        match name {
            "pin_filtering" => self.pin_filtering = value,
            "defense_refinement" => self.defense_refinement = value,
            "capture_simulation" => self.capture_simulation = value,
            _ => return false,
        }
        true
    }
}
