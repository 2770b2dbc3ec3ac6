//! Gadget configuration.
//!
//! [`FinalityConfig`] is what the gadget runs with. [`FinalitySettings`] is the
//! serializable subset used to load band-based configuration from JSON.

use crate::domain::{
    default_branch_translation, default_message_translation, BranchThresholdTranslation,
    GradeOfFinality, MessageThresholdTranslation, ThresholdBands,
};
use crate::error::{FinalityError, FinalityResult};
use serde::{Deserialize, Serialize};
use shared_types::BranchId;
use std::fmt;
use std::sync::Arc;

/// Finality configuration, immutable once handed to the gadget.
#[derive(Clone)]
pub struct FinalityConfig {
    /// Marker weight → grade
    pub message_translation: MessageThresholdTranslation,
    /// Branch weight → grade
    pub branch_translation: BranchThresholdTranslation,
    /// Level at which `MessageConfirmed` fires
    pub message_confirmed_level: GradeOfFinality,
    /// Level at which `TransactionConfirmed` and `BranchConfirmed` fire
    pub branch_confirmed_level: GradeOfFinality,
}

impl Default for FinalityConfig {
    fn default() -> Self {
        Self {
            message_translation: Arc::new(default_message_translation),
            branch_translation: Arc::new(default_branch_translation),
            message_confirmed_level: GradeOfFinality::High,
            branch_confirmed_level: GradeOfFinality::High,
        }
    }
}

impl fmt::Debug for FinalityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinalityConfig")
            .field("message_confirmed_level", &self.message_confirmed_level)
            .field("branch_confirmed_level", &self.branch_confirmed_level)
            .finish_non_exhaustive()
    }
}

impl FinalityConfig {
    #[must_use]
    pub fn with_message_threshold_translation<F>(mut self, translation: F) -> Self
    where
        F: Fn(f64) -> GradeOfFinality + Send + Sync + 'static,
    {
        self.message_translation = Arc::new(translation);
        self
    }

    #[must_use]
    pub fn with_branch_threshold_translation<F>(mut self, translation: F) -> Self
    where
        F: Fn(&BranchId, f64) -> GradeOfFinality + Send + Sync + 'static,
    {
        self.branch_translation = Arc::new(translation);
        self
    }

    #[must_use]
    pub fn with_message_confirmed_level(mut self, level: GradeOfFinality) -> Self {
        self.message_confirmed_level = level;
        self
    }

    #[must_use]
    pub fn with_branch_confirmed_level(mut self, level: GradeOfFinality) -> Self {
        self.branch_confirmed_level = level;
        self
    }

    /// Build a configuration from validated settings.
    pub fn from_settings(settings: &FinalitySettings) -> FinalityResult<Self> {
        settings.validate()?;

        Ok(Self {
            message_translation: settings.thresholds.message_translation(),
            branch_translation: settings.thresholds.branch_translation(),
            message_confirmed_level: settings.message_confirmed_level,
            branch_confirmed_level: settings.branch_confirmed_level,
        })
    }

    #[must_use]
    pub fn translate_message(&self, weight: f64) -> GradeOfFinality {
        (self.message_translation)(weight)
    }

    #[must_use]
    pub fn translate_branch(&self, branch_id: &BranchId, weight: f64) -> GradeOfFinality {
        (self.branch_translation)(branch_id, weight)
    }
}

/// Serializable finality settings.
///
/// ```json
/// {
///   "thresholds": { "low": 0.2, "medium": 0.3, "high": 0.5 },
///   "message_confirmed_level": "High",
///   "branch_confirmed_level": "Medium"
/// }
/// ```
///
/// Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalitySettings {
    pub thresholds: ThresholdBands,
    pub message_confirmed_level: GradeOfFinality,
    pub branch_confirmed_level: GradeOfFinality,
}

impl Default for FinalitySettings {
    fn default() -> Self {
        Self {
            thresholds: ThresholdBands::default(),
            message_confirmed_level: GradeOfFinality::High,
            branch_confirmed_level: GradeOfFinality::High,
        }
    }
}

impl FinalitySettings {
    /// Parse and validate settings from JSON.
    pub fn from_json(json: &str) -> FinalityResult<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| FinalityError::SettingsParse {
                reason: e.to_string(),
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> FinalityResult<()> {
        self.thresholds.validate()?;

        for (name, level) in [
            ("message_confirmed_level", self.message_confirmed_level),
            ("branch_confirmed_level", self.branch_confirmed_level),
        ] {
            if level == GradeOfFinality::None {
                return Err(FinalityError::InvalidSettings {
                    reason: format!("{name} must be above None"),
                });
            }
        }
        Ok(())
    }
}
