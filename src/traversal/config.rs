use serde::{Deserialize, Serialize};

use crate::error::{DescriptorError, Result};

/// What a walk does when it reaches a descriptor that is still being expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CyclePolicy {
    /// Abort the walk with `DescriptorError::CyclicSchema`.
    #[default]
    Fail,
    /// Ask the fold for a reference result in place of the expanded subtree.
    Reference,
}

/// Settings for a `DescriptorWalker`.
///
/// Deserializes from JSON such as `{"cycle-policy": "reference", "max-depth": 64}`;
/// missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct WalkConfig {
    pub cycle_policy: CyclePolicy,
    /// Maximum number of descriptors expanded at once, root included.
    pub max_depth: Option<usize>,
}

impl WalkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cycle_policy(mut self, cycle_policy: CyclePolicy) -> Self {
        self.cycle_policy = cycle_policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: WalkConfig =
            serde_json::from_str(json).map_err(|e| DescriptorError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| DescriptorError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == Some(0) {
            return Err(DescriptorError::InvalidConfig(
                "max-depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
