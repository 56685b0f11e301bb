use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Layout strategies.
/// Key notes:
///   - `Compact` scans the whole square-ish canvas column by column
///   - `Vertical` stacks sprites downward; `Horizontal` lays them out in a row
///   - only the directional strategies honor a row/column `limit`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Compact,
    Horizontal,
    Vertical,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 3] = [Self::Compact, Self::Horizontal, Self::Vertical];

    /// Lenient lookup used for user-facing selectors: anything unrecognised is `Compact`.
    pub fn from_key(key: &str) -> Self {
        key.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl FromStr for LayoutKind {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutConfig {
    #[serde(default)]
    pub layout: LayoutKind,
    /// Canvas growth retries per sprite before it is reported as unplaced.
    #[serde(default = "default_max_pass")]
    pub max_pass: u32,
    /// Sprites per column (vertical) or row (horizontal). `None` or 0 means unlimited.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Canvas width used when there is nothing to measure.
    #[serde(default = "default_dimension")]
    pub default_width: u32,
    /// Canvas height used when there is nothing to measure.
    #[serde(default = "default_dimension")]
    pub default_height: u32,
    /// Evaluate `compare_layouts` candidates in parallel when feature "parallel" is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layout: LayoutKind::default(),
            max_pass: default_max_pass(),
            limit: None,
            default_width: default_dimension(),
            default_height: default_dimension(),
            parallel: false,
        }
    }
}

impl LayoutConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if the default canvas has a zero side. `max_pass = 0`
    /// is accepted: every placement then fails without scanning.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::StitchError;

        if self.default_width == 0 || self.default_height == 0 {
            return Err(StitchError::InvalidConfig(format!(
                "default dimensions must be positive, got {}x{}",
                self.default_width, self.default_height
            )));
        }
        Ok(())
    }

    /// The row/column limit with 0 normalised to unlimited.
    pub fn effective_limit(&self) -> Option<u32> {
        self.limit.filter(|&n| n > 0)
    }

    pub fn default_dimensions(&self) -> crate::model::Dimensions {
        crate::model::Dimensions::new(self.default_width, self.default_height)
    }

    /// Create a fluent builder for `LayoutConfig`.
    pub fn builder() -> LayoutConfigBuilder {
        LayoutConfigBuilder::new()
    }
}

fn default_max_pass() -> u32 {
    2
}
fn default_dimension() -> u32 {
    100
}

/// Builder for `LayoutConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct LayoutConfigBuilder {
    cfg: LayoutConfig,
}

impl LayoutConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: LayoutConfig::default(),
        }
    }
    pub fn layout(mut self, v: LayoutKind) -> Self {
        self.cfg.layout = v;
        self
    }
    pub fn max_pass(mut self, v: u32) -> Self {
        self.cfg.max_pass = v;
        self
    }
    pub fn limit(mut self, v: Option<u32>) -> Self {
        self.cfg.limit = v;
        self
    }
    pub fn with_default_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.default_width = w;
        self.cfg.default_height = h;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> LayoutConfig {
        self.cfg
    }
}
