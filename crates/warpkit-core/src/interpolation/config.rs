//! Interpolation options.
//!
//! Boundary handling, spline order and fill value shared by the interpolators,
//! plus the channel axis selector for multi-channel images.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::{Result, WarpError};
use super::spline::check_order;

/// Highest supported spline order.
pub const MAX_ORDER: usize = 5;

/// How samples outside the image are resolved.
///
/// For an axis of length 4 holding `a b c d`:
/// * `Constant`: `k k k | a b c d | k k k` with `k` the fill value
/// * `Nearest`: `a a a | a b c d | d d d`
/// * `Mirror`: `d c b | a b c d | c b a`
/// * `Reflect`: `c b a | a b c d | d c b`
/// * `Wrap`: `b c d | a b c d | a b c`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    #[default]
    Constant,
    Nearest,
    Mirror,
    Reflect,
    Wrap,
}

impl BoundaryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Nearest => "nearest",
            Self::Mirror => "mirror",
            Self::Reflect => "reflect",
            Self::Wrap => "wrap",
        }
    }
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryMode {
    type Err = WarpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "constant" => Ok(Self::Constant),
            "nearest" => Ok(Self::Nearest),
            "mirror" => Ok(Self::Mirror),
            "reflect" => Ok(Self::Reflect),
            "wrap" => Ok(Self::Wrap),
            other => Err(WarpError::invalid_configuration(format!(
                "Unknown boundary mode '{}'",
                other
            ))),
        }
    }
}

/// Construction-time defaults of an interpolator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpolatorConfig {
    pub mode: BoundaryMode,
    pub order: usize,
    pub cval: f32,
}

impl Default for InterpolatorConfig {
    fn default() -> Self {
        Self {
            mode: BoundaryMode::Constant,
            order: 3,
            cval: 0.0,
        }
    }
}

impl InterpolatorConfig {
    pub fn with_mode(mut self, mode: BoundaryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    pub fn with_cval(mut self, cval: f32) -> Self {
        self.cval = cval;
        self
    }

    /// Check that the spline order is supported.
    pub fn validate(&self) -> Result<()> {
        check_order(self.order)
    }
}

/// Per-call overrides of an [`InterpolatorConfig`].
///
/// `None` inherits the construction-time value. An explicit `Some(0.0)`
/// fill value is honored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleOptions {
    pub mode: Option<BoundaryMode>,
    pub order: Option<usize>,
    pub cval: Option<f32>,
}

impl SampleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: BoundaryMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn order(mut self, order: usize) -> Self {
        self.order = Some(order);
        self
    }

    pub fn cval(mut self, cval: f32) -> Self {
        self.cval = Some(cval);
        self
    }

    /// True when no option is set.
    pub fn is_empty(&self) -> bool {
        self.mode.is_none() && self.order.is_none() && self.cval.is_none()
    }

    /// Merge these overrides into `defaults`.
    pub fn resolve(&self, defaults: &InterpolatorConfig) -> Result<InterpolatorConfig> {
        let config = InterpolatorConfig {
            mode: self.mode.unwrap_or(defaults.mode),
            order: self.order.unwrap_or(defaults.order),
            cval: self.cval.unwrap_or(defaults.cval),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Position of the channel axis in a multi-channel image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelAxis {
    /// Channels on the leading axis.
    First,
    /// Channels on the trailing axis.
    #[default]
    Last,
}

impl fmt::Display for ChannelAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("channels_first"),
            Self::Last => f.write_str("channels_last"),
        }
    }
}

impl FromStr for ChannelAxis {
    type Err = WarpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first" | "channels_first" => Ok(Self::First),
            "last" | "channels_last" => Ok(Self::Last),
            other => Err(WarpError::invalid_configuration(format!(
                "Unknown channel axis '{}', use 'first' or 'last'",
                other
            ))),
        }
    }
}
