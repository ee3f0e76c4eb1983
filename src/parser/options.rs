//! Parsing options and configuration.

use crate::error::{Error, Result};

/// Smallest accepted scale factor.
pub const MIN_SCALE: f32 = 0.001;

/// Scale factors above this are accepted with a warning.
pub const LARGE_SCALE: f32 = 3.0;

/// Options for reading layouts and scripts.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether to recompute container boxes after reading
    pub recompute: bool,

    /// Scale factor applied to word coordinates during recompute
    pub scale: f32,

    /// Offset added to scaled word coordinates during recompute
    pub offset: (f32, f32),
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip stray tokens and unknown atoms).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable the recompute pass.
    pub fn with_recompute(mut self, recompute: bool) -> Self {
        self.recompute = recompute;
        self
    }

    /// Keep boxes exactly as read.
    pub fn raw(mut self) -> Self {
        self.recompute = false;
        self
    }

    /// Set the scale factor. Implies recompute.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self.recompute = true;
        self
    }

    /// Set the coordinate offset. Implies recompute.
    pub fn with_offset(mut self, dx: f32, dy: f32) -> Self {
        self.offset = (dx, dy);
        self.recompute = true;
        self
    }

    /// Check the scale factor before any input is consumed.
    pub fn validate(&self) -> Result<()> {
        if self.scale.is_nan() || self.scale < MIN_SCALE {
            return Err(Error::InvalidScale(self.scale));
        }
        if self.scale > LARGE_SCALE {
            log::warn!("Scaling factor {} is rather big", self.scale);
        }
        Ok(())
    }

    pub(crate) fn is_lenient(&self) -> bool {
        self.error_mode == ErrorMode::Lenient
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            recompute: true,
            scale: 1.0,
            offset: (0.0, 0.0),
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any unexpected token
    #[default]
    Strict,
    /// Skip stray tokens and unknown atoms, logging them
    Lenient,
}
