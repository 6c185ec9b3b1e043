//! Depth remapping for integer image output
//!
//! Raw linear depth spans more range than an 8/16-bit grayscale image can
//! represent, so PNG depth output is shifted and scaled before encoding.
//! HDR output skips the remap and stores raw depth.

use serde::{Deserialize, Serialize};

/// Fixed shift applied before scaling; tuned for the default orbit distance
pub const DEPTH_REMAP_OFFSET: f32 = -0.7;

/// Affine depth remap with a lower clamp at zero
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthRemap {
    pub offset: f32,
    pub scale: f32,
}

impl DepthRemap {
    /// Remap with the standard offset and the given scale
    pub fn with_scale(scale: f32) -> Self {
        Self {
            offset: DEPTH_REMAP_OFFSET,
            scale,
        }
    }

    /// `max((d + offset) * scale, 0)`; values above 1 saturate at encode time
    pub fn apply(&self, depth: f32) -> f32 {
        ((depth + self.offset) * self.scale).max(0.0)
    }
}

impl Default for DepthRemap {
    fn default() -> Self {
        Self::with_scale(1.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_remap_affine() {
        let remap = DepthRemap::with_scale(1.4);
        assert_relative_eq!(remap.apply(0.7), 0.0);
        assert_relative_eq!(remap.apply(1.2), 0.5 * 1.4);
    }

    #[test]
    fn test_remap_clamps_below_zero() {
        let remap = DepthRemap::with_scale(2.0);
        assert_relative_eq!(remap.apply(0.1), 0.0);
    }

    #[test]
    fn test_background_depth_saturates() {
        // Background pixels carry a huge clear depth and must land well
        // above 1.0 so integer encoding saturates to white.
        let remap = DepthRemap::default();
        assert!(remap.apply(1e10) > 1.0);
    }
}
