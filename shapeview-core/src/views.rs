//! Per-view camera metadata records

use crate::OrbitRig;
use serde::{Deserialize, Serialize};

/// Camera metadata for one rendered view.
///
/// Serialized as one line of `rendering_metadata.txt`:
/// azimuth, elevation, in-plane rotation, distance, field-of-view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewPose {
    pub azimuth_deg: f32,
    pub elevation_deg: f32,
    pub inplane_deg: f32,
    pub distance: f32,
    pub fov_deg: f32,
}

impl ViewPose {
    /// One space-separated metadata line, without a trailing newline
    pub fn metadata_line(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.azimuth_deg, self.elevation_deg, self.inplane_deg, self.distance, self.fov_deg
        )
    }
}

/// Camera poses for a full orbit in `360 / views` degree steps.
///
/// View `i` in `[0, views)` gets azimuth `360 * i / views`; elevation,
/// distance and field-of-view come from the rig and are the same for every
/// view, in-plane rotation is always zero.
pub fn orbit_poses(views: u32, rig: &OrbitRig) -> Vec<ViewPose> {
    let elevation_deg = rig.elevation_deg();
    let distance = rig.distance();

    (0..views)
        .map(|i| ViewPose {
            azimuth_deg: 360.0 * i as f32 / views as f32,
            elevation_deg,
            inplane_deg: 0.0,
            distance,
            fov_deg: rig.fov_deg,
        })
        .collect()
}
