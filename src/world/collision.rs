//! Corner-sampled collision against an opacity mask.

use glam::Vec2;

use crate::world::mask::OpacityMask;

/// Decide whether a body whose hitbox samples are `samples` may occupy them.
///
/// Every sample must pass. A sample outside the mask rejects the whole
/// candidate immediately, even with `no_clip`; inside the mask a sample
/// passes when `no_clip` is set or its pixel is below full opacity.
///
/// No-clip is meant for bodies that ignore walls (bats, insects) but must
/// still stay inside the region.
pub fn can_move_to(mask: &OpacityMask, samples: &[Vec2], no_clip: bool) -> bool {
    for &point in samples {
        if !mask.contains(point) {
            return false;
        }
        if !no_clip && !mask.is_traversable(point) {
            return false;
        }
    }
    true
}
