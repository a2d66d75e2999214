pub mod collision;
pub mod mask;
pub mod region;

pub use collision::can_move_to;
pub use mask::{FULL_OPACITY, OpacityMask};
pub use region::{Region, RegionLayers};
