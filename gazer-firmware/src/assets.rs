//! Eye art generated by build.rs

use gazer_core::assets::{AssetError, EyeAssets, SliceGrid, StaticEyeAssets};

#[allow(dead_code)]
mod art {
    include!(concat!(env!("OUT_DIR"), "/eye_assets.rs"));
}

pub use art::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Wrap the static tables, checking their geometry
pub fn eye_assets() -> Result<StaticEyeAssets, AssetError> {
    EyeAssets::new(
        SliceGrid::new(&art::SCLERA, art::SCLERA_SIZE, art::SCLERA_SIZE)?,
        SliceGrid::new(&art::IRIS, art::IRIS_MAP_WIDTH, art::IRIS_MAP_HEIGHT)?,
        SliceGrid::new(&art::POLAR, art::IRIS_SIZE, art::IRIS_SIZE)?,
        SliceGrid::new(&art::UPPER, art::SCREEN_WIDTH, art::SCREEN_HEIGHT)?,
        SliceGrid::new(&art::LOWER, art::SCREEN_WIDTH, art::SCREEN_HEIGHT)?,
    )
}
