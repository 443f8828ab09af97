//! The functional core.
//!
//! Map-side passes (index, geometry) run once; the verifier then reads
//! their output without mutating it.
pub mod geometry;
pub mod tile_index;
pub mod verify;

use tracing::{info, warn};

use crate::error::{Result, VerifyError};
use crate::model::{ScreenGeometry, TileIndex, TiledMap};

/// Read-only inputs for [`verify::verify_files`].
#[derive(Debug)]
pub struct Prepared {
    pub tiles: TileIndex,
    pub geometry: ScreenGeometry,
}

/// Runs every map-side pass.
pub fn prepare(map: &TiledMap) -> Result<Prepared> {
    let tiles = tile_index::build(&map.layer.chunks)?;
    let bounds = tiles.bounds().ok_or_else(|| {
        VerifyError::Structural(format!("layer `{}` has no non-empty tiles", map.layer.name))
    })?;
    info!("Map Bounds: {} ({} tiles)", bounds, tiles.len());

    let geometry = geometry::resolve(&map.properties, &bounds)?;

    let excluded = tiles.count_negative();
    if excluded > 0 {
        warn!("{} indexed tiles are excluded from verification", excluded);
    }

    Ok(Prepared { tiles, geometry })
}
