//! Geometry Resolver.
//!
//! The exporter lays screens out row-major starting at world (0, 0), so the
//! screen grid is derived from the far edge of the tile bounding box.
//! Tiles at negative coordinates belong to no screen and are never checked.

use tracing::{info, warn};

use crate::error::{Result, VerifyError};
use crate::model::{Bounds, MapProperties, ScreenGeometry};

pub const SCREEN_WIDTH: &str = "screenWidth";
pub const SCREEN_HEIGHT: &str = "screenHeight";

/// `screenWidth` x `screenHeight` from the map properties.
pub fn screen_size(props: &MapProperties) -> Result<(u32, u32)> {
    let width = props.positive_int(SCREEN_WIDTH)?;
    let height = props.positive_int(SCREEN_HEIGHT)?;
    info!("Screen Size: {}x{}", width, height);
    Ok((width, height))
}

/// Screens needed to cover tiles `0..=max`, i.e. `ceil((max + 1) / screen)`.
///
/// A negative `max` still yields one screen so that screen indices stay
/// decodable. A grid wider than `u32` screens is a structural error.
pub fn screens_needed(max: i64, screen: u32) -> Result<u32> {
    let full = max.max(0) / i64::from(screen);
    u32::try_from(full)
        .ok()
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| {
            VerifyError::Structural(format!(
                "map extent {max} needs more than {} screens of {screen} tiles",
                u32::MAX
            ))
        })
}

pub fn resolve(props: &MapProperties, bounds: &Bounds) -> Result<ScreenGeometry> {
    let (screen_width, screen_height) = screen_size(props)?;

    if bounds.has_negative() {
        warn!(
            "Map has tiles at negative coordinates ({}); they lie outside every screen and are not verified",
            bounds
        );
    }

    let geometry = ScreenGeometry {
        screen_width,
        screen_height,
        screens_per_row: screens_needed(bounds.max_x, screen_width)?,
        screens_per_col: screens_needed(bounds.max_y, screen_height)?,
    };
    info!("Calculated screensPerRow: {}", geometry.screens_per_row);
    Ok(geometry)
}
