use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::{Result, VerifyError};

/// `<property name=.. value=..>` pairs collected from anywhere in the map.
///
/// Later occurrences of a name overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapProperties {
    values: HashMap<String, String>,
}

impl MapProperties {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look up `name` and parse it as an integer > 0.
    pub fn positive_int(&self, name: &str) -> Result<u32> {
        let raw = self
            .get(name)
            .ok_or_else(|| VerifyError::Config(format!("`{name}` property not found")))?;

        match raw.trim().parse::<u32>() {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(VerifyError::Config(format!(
                "`{name}` must be a positive integer, got `{raw}`"
            ))),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapProperties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = MapProperties::default();
        for (k, v) in iter {
            props.insert(k, v);
        }
        props
    }
}

/// One `<chunk>` of an infinite tile layer. `data` is the untouched CSV text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
    pub data: String,
}

#[derive(Debug, Clone)]
pub struct TileLayer {
    pub name: String,
    pub chunks: Vec<Chunk>,
}

/// Everything the verifier needs out of a `.tmx` file.
#[derive(Debug, Clone)]
pub struct TiledMap {
    pub properties: MapProperties,
    pub layer: TileLayer,
}

/// Inclusive bounding box of every non-empty tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl Bounds {
    pub fn point(x: i64, y: i64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    pub fn include(&mut self, x: i64, y: i64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn has_negative(&self) -> bool {
        self.min_x < 0 || self.min_y < 0
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X=[{}..{}], Y=[{}..{}]",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}

/// Sparse `(x, y) -> GID` lookup built from every chunk of the layer.
///
/// Only non-empty tiles are stored; `get` answers 0 for anything else.
/// `bounds` is `None` until the first tile is inserted.
#[derive(Debug, Clone, Default)]
pub struct TileIndex {
    tiles: HashMap<(i64, i64), u32>,
    bounds: Option<Bounds>,
}

impl TileIndex {
    /// Record a non-empty source tile at `(x, y)` with its masked `gid`.
    ///
    /// The bounding box grows for every call. A `gid` of 0 (a tile carrying
    /// only flip flags) is not stored, so lookups still answer 0 there.
    pub fn insert(&mut self, x: i64, y: i64, gid: u32) {
        if gid != 0 {
            self.tiles.insert((x, y), gid);
        }
        match &mut self.bounds {
            Some(b) => b.include(x, y),
            None => self.bounds = Some(Bounds::point(x, y)),
        }
    }

    pub fn get(&self, x: i64, y: i64) -> u32 {
        self.tiles.get(&(x, y)).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Tiles left or above the origin; no screen ever covers them.
    pub fn count_negative(&self) -> usize {
        self.tiles.keys().filter(|(x, y)| *x < 0 || *y < 0).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((i64, i64), u32)> + '_ {
        self.tiles.iter().map(|(k, v)| (*k, *v))
    }
}

/// Dense layout of the exported screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenGeometry {
    pub screen_width: u32,
    pub screen_height: u32,
    pub screens_per_row: u32,
    pub screens_per_col: u32,
}

impl ScreenGeometry {
    /// Bytes in one screen file.
    pub fn screen_len(&self) -> usize {
        self.screen_width as usize * self.screen_height as usize
    }

    /// Number of screens the exporter should have produced.
    pub fn screen_count(&self) -> u64 {
        u64::from(self.screens_per_row) * u64::from(self.screens_per_col)
    }

    /// World-tile coordinate of the top-left tile of screen `index`.
    ///
    /// `None` when the grid has no columns or the origin is past `i64`.
    pub fn origin(&self, index: u32) -> Option<(i64, i64)> {
        let screen_x = index.checked_rem(self.screens_per_row)?;
        let screen_y = index.checked_div(self.screens_per_row)?;
        Some((
            i64::from(screen_x).checked_mul(i64::from(self.screen_width))?,
            i64::from(screen_y).checked_mul(i64::from(self.screen_height))?,
        ))
    }
}

/// First byte in a screen file that disagrees with the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mismatch {
    pub local_x: u32,
    pub local_y: u32,
    pub global_x: i64,
    pub global_y: i64,
    pub actual: u8,
    pub expected: u32,
    pub raw_gid: u32,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at ({},{}) global ({},{}): Found {}, Expected {} (GID {})",
            self.local_x,
            self.local_y,
            self.global_x,
            self.global_y,
            self.actual,
            self.expected,
            self.raw_gid
        )?;
        if self.raw_gid != 0 && u32::from(self.actual) == self.raw_gid {
            write!(f, "; byte equals the raw GID, exporter may not apply the -1 shift")?;
        } else if self.expected > u32::from(u8::MAX) {
            write!(f, "; GID {} does not fit in one byte", self.raw_gid)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_last_write_wins() {
        let props: MapProperties = [("screenWidth", "16"), ("screenWidth", "32")]
            .into_iter()
            .collect();
        assert_eq!(props.get("screenWidth"), Some("32"));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn positive_int_rejects_zero_and_garbage() {
        let props: MapProperties = [("a", "0"), ("b", "wide"), ("c", "-4"), ("d", " 24 ")]
            .into_iter()
            .collect();
        assert!(matches!(props.positive_int("a"), Err(VerifyError::Config(_))));
        assert!(matches!(props.positive_int("b"), Err(VerifyError::Config(_))));
        assert!(matches!(props.positive_int("c"), Err(VerifyError::Config(_))));
        assert!(matches!(props.positive_int("missing"), Err(VerifyError::Config(_))));
        assert_eq!(props.positive_int("d").unwrap(), 24);
    }

    #[test]
    fn tile_index_tracks_bounds_and_skips_empty() {
        let mut idx = TileIndex::default();
        assert!(idx.bounds().is_none());

        idx.insert(3, 4, 7);
        idx.insert(-2, 10, 1);
        idx.insert(50, 50, 0);

        assert_eq!(idx.len(), 2);
        assert_eq!(idx.get(3, 4), 7);
        assert_eq!(idx.get(50, 50), 0);
        // a flags-only tile is not stored but still counts toward the extent
        assert_eq!(
            idx.bounds(),
            Some(Bounds {
                min_x: -2,
                min_y: 4,
                max_x: 50,
                max_y: 50
            })
        );
        assert_eq!(idx.count_negative(), 1);
    }

    #[test]
    fn origin_walks_rows_of_screens() {
        let geo = ScreenGeometry {
            screen_width: 32,
            screen_height: 24,
            screens_per_row: 3,
            screens_per_col: 2,
        };
        assert_eq!(geo.origin(0), Some((0, 0)));
        assert_eq!(geo.origin(2), Some((64, 0)));
        assert_eq!(geo.origin(4), Some((32, 24)));
        assert_eq!(geo.screen_len(), 768);
        assert_eq!(geo.screen_count(), 6);
    }

    #[test]
    fn origin_without_columns_is_none() {
        let geo = ScreenGeometry {
            screen_width: 1,
            screen_height: 1,
            screens_per_row: 0,
            screens_per_col: 1,
        };
        assert_eq!(geo.origin(0), None);

        let huge = ScreenGeometry {
            screen_width: u32::MAX,
            screen_height: u32::MAX,
            screens_per_row: 1,
            screens_per_col: u32::MAX,
        };
        assert_eq!(huge.origin(1), Some((0, i64::from(u32::MAX))));
        // (2^32 - 1)^2 does not fit in i64
        assert_eq!(huge.origin(u32::MAX), None);
        assert_eq!(huge.screen_count(), u64::from(u32::MAX));
    }

    #[test]
    fn mismatch_hints_at_unshifted_gid() {
        let m = Mismatch {
            local_x: 5,
            local_y: 5,
            global_x: 5,
            global_y: 5,
            actual: 10,
            expected: 9,
            raw_gid: 10,
        };
        let text = m.to_string();
        assert!(text.starts_with("at (5,5) global (5,5): Found 10, Expected 9 (GID 10)"));
        assert!(text.contains("-1 shift"));
    }
}
