//! Sparse Tile Index Builder.
//!
//! Flattens the chunk list of the tile layer into a single
//! `(x, y) -> GID` lookup, world coordinates throughout.

use tracing::warn;

use crate::error::{Result, VerifyError};
use crate::model::{Chunk, TileIndex};

/// Tiled keeps flip/rotation flags in the top three bits of a GID.
pub const GID_MASK: u32 = 0x1FFF_FFFF;

pub fn mask_gid(raw: u32) -> u32 {
    raw & GID_MASK
}

/// Split CSV chunk text into raw GIDs. Commas and whitespace both separate.
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

pub fn build(chunks: &[Chunk]) -> Result<TileIndex> {
    let mut index = TileIndex::default();
    for chunk in chunks {
        add_chunk(&mut index, chunk)?;
    }
    Ok(index)
}

fn add_chunk(index: &mut TileIndex, chunk: &Chunk) -> Result<()> {
    let width = chunk.width as usize;
    let mut count = 0usize;

    for (i, token) in tokens(&chunk.data).enumerate() {
        let raw: u32 = token.parse().map_err(|_| VerifyError::Parse {
            chunk_x: chunk.x,
            chunk_y: chunk.y,
            position: i,
            token: token.to_string(),
        })?;
        count += 1;

        if raw == 0 {
            continue;
        }

        let global_x = chunk.x.checked_add((i % width) as i64);
        let global_y = chunk.y.checked_add((i / width) as i64);
        let (Some(global_x), Some(global_y)) = (global_x, global_y) else {
            return Err(VerifyError::Structural(format!(
                "chunk at ({}, {}): tile {} lies past the coordinate range",
                chunk.x, chunk.y, i
            )));
        };
        index.insert(global_x, global_y, mask_gid(raw));
    }

    let declared = width * chunk.height as usize;
    if count != declared {
        warn!(
            "Chunk at ({}, {}) holds {} tiles, declared {}x{}",
            chunk.x, chunk.y, count, chunk.width, chunk.height
        );
    }
    Ok(())
}
