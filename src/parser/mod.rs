//! Input side: the `.tmx` map and the exported screen files.
pub mod bins;
pub mod tmx;

pub use bins::discover;
pub use tmx::{load as load_map, parse as parse_map};
