//! Map Loader.
//!
//! Pulls the map properties and the tile layer's chunks out of a `.tmx`
//! document. Only what the binary exporter consumes is understood: one tile
//! layer whose `<data>` block is CSV, either split into `<chunk>`s (infinite
//! maps) or written inline (finite maps).

use std::path::Path;
use std::str::FromStr;

use roxmltree::{Document, Node};
use tracing::{debug, info};

use crate::error::{Result, VerifyError};
use crate::model::{Chunk, MapProperties, TileLayer, TiledMap};

/// Layer picked before falling back to the first tile layer in the file.
pub const PREFERRED_LAYER: &str = "map";

pub fn load(path: &Path) -> Result<TiledMap> {
    let xml = std::fs::read_to_string(path).map_err(|e| VerifyError::io(path, e))?;
    info!("Parsing {} ({} bytes)", path.display(), xml.len());
    parse(&xml)
}

pub fn parse(xml: &str) -> Result<TiledMap> {
    let doc = Document::parse(xml)?;

    let properties: MapProperties = doc
        .descendants()
        .filter(|n| n.has_tag_name("property"))
        .filter_map(property)
        .collect();

    let layer = find_layer(&doc)
        .ok_or_else(|| VerifyError::Structural("no tile layer found".into()))?;
    let name = layer.attribute("name").unwrap_or_default().to_string();

    let data = layer
        .children()
        .find(|n| n.has_tag_name("data"))
        .ok_or_else(|| VerifyError::Structural(format!("layer `{name}` has no <data> block")))?;

    match data.attribute("encoding") {
        Some("csv") => {}
        Some(other) => {
            return Err(VerifyError::Structural(format!(
                "unsupported encoding `{other}` in layer `{name}`, expected csv"
            )));
        }
        None => {
            return Err(VerifyError::Structural(format!(
                "layer `{name}` stores tiles as XML elements, expected csv encoding"
            )));
        }
    }

    let mut chunks = data
        .children()
        .filter(|n| n.has_tag_name("chunk"))
        .map(parse_chunk)
        .collect::<Result<Vec<_>>>()?;

    // Finite maps write the CSV straight into <data>.
    if chunks.is_empty() {
        let text = data.text().unwrap_or_default();
        if !text.trim().is_empty() {
            chunks.push(Chunk {
                x: 0,
                y: 0,
                width: positive_attr(layer, "width")?,
                height: positive_attr(layer, "height")?,
                data: text.to_string(),
            });
        }
    }

    debug!(
        "Layer `{}`: {} chunks, {} properties",
        name,
        chunks.len(),
        properties.len()
    );

    Ok(TiledMap {
        properties,
        layer: TileLayer { name, chunks },
    })
}

fn find_layer<'a, 'input>(doc: &'a Document<'input>) -> Option<Node<'a, 'input>> {
    doc.descendants()
        .find(|n| n.has_tag_name("layer") && n.attribute("name") == Some(PREFERRED_LAYER))
        .or_else(|| doc.descendants().find(|n| n.has_tag_name("layer")))
}

/// Multi-line string properties keep their value in the element text.
fn property(node: Node<'_, '_>) -> Option<(String, String)> {
    let name = node.attribute("name")?;
    let value = node.attribute("value").or_else(|| node.text())?;
    Some((name.to_string(), value.to_string()))
}

fn parse_chunk(node: Node<'_, '_>) -> Result<Chunk> {
    Ok(Chunk {
        x: attr(node, "x")?,
        y: attr(node, "y")?,
        width: positive_attr(node, "width")?,
        height: positive_attr(node, "height")?,
        data: node.text().unwrap_or_default().to_string(),
    })
}

fn attr<T: FromStr>(node: Node<'_, '_>, name: &str) -> Result<T> {
    let tag = node.tag_name().name();
    let raw = node
        .attribute(name)
        .ok_or_else(|| VerifyError::Structural(format!("<{tag}> missing `{name}` attribute")))?;
    raw.trim().parse().map_err(|_| {
        VerifyError::Structural(format!("<{tag}> attribute {name}=\"{raw}\" is not an integer"))
    })
}

fn positive_attr(node: Node<'_, '_>, name: &str) -> Result<u32> {
    let value: u32 = attr(node, name)?;
    if value == 0 {
        return Err(VerifyError::Structural(format!(
            "<{}> attribute `{name}` must be greater than zero",
            node.tag_name().name()
        )));
    }
    Ok(value)
}
