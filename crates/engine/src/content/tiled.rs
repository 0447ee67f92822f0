//! Subset of the Tiled JSON map format that room loading reads.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct TiledMap {
    pub layers: Vec<TiledLayer>,
    #[serde(default)]
    pub properties: Vec<TiledProperty>,
}

impl TiledMap {
    pub fn tile_layer(&self, name: &str) -> Option<&TiledTileLayer> {
        self.layers.iter().find_map(|layer| match layer {
            TiledLayer::Tiles(tiles) if tiles.name == name => Some(tiles),
            _ => None,
        })
    }

    pub fn object_layer(&self, name: &str) -> Option<&TiledObjectLayer> {
        self.layers.iter().find_map(|layer| match layer {
            TiledLayer::Objects(objects) if objects.name == name => Some(objects),
            _ => None,
        })
    }

    pub fn property(&self, name: &str) -> Option<&TiledProperty> {
        find_property(&self.properties, name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum TiledLayer {
    #[serde(rename = "tilelayer")]
    Tiles(TiledTileLayer),
    #[serde(rename = "objectgroup")]
    Objects(TiledObjectLayer),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledTileLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledObjectLayer {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<TiledObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledObject {
    #[serde(default)]
    pub id: u32,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub properties: Vec<TiledProperty>,
}

impl TiledObject {
    pub fn property(&self, name: &str) -> Option<&TiledProperty> {
        find_property(&self.properties, name)
    }
}

/// `{name, type, value}`. The declared type is kept for diagnostics; lookups
/// go by the JSON shape of `value`.
#[derive(Debug, Clone, Deserialize)]
pub struct TiledProperty {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub value: Value,
}

impl TiledProperty {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    pub fn as_f32(&self) -> Option<f32> {
        self.value.as_f64().map(|value| value as f32)
    }
}

pub fn find_property<'a>(properties: &'a [TiledProperty], name: &str) -> Option<&'a TiledProperty> {
    properties.iter().find(|property| property.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn layers_dispatch_on_type_and_ignore_unknown_kinds() {
        let map: TiledMap = serde_json::from_value(json!({
            "layers": [
                { "type": "imagelayer", "name": "backdrop", "image": "bg.png" },
                { "type": "tilelayer", "name": "pathing", "width": 2, "height": 1, "data": [1, 0] },
                { "type": "objectgroup", "name": "walls", "objects": [
                    { "id": 3, "x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0 }
                ]}
            ],
            "properties": [{ "name": "name", "type": "string", "value": "Hall" }]
        }))
        .expect("map");

        assert!(matches!(map.layers[0], TiledLayer::Other));
        assert_eq!(map.tile_layer("pathing").expect("pathing").data, vec![1, 0]);
        assert!(map.tile_layer("walls").is_none());
        let walls = map.object_layer("walls").expect("walls");
        assert_eq!(walls.objects[0].id, 3);
        assert!(walls.objects[0].properties.is_empty());
        assert_eq!(map.property("name").and_then(TiledProperty::as_str), Some("Hall"));
    }

    #[test]
    fn property_values_convert_by_shape() {
        let property: TiledProperty =
            serde_json::from_value(json!({ "name": "x", "type": "int", "value": 120 }))
                .expect("property");
        assert_eq!(property.kind, "int");
        assert_eq!(property.as_f32(), Some(120.0));
        assert_eq!(property.as_str(), None);
    }
}
