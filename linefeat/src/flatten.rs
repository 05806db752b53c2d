//! Feature discovery in imported documents.

use crate::LineError;
use geojson::{Feature, Geometry};
use serde_json::{Map, Value};

/// Default nesting limit for [`Flatten`].
pub const MAX_DEPTH: usize = 64;

/// Shape of a single node in an imported document.
enum Node<'a> {
    /// `{"type": "Feature", ...}`
    Feature(&'a Map<String, Value>),

    /// `{"layers": [...]}`
    Layers(&'a [Value]),

    /// `{"map": {"layers": [...]}}`
    Map(&'a [Value]),

    /// `{"features": [...]}`
    Collection(&'a [Value]),

    Array(&'a [Value]),

    Other,
}

impl<'a> Node<'a> {
    fn classify(value: &'a Value) -> Self {
        let object = match value {
            Value::Array(items) => return Node::Array(items),
            Value::Object(object) => object,
            _ => return Node::Other,
        };
        if object.get("type").and_then(Value::as_str) == Some("Feature") {
            return Node::Feature(object);
        }
        if let Some(layers) = object.get("layers").and_then(Value::as_array) {
            return Node::Layers(layers);
        }
        if let Some(layers) = object
            .get("map")
            .and_then(|map| map.get("layers"))
            .and_then(Value::as_array)
        {
            return Node::Map(layers);
        }
        if let Some(features) = object.get("features").and_then(Value::as_array) {
            return Node::Collection(features);
        }
        Node::Other
    }
}

/// Recursively gathers every feature object of a document, in
/// discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flatten {
    max_depth: usize,
}

impl Default for Flatten {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }
}

impl Flatten {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn features(&self, document: &Value) -> Result<Vec<Feature>, LineError> {
        let mut features = Vec::new();
        self.visit(document, 0, &mut features)?;
        Ok(features)
    }

    fn visit(&self, value: &Value, depth: usize, out: &mut Vec<Feature>) -> Result<(), LineError> {
        if depth > self.max_depth {
            return Err(LineError::TooDeep(self.max_depth));
        }
        match Node::classify(value) {
            Node::Feature(object) => out.push(lenient_feature(object)),
            Node::Layers(children)
            | Node::Map(children)
            | Node::Collection(children)
            | Node::Array(children) => {
                for child in children {
                    self.visit(child, depth + 1, out)?;
                }
            }
            Node::Other => (),
        }
        Ok(())
    }
}

/// Shorthand for `Flatten::default().features(document)`.
pub fn flatten_features(document: &Value) -> Result<Vec<Feature>, LineError> {
    Flatten::default().features(document)
}

/// Map documents may hold features whose geometry is not valid GeoJSON
/// (annotation circles, text). They are still features, so keep them
/// with no geometry instead of dropping them.
fn lenient_feature(object: &Map<String, Value>) -> Feature {
    let geometry = object
        .get("geometry")
        .and_then(|g| serde_json::from_value::<Geometry>(g.clone()).ok());
    let properties = object
        .get("properties")
        .and_then(Value::as_object)
        .cloned();
    Feature {
        bbox: None,
        geometry,
        id: None,
        properties,
        foreign_members: None,
    }
}
