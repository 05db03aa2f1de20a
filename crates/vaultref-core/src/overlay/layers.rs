//! Layered configuration collaborator

use indexmap::IndexMap;

/// One named configuration layer
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    name: String,
    values: IndexMap<String, String>,
}

impl ConfigLayer {
    /// Create a layer from an ordered mapping
    pub fn new(name: impl Into<String>, values: IndexMap<String, String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// The layer name (for diagnostics)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The layer's values, in insertion order
    pub fn values(&self) -> &IndexMap<String, String> {
        &self.values
    }
}

/// Ordered stack of configuration layers
///
/// Later-pushed layers win on key conflicts. Pushing never mutates
/// earlier layers; a layer is immutable once pushed.
#[derive(Debug, Clone, Default)]
pub struct LayeredConfig {
    layers: Vec<ConfigLayer>,
}

impl LayeredConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer as the new highest priority
    pub fn push_layer(&mut self, layer: ConfigLayer) {
        self.layers.push(layer);
    }

    /// Look up a key, highest-priority layer first
    pub fn get(&self, key: &str) -> Option<&str> {
        self.layers
            .iter()
            .rev()
            .find_map(|layer| layer.values.get(key).map(String::as_str))
    }

    /// Number of layers
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Effective view with all layers merged, later layers winning
    ///
    /// Key order follows first appearance across layers, so a value
    /// overridden by a later layer keeps its original position.
    pub fn flatten(&self) -> IndexMap<String, String> {
        let mut merged = IndexMap::new();
        for layer in &self.layers {
            for (key, value) in &layer.values {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }
}
