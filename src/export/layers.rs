//! Layer tree flattening.

use crate::model::{Layer, LayerKind};

/// Leaf layers in document order; each group is replaced by its own leaves.
pub fn flatten_layers(layers: &[Layer]) -> Vec<&Layer> {
    let mut leaves = Vec::new();
    collect_leaves(layers, &mut leaves);
    leaves
}

fn collect_leaves<'a>(layers: &'a [Layer], leaves: &mut Vec<&'a Layer>) {
    for layer in layers {
        match &layer.kind {
            LayerKind::Group(children) => collect_leaves(children, leaves),
            _ => leaves.push(layer),
        }
    }
}
