use indexmap::IndexMap;
use serde::Deserialize;

/// CSS declarations for one sub-element, insertion order preserved.
pub type StyleProps = IndexMap<String, String>;

/// Style overrides for one node class (`node` or `leafNode`): the circle (or
/// custom glyph), the name line, and the attribute lines.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleBucket {
    pub circle: StyleProps,
    pub name: StyleProps,
    pub attributes: StyleProps,
}

/// Caller-supplied visual overrides, applied on top of computed defaults.
///
/// Nodes with children draw from `node`, nodes without from `leaf_node`; the
/// selection affects only these sub-styles, never geometry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisualStyleConfig {
    pub node: StyleBucket,
    pub leaf_node: StyleBucket,
}

impl VisualStyleConfig {
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn bucket(&self, leaf: bool) -> &StyleBucket {
        if leaf { &self.leaf_node } else { &self.node }
    }

    /// Deep-merges `overrides` onto `self`: override declarations replace
    /// same-named base declarations, new ones append in their own order.
    pub fn merged_with(&self, overrides: &VisualStyleConfig) -> VisualStyleConfig {
        VisualStyleConfig {
            node: merge_bucket(&self.node, &overrides.node),
            leaf_node: merge_bucket(&self.leaf_node, &overrides.leaf_node),
        }
    }
}

fn merge_bucket(base: &StyleBucket, overrides: &StyleBucket) -> StyleBucket {
    StyleBucket {
        circle: merge_props(&base.circle, &overrides.circle),
        name: merge_props(&base.name, &overrides.name),
        attributes: merge_props(&base.attributes, &overrides.attributes),
    }
}

pub fn merge_props(base: &StyleProps, overrides: &StyleProps) -> StyleProps {
    let mut out = base.clone();
    for (key, value) in overrides {
        out.insert(key.clone(), value.clone());
    }
    out
}
