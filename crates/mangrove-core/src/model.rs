use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::geom::{Point, point};

/// Per-node output of the external layout engine, produced once per render
/// cycle. The renderer only ever reads it.
///
/// `parent` carries the parent's layout coordinates (the enter/exit transition
/// origin); `None` marks the root. `children` lists child display names in
/// layout order; `None` marks a leaf. A present-but-empty list still counts as
/// an internal node for styling purposes.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub parent: Option<Point>,
    pub children: Option<Vec<String>>,
    pub name: String,
    pub attributes: Option<IndexMap<String, String>>,
}

impl NodePosition {
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The layout-space point enter/exit transitions grow from and collapse
    /// back to: the parent's coordinate, or the origin for the root.
    pub fn transition_origin(&self) -> Point {
        self.parent.unwrap_or_else(|| point(0.0, 0.0))
    }
}

/// Directed edge descriptor. `children` on the source side exists only so the
/// circuit path style can recover the target's sibling index.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkGeometry {
    pub source: LinkSource,
    pub target: LinkTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkSource {
    pub x: f64,
    pub y: f64,
    pub children: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkTarget {
    pub x: f64,
    pub y: f64,
    pub name: String,
}

/// Externally-owned ordered set of activated (highlighted) display names.
///
/// The traversal logic that drives activation replaces the whole set on every
/// change, and the renderers react to *identity* changes, not content diffs.
/// The upstream React renderer leaned on JS array reference identity for
/// this; here the set is `Arc`-backed and [`ActivationSet::same_identity`] is
/// pointer equality. Membership checks are hash lookups over the preserved
/// order.
#[derive(Debug, Clone)]
pub struct ActivationSet {
    inner: Arc<ActivationSetInner>,
}

#[derive(Debug)]
struct ActivationSetInner {
    names: Vec<String>,
    index: FxHashSet<String>,
}

impl ActivationSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let index = names.iter().cloned().collect();
        Self {
            inner: Arc::new(ActivationSetInner { names, index }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.index.contains(name)
    }

    pub fn names(&self) -> &[String] {
        &self.inner.names
    }

    pub fn is_empty(&self) -> bool {
        self.inner.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.names.len()
    }

    /// True when both handles refer to the same externally-owned set. Two
    /// sets with equal contents but separate allocations are distinct, which
    /// is exactly how the orchestrator signals "activation changed".
    pub fn same_identity(&self, other: &ActivationSet) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for ActivationSet {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

/// Where the node label sits relative to the node's transform, as computed by
/// the orchestrator from orientation and node depth.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayout {
    pub text_anchor: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub transform: Option<String>,
}

/// Caller-supplied glyph for nodes without a fixed circle radius.
///
/// Resolved once per render as a tagged variant rather than a shape class
/// hierarchy: the kind picks the SVG element, `attrs` are emitted verbatim
/// (with the style bucket's circle properties layered on top).
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSpec {
    pub kind: ShapeKind,
    pub attrs: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Rect,
    Polygon,
    /// Any other SVG element tag.
    Custom(String),
}

impl ShapeKind {
    pub fn tag(&self) -> &str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Rect => "rect",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Custom(tag) => tag.as_str(),
        }
    }
}

impl ShapeSpec {
    pub fn circle(radius: f64) -> Self {
        let mut attrs = IndexMap::new();
        attrs.insert("r".to_string(), format!("{radius}"));
        Self {
            kind: ShapeKind::Circle,
            attrs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_identity_is_per_allocation() {
        let a = ActivationSet::new(["A", "B"]);
        let b = ActivationSet::new(["A", "B"]);
        let a2 = a.clone();

        assert!(a.same_identity(&a2));
        assert!(!a.same_identity(&b));
        assert!(a.contains("B"));
        assert!(!a.contains("C"));
        assert_eq!(a.names(), ["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn empty_child_list_is_not_a_leaf() {
        let node = NodePosition {
            id: "n1".into(),
            x: 1.0,
            y: 2.0,
            parent: None,
            children: Some(Vec::new()),
            name: "N".into(),
            attributes: None,
        };
        assert!(!node.is_leaf());
        assert_eq!(node.transition_origin(), point(0.0, 0.0));
    }
}
