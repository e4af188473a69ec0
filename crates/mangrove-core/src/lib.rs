#![forbid(unsafe_code)]

//! Shared data model for mangrove tree renderers.
//!
//! Design goals:
//! - plain-data contracts between the layout orchestrator and the per-node /
//!   per-edge renderers in `mangrove-render`
//! - deterministic, testable geometry (a single orientation projection rule)
//! - config types that deserialize from the host application's JSON config

pub mod error;
pub mod geom;
pub mod model;
pub mod style;

pub use error::{Error, Result};
pub use geom::{Orientation, Point, Vector, point, vector};
pub use model::{
    ActivationSet, LinkGeometry, LinkSource, LinkTarget, NodePosition, ShapeKind, ShapeSpec,
    TextLayout,
};
pub use style::{StyleBucket, StyleProps, VisualStyleConfig};
