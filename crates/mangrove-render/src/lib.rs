#![forbid(unsafe_code)]

//! Retained-mode SVG renderers for interactive tree diagrams.
//!
//! One [`NodeRenderer`] per tree node and one [`LinkRenderer`] per edge, both
//! owned and driven by an external layout/orchestration collaborator:
//!
//! - the orchestrator computes layout coordinates and hands each instance its
//!   props on `mount` / `will_update`;
//! - each instance owns only its own transient animation state (enter/update/
//!   exit tweens, the automated visit timer) and is ticked with `advance`;
//! - `begin_exit` starts the removal animation, and the instance may only be
//!   discarded after it reports [`LifecycleSignal::ExitComplete`];
//! - `render` emits the current SVG fragment (a `<g>` group per node, a
//!   single `<path>` per link) with `nodeBase`/`linkBase` class markers for
//!   external styling.
//!
//! Everything is single-threaded and synchronous; there is no executor and no
//! I/O.

pub mod link;
pub mod node;
pub mod path;
pub mod svg;
pub mod transition;

pub use link::{JitterMode, LinkProps, LinkRenderer, LinkRendererOptions};
pub use node::{NodeCallbacks, NodeProps, NodeRenderer, PointerEvent};
pub use path::PathStyle;
pub use transition::{LifecycleSignal, Phase};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("non-finite coordinate: {field}")]
    NonFiniteCoordinate { field: &'static str },

    #[error("negative transition duration: {value}")]
    NegativeDuration { value: f64 },

    #[error(transparent)]
    Core(#[from] mangrove_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
