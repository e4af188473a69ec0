//! Renders one tree edge as a retained `<path>` element.

use mangrove_core::geom::Orientation;
use mangrove_core::model::{ActivationSet, LinkGeometry};
use mangrove_core::style::StyleProps;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::path::{self, PathStyle};
use crate::svg::{escape_xml_into, fmt_into, write_css_into};
use crate::transition::{Animated, LifecycleSignal, Phase};
use crate::{Error, Result};

/// Per-edge props supplied by the orchestrator on mount and on every update.
#[derive(Debug, Clone)]
pub struct LinkProps {
    pub edge: LinkGeometry,
    pub orientation: Orientation,
    /// Milliseconds; `0` applies opacity changes instantly.
    pub transition_duration: f64,
    pub path_style: PathStyle,
    /// Extra CSS declarations merged after the animated opacity.
    pub styles: StyleProps,
    pub activated: ActivationSet,
}

impl LinkProps {
    pub fn new(
        edge: LinkGeometry,
        orientation: Orientation,
        transition_duration: f64,
        path_style: PathStyle,
    ) -> Self {
        Self {
            edge,
            orientation,
            transition_duration,
            path_style,
            styles: StyleProps::new(),
            activated: ActivationSet::default(),
        }
    }
}

/// When the circuit style re-draws its jitter value.
///
/// `PerRender` matches the upstream React renderer (every render re-staggers
/// the bend); `PerEdge` draws once at mount so the bend is stable for the
/// edge's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JitterMode {
    #[default]
    PerRender,
    PerEdge,
}

#[derive(Debug, Clone, Default)]
pub struct LinkRendererOptions {
    pub jitter: JitterMode,
    /// Seed for the injected jitter source; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

pub struct LinkRenderer {
    props: LinkProps,
    phase: Phase,
    opacity: Animated<f64>,
    activated: bool,
    jitter_mode: JitterMode,
    rng: SmallRng,
    edge_jitter: f64,
}

impl LinkRenderer {
    pub fn mount(props: LinkProps) -> Result<Self> {
        Self::mount_with(props, LinkRendererOptions::default())
    }

    pub fn mount_with(props: LinkProps, options: LinkRendererOptions) -> Result<Self> {
        validate(&props)?;

        let mut rng = match options.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let edge_jitter = rng.gen_range(0.0..1.0);

        let mut opacity = Animated::at(0.0);
        opacity.start(1.0, props.transition_duration);
        let phase = if opacity.idle() {
            Phase::Steady
        } else {
            Phase::Entering
        };

        trace!(to = %props.edge.target.name, "link mounted");
        Ok(Self {
            props,
            phase,
            opacity,
            activated: false,
            jitter_mode: options.jitter,
            rng,
            edge_jitter,
        })
    }

    /// Applies the next props. Activation latches permanently the first time
    /// the (identity-changed) set contains the target's name; there is no
    /// path back to non-activated.
    pub fn will_update(&mut self, next: LinkProps) {
        if !next.activated.same_identity(&self.props.activated)
            && next.activated.contains(&self.props.edge.target.name)
            && !self.activated
        {
            self.activated = true;
            trace!(to = %self.props.edge.target.name, "link activated");
        }
        self.props = next;
    }

    /// Starts the exit fade. With a zero duration the exit completes
    /// synchronously and the signal is returned here instead of from
    /// [`advance`](Self::advance).
    pub fn begin_exit(&mut self) -> Option<LifecycleSignal> {
        self.opacity.start(0.0, self.props.transition_duration);
        if self.opacity.idle() {
            self.phase = Phase::Destroyed;
            Some(LifecycleSignal::ExitComplete)
        } else {
            self.phase = Phase::Exiting;
            None
        }
    }

    /// Cooperative tick; `dt` in milliseconds.
    pub fn advance(&mut self, dt: f64) -> Option<LifecycleSignal> {
        if self.phase == Phase::Destroyed {
            return None;
        }
        self.opacity.advance(dt);
        match self.phase {
            Phase::Entering if self.opacity.idle() => {
                self.phase = Phase::Steady;
                Some(LifecycleSignal::EnterComplete)
            }
            Phase::Exiting if self.opacity.idle() => {
                self.phase = Phase::Destroyed;
                trace!(to = %self.props.edge.target.name, "link exit complete");
                Some(LifecycleSignal::ExitComplete)
            }
            _ => None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn opacity(&self) -> f64 {
        self.opacity.get()
    }

    /// Sticky activation state (compare with the node renderer, whose
    /// activation follows set membership and can revert).
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Computes the current path string. Takes `&mut self` because the
    /// per-render jitter mode draws from the injected RNG.
    pub fn path_d(&mut self) -> String {
        let jitter = match self.jitter_mode {
            JitterMode::PerEdge => self.edge_jitter,
            JitterMode::PerRender => self.rng.gen_range(0.0..1.0),
        };
        path::path_for(
            &self.props.path_style,
            &self.props.edge,
            self.props.orientation,
            jitter,
        )
    }

    pub fn render(&mut self) -> String {
        let mut out = String::with_capacity(128);
        self.write_svg_into(&mut out);
        out
    }

    pub fn write_svg_into(&mut self, out: &mut String) {
        let class = if self.activated {
            "activeLink linkBase"
        } else {
            "linkBase"
        };
        let d = self.path_d();

        out.push_str(r#"<path class=""#);
        out.push_str(class);
        out.push_str(r#"" d=""#);
        escape_xml_into(out, &d);
        out.push_str(r#"" style="opacity:"#);
        fmt_into(out, self.opacity.get());
        out.push(';');
        write_css_into(out, &self.props.styles);
        out.push_str(r#""/>"#);
    }
}

fn validate(props: &LinkProps) -> Result<()> {
    for (field, value) in [
        ("edge.source.x", props.edge.source.x),
        ("edge.source.y", props.edge.source.y),
        ("edge.target.x", props.edge.target.x),
        ("edge.target.y", props.edge.target.y),
    ] {
        if !value.is_finite() {
            return Err(Error::NonFiniteCoordinate { field });
        }
    }
    if props.edge.target.name.is_empty() {
        return Err(Error::MissingField {
            field: "edge.target.name",
        });
    }
    if props.transition_duration < 0.0 {
        return Err(Error::NegativeDuration {
            value: props.transition_duration,
        });
    }
    Ok(())
}
