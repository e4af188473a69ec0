//! Renders one tree node as a retained `<g>` group: glyph, name line,
//! attribute lines, positional transform, and pointer-event dispatch.

use std::fmt;
use std::fmt::Write as _;

use indexmap::IndexMap;
use mangrove_core::geom::{Orientation, Point};
use mangrove_core::model::{ActivationSet, NodePosition, ShapeSpec, TextLayout};
use mangrove_core::style::{StyleBucket, VisualStyleConfig, merge_props};
use tracing::trace;

use crate::svg::{escape_xml_into, fmt_into, write_css_into};
use crate::transition::{Animated, DelayTimer, LifecycleSignal, Phase};
use crate::{Error, Result};

/// Per-node props supplied by the orchestrator on mount and on every update.
#[derive(Debug, Clone)]
pub struct NodeProps {
    pub node: NodePosition,
    pub orientation: Orientation,
    /// Milliseconds; `0` applies transform/opacity changes instantly.
    pub transition_duration: f64,
    /// Depth in the hierarchy; staggers the automated visit delay.
    pub depth: u32,
    /// Custom glyph, used only when `circle_radius` is unset.
    pub shape: ShapeSpec,
    /// Fixed-circle rendering path; mutually exclusive with `shape`.
    pub circle_radius: Option<f64>,
    /// Radius while activated; falls back to `circle_radius` when unset.
    pub active_radius: Option<f64>,
    pub text_layout: TextLayout,
    pub styles: VisualStyleConfig,
    pub activated: ActivationSet,
}

/// Interaction callbacks, invoked with the node's id. All three are required;
/// the orchestrator wires them to its own traversal/selection logic.
pub struct NodeCallbacks {
    pub on_click: Box<dyn FnMut(&str)>,
    pub on_mouse_over: Box<dyn FnMut(&str)>,
    pub on_mouse_out: Box<dyn FnMut(&str)>,
}

impl NodeCallbacks {
    /// Callbacks that ignore every event, for render-only hosts.
    pub fn noop() -> Self {
        Self {
            on_click: Box::new(|_| {}),
            on_mouse_over: Box::new(|_| {}),
            on_mouse_out: Box::new(|_| {}),
        }
    }
}

impl fmt::Debug for NodeCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NodeCallbacks { .. }")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Click,
    MouseOver,
    MouseOut,
}

#[derive(Debug, Clone, Copy)]
struct VisitTimer {
    timer: DelayTimer,
    /// The mount path latches activation only when the delay fires; the
    /// update path latches immediately and the timer just fires the click.
    latch_on_fire: bool,
}

pub struct NodeRenderer {
    props: NodeProps,
    callbacks: NodeCallbacks,
    phase: Phase,
    transform: Animated<Point>,
    opacity: Animated<f64>,
    /// The visit-signal latch: set once the automated click has been armed
    /// for the current activation, cleared when the name leaves the set.
    activated: bool,
    visit: Option<VisitTimer>,
}

impl NodeRenderer {
    /// Validates the props and starts the enter transition: the transform
    /// begins at the parent's projected coordinate (origin for the root) and
    /// animates to the node's own coordinate while opacity fades 0 → 1.
    pub fn mount(props: NodeProps, callbacks: NodeCallbacks) -> Result<Self> {
        validate(&props)?;

        let origin = props.node.transition_origin();
        let start = props.orientation.project_point(origin);
        let target = props.orientation.project(props.node.x, props.node.y);

        let mut transform = Animated::at(start);
        let mut opacity = Animated::at(0.0);
        transform.start(target, props.transition_duration);
        opacity.start(1.0, props.transition_duration);

        let visit = (props.activated.contains(&props.node.name)).then(|| VisitTimer {
            timer: DelayTimer::new(props.transition_duration),
            latch_on_fire: true,
        });

        let phase = if transform.idle() && opacity.idle() {
            Phase::Steady
        } else {
            Phase::Entering
        };

        trace!(id = %props.node.id, "node mounted");
        Ok(Self {
            props,
            callbacks,
            phase,
            transform,
            opacity,
            activated: false,
            visit,
        })
    }

    /// Applies the next props, gated the way the upstream React renderer
    /// gates re-renders: anything other than an activation-set identity
    /// change or a position/orientation change is a no-op. Returns whether
    /// the update was applied.
    pub fn will_update(&mut self, next: NodeProps) -> bool {
        let activation_changed = !next.activated.same_identity(&self.props.activated);
        let moved = next.node.x != self.props.node.x
            || next.node.y != self.props.node.y
            || next.orientation != self.props.orientation;
        if !activation_changed && !moved {
            return false;
        }

        if activation_changed {
            if !self.activated && next.activated.contains(&self.props.node.name) {
                self.activated = true;
                self.visit = Some(VisitTimer {
                    timer: DelayTimer::new(next.transition_duration * f64::from(next.depth)),
                    latch_on_fire: false,
                });
            } else if !next.activated.contains(&self.props.node.name) {
                // Removal reverts without delay.
                self.activated = false;
                self.visit = None;
            }
        }

        let target = next.orientation.project(next.node.x, next.node.y);
        self.transform.start(target, next.transition_duration);
        self.opacity.start(1.0, next.transition_duration);
        if self.phase == Phase::Steady {
            self.phase = Phase::Updating;
        }
        self.props = next;
        true
    }

    /// Starts the exit transition back toward the parent's coordinate with an
    /// opacity fade to 0. With a zero duration the exit completes
    /// synchronously and the signal is returned here instead of from
    /// [`advance`](Self::advance). The orchestrator must keep the instance
    /// until it sees `ExitComplete`.
    pub fn begin_exit(&mut self) -> Option<LifecycleSignal> {
        let origin = self.props.node.transition_origin();
        let target = self.props.orientation.project_point(origin);
        self.transform.start(target, self.props.transition_duration);
        self.opacity.start(0.0, self.props.transition_duration);
        self.visit = None;

        if self.transform.idle() && self.opacity.idle() {
            self.phase = Phase::Destroyed;
            trace!(id = %self.props.node.id, "node exit complete");
            Some(LifecycleSignal::ExitComplete)
        } else {
            self.phase = Phase::Exiting;
            None
        }
    }

    /// Cooperative tick; `dt` in milliseconds. Progresses tweens and the
    /// visit timer; a firing timer invokes the click callback with the node's
    /// own id (the automated "visit" signal used by traversal animations).
    pub fn advance(&mut self, dt: f64) -> Option<LifecycleSignal> {
        if self.phase == Phase::Destroyed {
            return None;
        }

        self.transform.advance(dt);
        self.opacity.advance(dt);

        if let Some(mut visit) = self.visit.take() {
            if visit.timer.advance(dt) {
                if visit.latch_on_fire {
                    self.activated = true;
                }
                let id = self.props.node.id.clone();
                trace!(id = %id, "automated visit");
                (self.callbacks.on_click)(&id);
            } else {
                self.visit = Some(visit);
            }
        }

        if !(self.transform.idle() && self.opacity.idle()) {
            return None;
        }
        match self.phase {
            Phase::Entering => {
                self.phase = Phase::Steady;
                Some(LifecycleSignal::EnterComplete)
            }
            Phase::Updating => {
                self.phase = Phase::Steady;
                Some(LifecycleSignal::UpdateComplete)
            }
            Phase::Exiting => {
                self.phase = Phase::Destroyed;
                trace!(id = %self.props.node.id, "node exit complete");
                Some(LifecycleSignal::ExitComplete)
            }
            _ => None,
        }
    }

    /// Forwards a pointer event to the matching callback, keyed by node id.
    pub fn pointer(&mut self, event: PointerEvent) {
        let id = self.props.node.id.clone();
        match event {
            PointerEvent::Click => (self.callbacks.on_click)(&id),
            PointerEvent::MouseOver => (self.callbacks.on_mouse_over)(&id),
            PointerEvent::MouseOut => (self.callbacks.on_mouse_out)(&id),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn opacity(&self) -> f64 {
        self.opacity.get()
    }

    /// The current screen-space transform value.
    pub fn transform(&self) -> Point {
        self.transform.get()
    }

    pub fn transform_attr(&self) -> String {
        let p = self.transform.get();
        let mut out = String::with_capacity(32);
        out.push_str("translate(");
        fmt_into(&mut out, p.x);
        out.push(',');
        fmt_into(&mut out, p.y);
        out.push(')');
        out
    }

    /// Visual activation: a fresh membership test against the activation set,
    /// so it reverts as soon as the name is removed (compare with the link
    /// renderer's sticky latch).
    pub fn is_activated(&self) -> bool {
        self.props.activated.contains(&self.props.node.name)
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(256);
        self.write_svg_into(&mut out);
        out
    }

    pub fn write_svg_into(&self, out: &mut String) {
        let activated = self.is_activated();
        let bucket = self.props.styles.bucket(self.props.node.is_leaf());
        let layout = &self.props.text_layout;

        out.push_str(r#"<g id=""#);
        escape_xml_into(out, &self.props.node.id);
        out.push_str(r#"" class=""#);
        out.push_str(if activated {
            "activated nodeBase"
        } else {
            "nodeBase"
        });
        out.push_str(r#"" transform="translate("#);
        let p = self.transform.get();
        fmt_into(out, p.x);
        out.push(',');
        fmt_into(out, p.y);
        out.push_str(r#")" style="opacity:"#);
        fmt_into(out, self.opacity.get());
        out.push_str(r#";">"#);

        self.write_glyph_into(out, activated, bucket);
        self.write_name_into(out, activated, bucket, layout);
        if self.props.node.attributes.is_some() {
            self.write_attributes_into(out, bucket, layout);
        }

        out.push_str("</g>");
    }

    // Exactly one of the two glyph paths is taken: a fixed circle when
    // `circle_radius` is configured, the caller-supplied shape otherwise.
    fn write_glyph_into(&self, out: &mut String, activated: bool, bucket: &StyleBucket) {
        if let Some(radius) = self.props.circle_radius {
            let r = if activated {
                self.props.active_radius.unwrap_or(radius)
            } else {
                radius
            };
            out.push_str(r#"<circle r=""#);
            fmt_into(out, r);
            out.push('"');
            write_optional_style(out, &bucket.circle);
            out.push_str("/>");
            return;
        }

        let shape = &self.props.shape;
        let attrs: IndexMap<String, String> = merge_props(&shape.attrs, &bucket.circle);
        out.push('<');
        out.push_str(shape.kind.tag());
        for (key, value) in &attrs {
            out.push(' ');
            escape_xml_into(out, key);
            out.push_str(r#"=""#);
            escape_xml_into(out, value);
            out.push('"');
        }
        out.push_str("/>");
    }

    fn write_name_into(
        &self,
        out: &mut String,
        activated: bool,
        bucket: &StyleBucket,
        layout: &TextLayout,
    ) {
        out.push_str(r#"<text class="nodeNameBase""#);
        write_optional_style(out, &bucket.name);
        out.push_str(r#" text-anchor=""#);
        escape_xml_into(out, &layout.text_anchor);
        out.push_str(r#"" x=""#);
        fmt_into(out, layout.x);
        out.push_str(r#"" y=""#);
        fmt_into(out, layout.y);
        out.push('"');
        if let Some(transform) = &layout.transform {
            out.push_str(r#" transform=""#);
            escape_xml_into(out, transform);
            out.push('"');
        }
        out.push_str(r#" dy=".35em"><tspan font-style=""#);
        out.push_str(if activated { "normal" } else { "italic" });
        out.push_str(r#"">"#);
        escape_xml_into(out, &self.props.node.name);
        out.push_str("</tspan></text>");
    }

    // One `key: value` line per attribute, stacked below the name. Line keys
    // are a per-render counter: unique within this render batch, nothing
    // more.
    fn write_attributes_into(&self, out: &mut String, bucket: &StyleBucket, layout: &TextLayout) {
        out.push_str(r#"<text class="nodeAttributesBase" y=""#);
        fmt_into(out, layout.y + 10.0);
        out.push_str(r#"" text-anchor=""#);
        escape_xml_into(out, &layout.text_anchor);
        out.push('"');
        if let Some(transform) = &layout.transform {
            out.push_str(r#" transform=""#);
            escape_xml_into(out, transform);
            out.push('"');
        }
        write_optional_style(out, &bucket.attributes);
        out.push('>');

        let mut key = 0usize;
        if let Some(attributes) = &self.props.node.attributes {
            for (label, value) in attributes {
                out.push_str(r#"<tspan x=""#);
                fmt_into(out, layout.x);
                out.push_str(r#"" dy="1.2em" data-key=""#);
                let _ = write!(out, "{key}");
                out.push_str(r#"">"#);
                escape_xml_into(out, label);
                out.push_str(": ");
                escape_xml_into(out, value);
                out.push_str("</tspan>");
                key += 1;
            }
        }
        out.push_str("</text>");
    }
}

fn write_optional_style(out: &mut String, props: &mangrove_core::style::StyleProps) {
    if props.is_empty() {
        return;
    }
    out.push_str(r#" style=""#);
    write_css_into(out, props);
    out.push('"');
}

fn validate(props: &NodeProps) -> Result<()> {
    if props.node.id.is_empty() {
        return Err(Error::MissingField { field: "node.id" });
    }
    if props.node.name.is_empty() {
        return Err(Error::MissingField { field: "node.name" });
    }
    if props.text_layout.text_anchor.is_empty() {
        return Err(Error::MissingField {
            field: "textLayout.textAnchor",
        });
    }
    for (field, value) in [
        ("node.x", props.node.x),
        ("node.y", props.node.y),
        ("textLayout.x", props.text_layout.x),
        ("textLayout.y", props.text_layout.y),
    ] {
        if !value.is_finite() {
            return Err(Error::NonFiniteCoordinate { field });
        }
    }
    if let Some(parent) = props.node.parent {
        if !parent.x.is_finite() || !parent.y.is_finite() {
            return Err(Error::NonFiniteCoordinate {
                field: "node.parent",
            });
        }
    }
    if props.transition_duration < 0.0 {
        return Err(Error::NegativeDuration {
            value: props.transition_duration,
        });
    }
    Ok(())
}
