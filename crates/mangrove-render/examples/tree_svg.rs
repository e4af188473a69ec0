//! Renders a three-node tree to stdout as a standalone SVG document,
//! driving the enter transitions to completion the way an orchestrator would.
//!
//! Run with: `cargo run -p mangrove-render --example tree_svg`

use mangrove_core::geom::{Orientation, point};
use mangrove_core::model::{
    ActivationSet, LinkGeometry, LinkSource, LinkTarget, NodePosition, ShapeSpec, TextLayout,
};
use mangrove_core::style::VisualStyleConfig;
use mangrove_render::{
    LinkProps, LinkRenderer, NodeCallbacks, NodeProps, NodeRenderer, PathStyle, Phase,
};

const DURATION: f64 = 250.0;

fn node(id: &str, name: &str, x: f64, y: f64, parent: Option<(f64, f64)>) -> NodeProps {
    NodeProps {
        node: NodePosition {
            id: id.to_string(),
            x,
            y,
            parent: parent.map(|(px, py)| point(px, py)),
            children: (id == "r").then(|| vec!["A".to_string(), "B".to_string()]),
            name: name.to_string(),
            attributes: None,
        },
        orientation: Orientation::Vertical,
        transition_duration: DURATION,
        depth: u32::from(parent.is_some()),
        shape: ShapeSpec::circle(6.0),
        circle_radius: Some(6.0),
        active_radius: Some(10.0),
        text_layout: TextLayout {
            text_anchor: "middle".to_string(),
            x: 0.0,
            y: 18.0,
            transform: None,
        },
        styles: VisualStyleConfig::default(),
        activated: ActivationSet::new(["B"]),
    }
}

fn link(tx: f64, ty: f64, target: &str) -> LinkProps {
    LinkProps::new(
        LinkGeometry {
            source: LinkSource {
                x: 100.0,
                y: 20.0,
                children: vec!["A".to_string(), "B".to_string()],
            },
            target: LinkTarget {
                x: tx,
                y: ty,
                name: target.to_string(),
            },
        },
        Orientation::Vertical,
        DURATION,
        PathStyle::Diagonal,
    )
}

fn main() {
    let callbacks = || NodeCallbacks {
        on_click: Box::new(|id| eprintln!("clicked: {id}")),
        on_mouse_over: Box::new(|_| {}),
        on_mouse_out: Box::new(|_| {}),
    };

    let mut nodes = vec![
        NodeRenderer::mount(node("r", "root", 100.0, 20.0, None), callbacks()).unwrap(),
        NodeRenderer::mount(node("a", "A", 40.0, 100.0, Some((100.0, 20.0))), callbacks()).unwrap(),
        NodeRenderer::mount(node("b", "B", 160.0, 100.0, Some((100.0, 20.0))), callbacks()).unwrap(),
    ];
    let mut links = vec![
        LinkRenderer::mount(link(40.0, 100.0, "A")).unwrap(),
        LinkRenderer::mount(link(160.0, 100.0, "B")).unwrap(),
    ];

    // Tick at ~60fps until every instance has settled.
    while nodes.iter().any(|n| n.phase() != Phase::Steady)
        || links.iter().any(|l| l.phase() != Phase::Steady)
    {
        for n in &mut nodes {
            n.advance(16.0);
        }
        for l in &mut links {
            l.advance(16.0);
        }
    }

    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 140">"#);
    out.push('\n');
    out.push_str(
        r#"<style>
.linkBase { fill: none; stroke: #94a3b8; stroke-width: 1.5; }
.activeLink { stroke: #f59e0b; }
.nodeBase circle { fill: #e2e8f0; stroke: #475569; }
.activated circle { fill: #fde68a; }
.nodeNameBase { font-family: sans-serif; font-size: 11px; }
</style>
"#,
    );
    for l in &mut links {
        l.write_svg_into(&mut out);
        out.push('\n');
    }
    for n in &nodes {
        n.write_svg_into(&mut out);
        out.push('\n');
    }
    out.push_str("</svg>");

    println!("{out}");
}
