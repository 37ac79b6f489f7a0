// SVG serialization of a Scene.
//
// Layout of the document:
//   <svg viewBox>                  outer surface, zoom applies to the group
//     <g class="zoom">             pan/zoom transform target
//       <g class="links">          one <path> per parent/child pair
//       <g class="nodes">          one <g> per node, translated to its center
//         <a href>                 optional task link around box + label
//           <rect/> <text><tspan/>...</text>
//         <g class="create-child"> "+" affordance at the right edge

use std::fmt::Write;

use super::{NodeShape, Scene, ZoomTransform, AFFORDANCE_RADIUS};
use crate::layout::NodeIx;

const LINK_STROKE: &str = "#FFFFFF";
const LINK_STROKE_WIDTH: f64 = 2.0;
const LINK_STROKE_OPACITY: f64 = 0.4;
const AFFORDANCE_FILL: &str = "#555555";
const LABEL_FILL: &str = "white";
const LABEL_INSET: f64 = 5.0;

impl Scene {
    /// Serialize with the identity zoom.
    pub fn to_svg(&self) -> String {
        self.to_svg_with(&ZoomTransform::IDENTITY)
    }

    /// Nodes drawn in scene order.
    pub fn to_svg_with(&self, zoom: &ZoomTransform) -> String {
        self.write_svg(zoom, self.nodes.iter())
    }

    /// Nodes drawn back to front in `order`, so the last one ends up on top.
    /// Indices outside the scene are skipped.
    pub fn to_svg_ordered(&self, zoom: &ZoomTransform, order: &[NodeIx]) -> String {
        self.write_svg(zoom, order.iter().filter_map(|ix| self.nodes.get(ix.0)))
    }

    fn write_svg<'a>(&'a self, zoom: &ZoomTransform, nodes: impl Iterator<Item = &'a NodeShape>) -> String {
        let vb = self.view_box;
        let mut svg = String::with_capacity(256 + self.nodes.len() * 512);

        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="{} {} {} {}" width="{}" height="{}" font-family="sans-serif" font-size="{}">"#,
            vb.x, vb.y, vb.w, vb.h, vb.w, vb.h, self.font_size
        );
        let _ = write!(svg, r#"<g class="zoom" transform="{}">"#, zoom.to_svg());

        let _ = write!(
            svg,
            r#"<g class="links" fill="none" stroke="{LINK_STROKE}" stroke-opacity="{LINK_STROKE_OPACITY}" stroke-width="{LINK_STROKE_WIDTH}">"#
        );
        for link in &self.links {
            let _ = write!(
                svg,
                r#"<path data-source="{}" data-target="{}" d="{}"/>"#,
                escape(&link.source.to_string()),
                escape(&link.target.to_string()),
                link.path
            );
        }
        svg.push_str("</g>");

        svg.push_str(r#"<g class="nodes">"#);
        for node in nodes {
            let (w, h) = (node.bounds.w, node.bounds.h);
            let _ = write!(
                svg,
                r#"<g class="node" data-id="{}" transform="translate({},{})">"#,
                escape(&node.id.to_string()),
                node.center.x,
                node.center.y
            );
            if let Some(href) = &node.href {
                let _ = write!(svg, r#"<a xlink:href="{}">"#, escape(href));
            }
            let _ = write!(
                svg,
                r#"<rect fill="{}" rx="5" x="{}" y="{}" width="{w}" height="{h}"/>"#,
                escape(&node.fill),
                -w / 2.0,
                -h / 2.0
            );
            if !node.label.is_empty() {
                let _ = write!(svg, r#"<text paint-order="stroke" fill="{LABEL_FILL}">"#);
                for (i, line) in node.label.iter().enumerate() {
                    let x = -w / 2.0 + LABEL_INSET;
                    if i == 0 {
                        let _ = write!(svg, r#"<tspan x="{x}" dy="{}">{}</tspan>"#, -h / 6.0, escape(line));
                    } else {
                        let _ = write!(svg, r#"<tspan x="{x}" dy="1em">{}</tspan>"#, escape(line));
                    }
                }
                svg.push_str("</text>");
            }
            if node.href.is_some() {
                svg.push_str("</a>");
            }

            let _ = write!(svg, r#"<g class="create-child" transform="translate({},0)">"#, w / 2.0);
            if let Some(href) = &node.create_child_href {
                let _ = write!(svg, r#"<a xlink:href="{}">"#, escape(href));
            }
            let _ = write!(
                svg,
                r#"<circle fill="{AFFORDANCE_FILL}" r="{AFFORDANCE_RADIUS}"/><text dominant-baseline="middle" text-anchor="middle" fill="white">+</text>"#
            );
            if node.create_child_href.is_some() {
                svg.push_str("</a>");
            }
            svg.push_str("</g></g>");
        }
        svg.push_str("</g></g></svg>");
        svg
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
