//! Built-in vector draw handlers.

use super::defs::url;
use super::elements::{ObjectElements, SvgContext, SvgDrawHandler, SvgLayer, SvgObject};
use super::tree::{NodeId, SvgTree};
use crate::shapes::{MarkerShape, arrow_head, arrow_shaft, label_font_size, line_path, markup_color};
use goban_core::config::{BoardConfig, Rgba};
use goban_core::objects::{Color, ObjectKind};
use goban_core::registry::HandlerRegistry;
use kurbo::{Point, Vec2};
use std::rc::Rc;

/// Registry with a handler for every built-in object kind.
pub fn default_svg_handlers() -> HandlerRegistry<dyn SvgDrawHandler> {
    let mut registry: HandlerRegistry<dyn SvgDrawHandler> = HandlerRegistry::new();
    registry
        .register(ObjectKind::Black, Rc::new(GlassStone::new(Color::Black)))
        .register(ObjectKind::White, Rc::new(GlassStone::new(Color::White)))
        .register(ObjectKind::Label, Rc::new(Label))
        .register(ObjectKind::Line, Rc::new(LineHandler { arrow: false }))
        .register(ObjectKind::Arrow, Rc::new(LineHandler { arrow: true }));
    for kind in [
        ObjectKind::Circle,
        ObjectKind::Square,
        ObjectKind::Triangle,
        ObjectKind::Dot,
        ObjectKind::XMark,
    ] {
        if let Some(shape) = MarkerShape::for_kind(&kind) {
            registry.register(kind, Rc::new(Marker::new(shape)));
        }
    }
    registry
}

fn translate(point: Point) -> String {
    format!("translate({},{})", point.x, point.y)
}

/// Glossy stone filled with a radial gradient, with a blurred shadow.
#[derive(Debug, Clone, Copy)]
pub struct GlassStone {
    color: Color,
}

impl GlassStone {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    fn gradient_stops(&self) -> [(f64, Rgba); 2] {
        match self.color {
            Color::White => [(0.0, Rgba::WHITE), (1.0, Rgba::rgb(0xaa, 0xaa, 0xaa))],
            _ => [(0.0, Rgba::rgb(0x55, 0x55, 0x55)), (1.0, Rgba::BLACK)],
        }
    }
}

impl SvgDrawHandler for GlassStone {
    fn create_element(&self, cx: &mut SvgContext<'_>) -> ObjectElements {
        let shadow_theme = cx.config.theme.shadow.clone();
        let key = match self.color {
            Color::White => "glass-white",
            _ => "glass-black",
        };
        let stops = self.gradient_stops();
        let gradient = cx.define(key, |tree| {
            let gradient = tree.element(
                "radialGradient",
                [("cx", "0.35"), ("cy", "0.35"), ("r", "0.75"), ("fx", "0.3"), ("fy", "0.3")],
            );
            for (offset, color) in stops {
                let stop = tree.create("stop");
                tree.set_attr(stop, "offset", offset);
                tree.set_attr(stop, "stop-color", color.to_css());
                tree.append(gradient, stop);
            }
            gradient
        });
        let filter = cx.define("stone-shadow", |tree| {
            let filter = tree.element(
                "filter",
                [("x", "-50%"), ("y", "-50%"), ("width", "200%"), ("height", "200%")],
            );
            let blur = tree.create("feGaussianBlur");
            tree.set_attr(blur, "stdDeviation", shadow_theme.blur);
            tree.append(filter, blur);
            filter
        });

        let stone = cx.tree.create("circle");
        cx.tree.set_attr(stone, "fill", url(&gradient));
        let shadow = cx.tree.create("circle");
        cx.tree.set_attr(shadow, "fill", shadow_theme.color.to_css());
        cx.tree.set_attr(shadow, "filter", url(&filter));

        ObjectElements::single(stone).with(SvgLayer::Shadows, shadow)
    }

    fn update_element(
        &self,
        tree: &mut SvgTree,
        elements: &ObjectElements,
        object: &SvgObject,
        config: &BoardConfig,
    ) {
        let Some(position) = object.position() else {
            return;
        };
        let theme = &config.theme;
        let radius = theme.stone_size * object.attrs.scale;
        let center = position.to_point();

        if let Some(stone) = elements.main() {
            tree.set_attr(stone, "transform", translate(center));
            tree.set_attr(stone, "r", radius);
            tree.set_attr(stone, "opacity", object.attrs.opacity);
        }
        if let Some(shadow) = elements.get(SvgLayer::Shadows) {
            let offset = Vec2::new(theme.shadow.offset_x, theme.shadow.offset_y);
            tree.set_attr(shadow, "transform", translate(center + offset));
            tree.set_attr(shadow, "r", radius);
            tree.set_attr(shadow, "opacity", object.attrs.opacity);
        }
    }
}

fn update_mask(tree: &mut SvgTree, mask: Option<NodeId>, center: Point, radius: f64) {
    if let Some(mask) = mask {
        tree.set_attr(mask, "transform", translate(center));
        tree.set_attr(mask, "r", radius);
    }
}

fn create_mask(tree: &mut SvgTree) -> NodeId {
    tree.element("circle", [("fill", "black")])
}

/// Circle, square, triangle, dot or x-mark marker.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    shape: MarkerShape,
}

impl Marker {
    pub fn new(shape: MarkerShape) -> Self {
        Self { shape }
    }
}

impl SvgDrawHandler for Marker {
    fn create_element(&self, cx: &mut SvgContext<'_>) -> ObjectElements {
        let path = cx.tree.create("path");
        if self.shape.is_filled() {
            cx.tree.set_attr(path, "stroke", "none");
        } else {
            cx.tree.set_attr(path, "fill", "none");
            cx.tree.set_attr(path, "stroke-linecap", "round");
        }
        let mask = create_mask(cx.tree);
        ObjectElements::single(path).with(SvgLayer::GridMask, mask)
    }

    fn update_element(
        &self,
        tree: &mut SvgTree,
        elements: &ObjectElements,
        object: &SvgObject,
        config: &BoardConfig,
    ) {
        let Some(position) = object.position() else {
            return;
        };
        let theme = &config.theme;
        let radius = theme.stone_size * object.attrs.scale;
        let center = position.to_point();
        let color = markup_color(&theme.markup, object).to_css();

        if let Some(path) = elements.main() {
            tree.set_attr(path, "d", self.shape.path(radius).to_svg());
            tree.set_attr(path, "transform", translate(center));
            tree.set_attr(path, "opacity", object.attrs.opacity);
            if self.shape.is_filled() {
                tree.set_attr(path, "fill", color);
            } else {
                tree.set_attr(path, "stroke", color);
                tree.set_attr(path, "stroke-width", theme.markup.line_width);
            }
        }
        update_mask(tree, elements.get(SvgLayer::GridMask), center, radius * 0.6);
    }
}

/// Text label centered on an intersection.
#[derive(Debug, Clone, Copy)]
pub struct Label;

impl SvgDrawHandler for Label {
    fn create_element(&self, cx: &mut SvgContext<'_>) -> ObjectElements {
        let text = cx.tree.element(
            "text",
            [("text-anchor", "middle"), ("dominant-baseline", "central")],
        );
        let mask = create_mask(cx.tree);
        ObjectElements::single(text).with(SvgLayer::GridMask, mask)
    }

    fn update_element(
        &self,
        tree: &mut SvgTree,
        elements: &ObjectElements,
        object: &SvgObject,
        config: &BoardConfig,
    ) {
        let Some(position) = object.position() else {
            return;
        };
        let theme = &config.theme;
        let radius = theme.stone_size * object.attrs.scale;
        let center = position.to_point();
        let content = object.attrs.text.as_deref().unwrap_or_default();

        if let Some(text) = elements.main() {
            tree.set_text(text, content);
            tree.set_attr(text, "transform", translate(center));
            tree.set_attr(text, "font-size", label_font_size(radius, content));
            tree.set_attr(text, "font-family", &theme.markup.font_family);
            tree.set_attr(text, "fill", markup_color(&theme.markup, object).to_css());
            tree.set_attr(text, "opacity", object.attrs.opacity);
        }
        update_mask(tree, elements.get(SvgLayer::GridMask), center, radius);
    }
}

/// Line or arrow between two intersections.
#[derive(Debug, Clone, Copy)]
pub struct LineHandler {
    pub arrow: bool,
}

impl LineHandler {
    const HEAD_SIZE: f64 = 0.3;
}

impl SvgDrawHandler for LineHandler {
    fn create_element(&self, cx: &mut SvgContext<'_>) -> ObjectElements {
        let group = cx.tree.create("g");
        let shaft = cx.tree.element("path", [("fill", "none"), ("stroke-linecap", "round")]);
        cx.tree.append(group, shaft);
        if self.arrow {
            let head = cx.tree.element("path", [("stroke", "none")]);
            cx.tree.append(group, head);
        }
        ObjectElements::single(group)
    }

    fn update_element(
        &self,
        tree: &mut SvgTree,
        elements: &ObjectElements,
        object: &SvgObject,
        config: &BoardConfig,
    ) {
        let (Some(group), Some((start, end))) = (elements.main(), object.segment()) else {
            return;
        };
        let markup = &config.theme.markup;
        let delta = end.to_point() - start.to_point();
        let color = markup.empty_color.to_css();
        let children = tree.children(group).to_vec();

        tree.set_attr(group, "transform", translate(start.to_point()));
        tree.set_attr(group, "opacity", object.attrs.opacity);
        if let Some(&shaft) = children.first() {
            let path = if self.arrow {
                arrow_shaft(delta, Self::HEAD_SIZE)
            } else {
                line_path(delta)
            };
            tree.set_attr(shaft, "d", path.to_svg());
            tree.set_attr(shaft, "stroke", &color);
            tree.set_attr(shaft, "stroke-width", markup.line_width * 1.5);
        }
        if let Some(&head) = children.get(1) {
            tree.set_attr(head, "d", arrow_head(delta, Self::HEAD_SIZE).to_svg());
            tree.set_attr(head, "fill", &color);
        }
    }
}
