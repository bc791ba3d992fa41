use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::org::{EdgeKind, NodeType};

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

/// Darkens and fades a color for nodes and edges outside the current selection.
pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn node_color(node_type: NodeType) -> Color32 {
    match node_type {
        NodeType::Employee => Color32::from_rgb(0x64, 0xb5, 0xf6),
        NodeType::Team => Color32::from_rgb(0x81, 0xc7, 0x84),
        NodeType::Project => Color32::from_rgb(0x93, 0x70, 0xdb),
    }
}

pub(super) fn edge_color(kind: EdgeKind) -> Color32 {
    match kind {
        EdgeKind::Member => Color32::from_rgb(0x90, 0xa4, 0xae),
        EdgeKind::Assignment => Color32::from_rgb(0x93, 0x70, 0xdb),
    }
}

pub(super) fn department_fill() -> Color32 {
    Color32::from_rgba_unmultiplied(70, 90, 110, 38)
}

/// Grid anchored on the world origin, which sits at `rect.min + offset` on screen.
pub(super) fn draw_background(painter: &Painter, rect: Rect, offset: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (50.0 * zoom).max(12.0);
    let origin = rect.min + offset;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Splits "Frontend Team" into `["Frontend", "Team"]`; other labels stay on one line.
pub(super) fn wrap_team_label(label: &str) -> Vec<&str> {
    match label.strip_suffix("Team") {
        Some(head) if !head.trim().is_empty() => vec![head.trim_end(), "Team"],
        _ => vec![label],
    }
}
