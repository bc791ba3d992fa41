use std::collections::HashSet;

use eframe::egui::{
    self, Align2, Color32, CornerRadius, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, Vec2,
    vec2,
};

use crate::org::{NodeType, OrgGraph};
use crate::sim::{FrameContext, Modifiers, PointerState};

use super::ViewModel;
use super::render_utils::{
    blend_color, circle_visible, department_fill, dim_color, draw_background, edge_color,
    node_color, wrap_team_label,
};

const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const SEARCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);

impl ViewModel {
    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.sim.set_viewport(rect.size());
        self.route_pointer(ui, rect, &response);

        let now_seconds = ui.input(|input| input.time);
        let report = self.sim.tick(FrameContext { now_seconds });
        if report.needs_repaint() || self.sim.pointer_state() != PointerState::Idle {
            ui.ctx().request_repaint();
        }

        let camera = *self.sim.camera();
        let to_screen = |world: Vec2| rect.min + camera.world_to_screen(world).to_vec2();
        draw_background(&painter, rect, camera.offset, camera.zoom);

        for department in self.sim.graph().departments() {
            let bounds = Rect::from_min_max(
                to_screen(department.min()),
                to_screen(department.max()),
            );
            if !rect.intersects(bounds) {
                continue;
            }
            painter.rect_filled(bounds, CornerRadius::same(6), department_fill());
            painter.rect_stroke(
                bounds,
                CornerRadius::same(6),
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(120, 140, 160, 120)),
                StrokeKind::Inside,
            );
            painter.text(
                bounds.left_top() + vec2(12.0, 10.0),
                Align2::LEFT_TOP,
                &department.name,
                FontId::proportional(16.0),
                Color32::from_gray(210),
            );
        }

        let visible = self.sim.visible();
        let graph = self.sim.graph();
        let highlight = self.sim.highlight();
        let selection_active = highlight.selected.is_some();
        let zoom_sqrt = camera.zoom.sqrt();

        for &edge_index in &visible.edges {
            let edge = graph.edges()[edge_index];
            let start = to_screen(graph.nodes()[edge.source].position);
            let end = to_screen(graph.nodes()[edge.target].position);
            let base = edge_color(edge.kind);

            let (width, color) = if highlight.is_edge_highlighted(edge_index) {
                ((2.6 * zoom_sqrt).clamp(1.4, 4.5), blend_color(base, SELECTED_COLOR, 0.55))
            } else if selection_active {
                ((1.0 * zoom_sqrt).clamp(0.5, 2.0), dim_color(base, 0.35))
            } else {
                ((1.4 * zoom_sqrt).clamp(0.7, 3.0), base)
            };
            painter.line_segment([start, end], Stroke::new(width, color));
        }

        let hovered = self.sim.hovered();
        for &index in &visible.nodes {
            let node = &graph.nodes()[index];
            let position = to_screen(node.position);
            let radius = node.radius * camera.zoom;
            if !circle_visible(rect, position, radius + 40.0) {
                continue;
            }

            let is_selected = highlight.selected == Some(index);
            let is_search = highlight.search == Some(index);
            let emphasized = highlight.is_node_emphasized(index)
                || touches_highlighted_edge(graph, &highlight.edges, index);
            let base = node_color(node.node_type());
            let color = if is_selected {
                blend_color(base, SELECTED_COLOR, 0.45)
            } else if highlight.owner_nodes.contains(&index) {
                blend_color(base, SELECTED_COLOR, 0.25)
            } else if selection_active && !emphasized {
                dim_color(base, 0.45)
            } else {
                base
            };

            painter.circle_filled(position, radius, color);
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            );
            if is_selected {
                painter.circle_stroke(position, radius + 4.0, Stroke::new(2.0, SELECTED_COLOR));
            }
            if is_search {
                painter.circle_stroke(position, radius + 7.0, Stroke::new(2.0, SEARCH_COLOR));
            }
            if node.pinned {
                painter.circle_filled(
                    position + vec2(radius * 0.7, -radius * 0.7),
                    (3.0 * zoom_sqrt).max(2.0),
                    Color32::from_rgb(230, 90, 90),
                );
            }
            if hovered == Some(index) {
                painter.circle_stroke(
                    position,
                    radius + 2.0,
                    Stroke::new(1.5, Color32::from_gray(240)),
                );
            }

            let font = FontId::proportional((12.0 * zoom_sqrt).clamp(8.0, 18.0));
            match node.node_type() {
                NodeType::Team => {
                    let lines = wrap_team_label(&node.label);
                    let line_height = font.size * 1.15;
                    let top = position.y - line_height * (lines.len() as f32 - 1.0) * 0.5;
                    for (row, line) in lines.iter().enumerate() {
                        painter.text(
                            Pos2::new(position.x, top + line_height * row as f32),
                            Align2::CENTER_CENTER,
                            line,
                            font.clone(),
                            Color32::from_gray(20),
                        );
                    }
                }
                NodeType::Employee | NodeType::Project => {
                    if camera.zoom > 0.45 || emphasized || hovered == Some(index) {
                        painter.text(
                            position + vec2(0.0, radius + 4.0),
                            Align2::CENTER_TOP,
                            &node.label,
                            font,
                            Color32::from_gray(235),
                        );
                    }
                }
            }
        }

        if let Some(index) = hovered
            && visible.contains_node(index)
            && let Some(pointer) = ui.input(|input| input.pointer.hover_pos())
        {
            self.draw_tooltip(ui, &painter, index, pointer);
        }

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }
    }

    fn route_pointer(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        let (hover, pressed, released, shift, scroll) = ui.input(|input| {
            (
                input.pointer.hover_pos(),
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.modifiers.shift,
                input.raw_scroll_delta.y,
            )
        });
        let to_local = |screen: Pos2| (screen - rect.min).to_pos2();

        let inside = hover.is_some_and(|pointer| rect.contains(pointer));
        if !inside {
            if self.pointer_inside {
                self.sim.pointer_leave();
            }
            self.pointer_inside = false;
            return;
        }
        self.pointer_inside = true;

        let Some(pointer) = hover.map(to_local) else {
            return;
        };

        if pressed && response.hovered() {
            self.sim.pointer_down(pointer);
        }
        self.sim.pointer_move(pointer);
        if released {
            self.sim.pointer_up(Modifiers { shift });
        }
        if response.hovered() && scroll.abs() > f32::EPSILON {
            self.sim.wheel(pointer, scroll);
        }
    }

    fn draw_tooltip(&self, ui: &Ui, painter: &egui::Painter, index: usize, pointer: Pos2) {
        let Some(node) = self.sim.graph().node(index) else {
            return;
        };

        let mut text = node.label.clone();
        for line in self.sim.tooltip(index) {
            text.push('\n');
            text.push_str(&line);
        }

        let galley = painter.layout_no_wrap(text, FontId::proportional(13.0), Color32::from_gray(240));
        let padding = vec2(8.0, 6.0);
        let mut origin = pointer + vec2(14.0, 14.0);
        let clip = ui.clip_rect();
        let size = galley.size() + padding * 2.0;
        if origin.x + size.x > clip.right() {
            origin.x = pointer.x - size.x - 14.0;
        }
        if origin.y + size.y > clip.bottom() {
            origin.y = pointer.y - size.y - 14.0;
        }

        let frame = Rect::from_min_size(origin, size);
        painter.rect_filled(frame, CornerRadius::same(4), Color32::from_rgba_unmultiplied(20, 24, 30, 235));
        painter.rect_stroke(
            frame,
            CornerRadius::same(4),
            Stroke::new(1.0, node_color(node.node_type())),
            StrokeKind::Inside,
        );
        painter.galley(origin + padding, galley, Color32::from_gray(240));
    }
}

fn touches_highlighted_edge(graph: &OrgGraph, edges: &HashSet<usize>, index: usize) -> bool {
    edges.iter().any(|&edge| {
        let edge = graph.edges()[edge];
        edge.source == index || edge.target == index
    })
}
