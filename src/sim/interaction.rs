use eframe::egui::{Pos2, Vec2};
use tracing::debug;

use super::OrgSimulation;

/// Pointer gesture in progress. Positions are canvas-relative screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PointerState {
    #[default]
    Idle,
    PendingDrag { node: usize, press: Pos2 },
    Dragging { node: usize, last: Pos2 },
    PendingPan { press: Pos2 },
    Panning { last: Pos2 },
}

impl PointerState {
    pub fn dragged_node(self) -> Option<usize> {
        match self {
            Self::Dragging { node, .. } => Some(node),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Keeps a dragged node pinned after release.
    pub shift: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerOutcome {
    None,
    Select(usize),
    Deselect,
}

impl OrgSimulation {
    pub fn pointer_state(&self) -> PointerState {
        self.pointer
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Nearest visible node whose disc contains `screen`.
    pub fn node_at(&self, screen: Pos2) -> Option<usize> {
        let world = self.camera.screen_to_world(screen);
        self.visible()
            .nodes
            .into_iter()
            .filter_map(|index| {
                let node = &self.graph.nodes()[index];
                let distance = (node.position - world).length();
                (distance < node.radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub fn pointer_down(&mut self, screen: Pos2) {
        self.pointer = match self.node_at(screen) {
            Some(node) => PointerState::PendingDrag {
                node,
                press: screen,
            },
            None => PointerState::PendingPan { press: screen },
        };
    }

    pub fn pointer_move(&mut self, screen: Pos2) {
        let threshold = self.config.interaction.drag_threshold;

        match self.pointer {
            PointerState::Idle => {
                self.hovered = self.node_at(screen);
            }
            PointerState::PendingDrag { node, press } => {
                if (screen - press).length() > threshold {
                    if let Some(dragged) = self.graph.node_mut(node) {
                        dragged.fixed = true;
                        dragged.velocity = Vec2::ZERO;
                    }
                    self.pointer = PointerState::Dragging { node, last: press };
                    self.drag_to(node, press, screen);
                }
            }
            PointerState::Dragging { node, last } => {
                self.drag_to(node, last, screen);
            }
            PointerState::PendingPan { press } => {
                if (screen - press).length() > threshold {
                    self.focus = None;
                    self.pointer = PointerState::Panning { last: press };
                    self.pan_to(press, screen);
                }
            }
            PointerState::Panning { last } => {
                self.pan_to(last, screen);
            }
        }
    }

    fn drag_to(&mut self, node: usize, last: Pos2, screen: Pos2) {
        let zoom = self.camera.zoom;
        if let Some(dragged) = self.graph.node_mut(node) {
            dragged.position += (screen - last) / zoom;
        }
        self.pointer = PointerState::Dragging { node, last: screen };
    }

    fn pan_to(&mut self, last: Pos2, screen: Pos2) {
        self.camera.offset += screen - last;
        self.pointer = PointerState::Panning { last: screen };
    }

    pub fn pointer_up(&mut self, modifiers: Modifiers) -> PointerOutcome {
        let state = std::mem::take(&mut self.pointer);

        match state {
            PointerState::Idle | PointerState::Panning { .. } => PointerOutcome::None,
            PointerState::PendingDrag { node, .. } => {
                self.select(node);
                PointerOutcome::Select(node)
            }
            PointerState::Dragging { node, .. } => {
                self.release(node, modifiers.shift);
                PointerOutcome::None
            }
            PointerState::PendingPan { .. } => {
                self.clear_selection();
                PointerOutcome::Deselect
            }
        }
    }

    pub fn pointer_leave(&mut self) {
        if let PointerState::Dragging { node, .. } = self.pointer {
            self.release(node, false);
        }
        self.pointer = PointerState::Idle;
        self.hovered = None;
    }

    fn release(&mut self, node: usize, pin: bool) {
        if let Some(released) = self.graph.node_mut(node) {
            released.pinned |= pin;
            released.fixed = released.pinned;
            released.velocity = Vec2::ZERO;
            debug!(node = %released.id, pinned = released.pinned, "released dragged node");
        }
    }

    /// Positive `scroll_y` zooms in around `screen`.
    pub fn wheel(&mut self, screen: Pos2, scroll_y: f32) {
        if scroll_y == 0.0 {
            return;
        }
        let interaction = &self.config.interaction;
        let factor = if scroll_y > 0.0 {
            interaction.wheel_zoom_factor
        } else {
            interaction.wheel_zoom_factor.recip()
        };
        self.focus = None;
        self.camera
            .zoom_at(screen, factor, interaction.min_zoom, interaction.max_zoom);
    }
}
