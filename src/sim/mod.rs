//! Owned simulation context: graph, visibility, layout, camera and selection.

mod camera;
mod highlight;
mod interaction;
mod links;
mod physics;
mod search;
mod tooltip;
mod visibility;

use eframe::egui::{Vec2, vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::error::DataIntegrityWarning;
use crate::org::{Dataset, Edge, Node, OrgGraph, build_graph};

pub use camera::Camera;
pub use highlight::{Highlight, connected_edges};
pub use interaction::{Modifiers, PointerOutcome, PointerState};
pub use links::{UrlOpener, external_url};
pub use physics::{
    PairResponse, classify_pair, collision_threshold, repulsion_between, spring_pull, step_physics,
};
pub use search::search_nodes;
pub use visibility::{DepartmentFilter, VisibilityToggles, VisibleSet, compute_visible};

type SelectionListener = Box<dyn FnMut(Option<&Node>)>;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameContext {
    pub now_seconds: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub physics_moving: bool,
    pub focus_active: bool,
}

impl TickReport {
    pub fn needs_repaint(self) -> bool {
        self.physics_moving || self.focus_active
    }
}

pub struct OrgSimulation {
    config: SimConfig,
    graph: OrgGraph,
    toggles: VisibilityToggles,
    physics_enabled: bool,
    camera: Camera,
    viewport: Vec2,
    pointer: PointerState,
    hovered: Option<usize>,
    highlight: Highlight,
    search_results: Vec<usize>,
    /// Camera offset the focus animation is heading for.
    focus: Option<Vec2>,
    selection_listener: Option<SelectionListener>,
    rng: StdRng,
    last_frame: Option<f64>,
    ticks: u64,
}

impl OrgSimulation {
    pub fn new(config: SimConfig) -> Self {
        let rng = match config.layout.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            graph: OrgGraph::default(),
            toggles: VisibilityToggles::default(),
            physics_enabled: true,
            camera: Camera::default(),
            viewport: vec2(1280.0, 800.0),
            pointer: PointerState::Idle,
            hovered: None,
            highlight: Highlight::default(),
            search_results: Vec::new(),
            focus: None,
            selection_listener: None,
            rng,
            last_frame: None,
            ticks: 0,
        }
    }

    /// Replaces the whole graph and resets selection, search and view.
    pub fn load(&mut self, dataset: &Dataset) {
        self.graph = build_graph(dataset, &self.config.layout, &mut self.rng);

        let had_selection = self.highlight.selected.is_some();
        self.highlight = Highlight::default();
        self.search_results.clear();
        self.pointer = PointerState::Idle;
        self.hovered = None;
        self.focus = None;
        if had_selection {
            self.notify_selection(None);
        }

        self.reset_view();
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn graph(&self) -> &OrgGraph {
        &self.graph
    }

    pub fn diagnostics(&self) -> &[DataIntegrityWarning] {
        self.graph.diagnostics()
    }

    pub fn toggles(&self) -> &VisibilityToggles {
        &self.toggles
    }

    pub fn set_show_teams(&mut self, show: bool) {
        debug!(show, "toggled team visibility");
        self.toggles.show_teams = show;
    }

    pub fn set_show_projects(&mut self, show: bool) {
        debug!(show, "toggled project visibility");
        self.toggles.show_projects = show;
    }

    /// Accepts a department id, or `"all"` to clear the filter.
    pub fn set_department_filter(&mut self, value: &str) {
        let filter = DepartmentFilter::parse(value);
        if let DepartmentFilter::Only(id) = &filter
            && self.graph.department(id).is_none()
        {
            warn!(department = %id, "filtering on a department that is not loaded");
        }
        debug!(?filter, "changed department filter");
        self.toggles.department = filter;
    }

    pub fn physics_enabled(&self) -> bool {
        self.physics_enabled
    }

    pub fn set_physics_enabled(&mut self, enabled: bool) {
        debug!(enabled, "toggled physics");
        self.physics_enabled = enabled;
    }

    pub fn visible(&self) -> VisibleSet {
        compute_visible(&self.graph, &self.toggles)
    }

    pub fn visible_nodes(&self) -> Vec<&Node> {
        self.visible()
            .nodes
            .into_iter()
            .map(|index| &self.graph.nodes()[index])
            .collect()
    }

    pub fn visible_edges(&self) -> Vec<&Edge> {
        self.visible()
            .edges
            .into_iter()
            .map(|index| &self.graph.edges()[index])
            .collect()
    }

    pub fn tick(&mut self, frame: FrameContext) -> TickReport {
        if let Some(last) = self.last_frame
            && frame.now_seconds < last
        {
            debug!(last, now = frame.now_seconds, "frame clock went backwards");
        }
        self.last_frame = Some(frame.now_seconds);
        self.ticks += 1;

        let physics_moving = if self.physics_enabled {
            let visible = self.visible();
            step_physics(
                &mut self.graph,
                &visible,
                &self.config.physics,
                &mut self.rng,
            )
        } else {
            false
        };

        TickReport {
            physics_moving,
            focus_active: self.advance_focus(),
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.ticks
    }

    fn advance_focus(&mut self) -> bool {
        let Some(target) = self.focus else {
            return false;
        };
        let interaction = &self.config.interaction;
        if self.camera.approach(
            target,
            interaction.focus_speed,
            interaction.focus_settle_distance,
        ) {
            self.focus = None;
        }
        self.focus.is_some()
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    pub fn selected(&self) -> Option<&Node> {
        self.highlight
            .selected
            .and_then(|index| self.graph.node(index))
    }

    pub fn select(&mut self, index: usize) {
        let Some(node) = self.graph.node(index) else {
            return;
        };
        debug!(node = %node.id, "selected node");
        self.highlight = highlight::build_highlight(&self.graph, index, self.highlight.search);
        self.notify_selection(Some(index));
    }

    pub fn clear_selection(&mut self) {
        let had_selection = self.highlight.selected.is_some();
        self.highlight.clear_selection();
        if had_selection {
            debug!("cleared selection");
            self.notify_selection(None);
        }
    }

    pub fn on_selection_changed(&mut self, listener: impl FnMut(Option<&Node>) + 'static) {
        self.selection_listener = Some(Box::new(listener));
    }

    fn notify_selection(&mut self, index: Option<usize>) {
        if let Some(listener) = self.selection_listener.as_mut() {
            listener(index.and_then(|index| self.graph.nodes.get(index)));
        }
    }

    pub fn connected_edges(&self, index: usize) -> Vec<usize> {
        connected_edges(&self.graph, index)
    }

    pub fn set_pinned(&mut self, index: usize, pinned: bool) {
        let dragging = self.pointer.dragged_node() == Some(index);
        if let Some(node) = self.graph.node_mut(index) {
            node.pinned = pinned;
            node.fixed = pinned || dragging;
        }
    }

    pub fn unpin_all(&mut self) {
        let dragging = self.pointer.dragged_node();
        for (index, node) in self.graph.nodes.iter_mut().enumerate() {
            node.pinned = false;
            node.fixed = dragging == Some(index);
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, size: Vec2) {
        self.viewport = size;
    }

    pub fn center_graph(&mut self) {
        let visible = self.visible();
        let mut bounds: Option<(Vec2, Vec2)> = None;
        for &index in &visible.nodes {
            let node = &self.graph.nodes()[index];
            let extent = vec2(node.radius, node.radius);
            let (min, max) = bounds.get_or_insert((node.position, node.position));
            *min = min.min(node.position - extent);
            *max = max.max(node.position + extent);
        }

        match bounds {
            Some((min, max)) => {
                let center = (min + max) * 0.5;
                self.camera.offset = self.camera.offset_centering(center, self.viewport);
            }
            None => {
                self.camera.zoom = 1.0;
                self.camera.offset = self.viewport * 0.5;
            }
        }
    }

    pub fn reset_view(&mut self) {
        self.focus = None;
        self.camera.zoom = 1.0;
        self.center_graph();
        info!(
            nodes = self.graph.node_count(),
            zoom = self.camera.zoom,
            "view reset"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn simulation() -> OrgSimulation {
        let mut config = SimConfig::default();
        config.layout.seed = Some(42);
        let mut sim = OrgSimulation::new(config);
        sim.set_viewport(vec2(800.0, 600.0));
        sim.load(&Dataset::sample());
        sim
    }

    #[test]
    fn paused_physics_keeps_positions() {
        let mut sim = simulation();
        sim.set_physics_enabled(false);
        let before = sim
            .graph()
            .nodes()
            .iter()
            .map(|node| node.position)
            .collect::<Vec<_>>();

        for frame in 0..20 {
            let report = sim.tick(FrameContext {
                now_seconds: f64::from(frame) / 60.0,
            });
            assert!(!report.physics_moving);
        }

        for (node, position) in sim.graph().nodes().iter().zip(before) {
            assert_eq!(node.position, position);
        }
        assert_eq!(sim.frame_count(), 20);
    }

    #[test]
    fn selection_listener_sees_changes() {
        let mut sim = simulation();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        sim.on_selection_changed(move |node| {
            log.borrow_mut().push(node.map(|node| node.id.clone()));
        });

        let emp2 = sim.graph().index_of("emp2").unwrap();
        sim.select(emp2);
        sim.clear_selection();

        assert_eq!(*seen.borrow(), [Some("emp2".to_owned()), None]);
        assert!(sim.highlight().edges.is_empty());
    }

    #[test]
    fn clearing_empty_selection_is_silent() {
        let mut sim = simulation();
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        sim.on_selection_changed(move |_| *counter.borrow_mut() += 1);

        sim.clear_selection();
        sim.pointer_down(vec2(-5000.0, -5000.0).to_pos2());
        sim.pointer_up(Modifiers::default());

        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn reload_clears_selection() {
        let mut sim = simulation();
        let team1 = sim.graph().index_of("team1").unwrap();
        sim.select(team1);
        assert!(sim.selected().is_some());

        sim.load(&Dataset::sample());

        assert!(sim.selected().is_none());
        assert!(sim.highlight().owner_nodes.is_empty());
    }

    #[test]
    fn pinning_fixes_node() {
        let mut sim = simulation();
        sim.set_pinned(3, true);
        assert!(sim.graph().nodes()[3].fixed);

        sim.unpin_all();
        assert!(!sim.graph().nodes()[3].fixed);
        assert!(!sim.graph().nodes()[3].pinned);
    }

    #[test]
    fn empty_graph_centers_origin() {
        let mut sim = OrgSimulation::new(SimConfig::default());
        sim.set_viewport(vec2(400.0, 300.0));
        sim.reset_view();

        assert_eq!(sim.camera().zoom, 1.0);
        assert_eq!(sim.camera().offset, vec2(200.0, 150.0));
    }

    #[test]
    fn centering_puts_bounds_mid_viewport() {
        let sim = simulation();
        let visible = sim.visible();
        let nodes = sim.graph().nodes();
        let (mut min, mut max) = (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN));
        for &index in &visible.nodes {
            let extent = Vec2::splat(nodes[index].radius);
            min = min.min(nodes[index].position - extent);
            max = max.max(nodes[index].position + extent);
        }
        let center = sim.camera().world_to_screen((min + max) * 0.5);

        assert!((center.x - 400.0).abs() < 1e-2);
        assert!((center.y - 300.0).abs() < 1e-2);
    }
}
