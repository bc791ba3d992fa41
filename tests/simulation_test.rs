use org_canvas::config::SimConfig;
use org_canvas::error::DataIntegrityWarning;
use org_canvas::org::{Dataset, EdgeKind, NodeType};
use org_canvas::sim::{FrameContext, Modifiers, OrgSimulation};

use eframe::egui::{pos2, vec2};

fn simulation_with(dataset: &Dataset) -> OrgSimulation {
    let mut config = SimConfig::default();
    config.layout.seed = Some(2024);
    let mut sim = OrgSimulation::new(config);
    sim.set_viewport(vec2(1000.0, 700.0));
    sim.load(dataset);
    sim
}

fn tick(sim: &mut OrgSimulation, frame: u32) {
    sim.tick(FrameContext {
        now_seconds: f64::from(frame) / 60.0,
    });
}

#[test]
fn test_minimal_organization() {
    let dataset = Dataset::from_json(
        r#"{
            "departments": [{ "id": "D", "name": "Dept" }],
            "teams": [{ "id": "T", "name": "Core Team", "department": "D", "owner": "E1" }],
            "employees": [
                { "id": "E1", "name": "One", "role": "Lead", "department": "D", "team": "T", "projects": ["P1"] },
                { "id": "E2", "name": "Two", "role": "Dev", "department": "D", "team": "T" }
            ],
            "projects": [{ "id": "P1", "name": "Launch", "department": "D" }]
        }"#,
    )
    .unwrap();
    let sim = simulation_with(&dataset);
    let graph = sim.graph();

    assert_eq!(graph.count_by_type(NodeType::Team) + graph.count_by_type(NodeType::Project), 2);
    assert_eq!(graph.count_by_type(NodeType::Employee), 2);
    assert_eq!(graph.count_edges(EdgeKind::Member), 2);
    assert_eq!(graph.count_edges(EdgeKind::Assignment), 1);
    assert!(graph.node_by_id("E1").unwrap().is_team_owner());
    assert!(!graph.node_by_id("E2").unwrap().is_team_owner());
    assert!(sim.diagnostics().is_empty());
}

#[test]
fn test_unknown_department_is_reported() {
    let dataset = Dataset::from_json(
        r#"{
            "departments": [{ "id": "D", "name": "Dept" }],
            "employees": [
                { "id": "E1", "name": "Kept", "department": "D" },
                { "id": "E2", "name": "Lost", "department": "nowhere" }
            ]
        }"#,
    )
    .unwrap();
    let mut sim = simulation_with(&dataset);

    assert!(sim.graph().node_by_id("E2").is_none());
    assert!(sim.diagnostics().iter().any(|warning| matches!(
        warning,
        DataIntegrityWarning::MissingDepartment { id, .. } if id == "E2"
    )));

    for frame in 0..30 {
        tick(&mut sim, frame);
    }
    assert_eq!(sim.visible_nodes().len(), 1);
}

#[test]
fn test_zoom_in_then_out_restores_offset() {
    let mut sim = simulation_with(&Dataset::sample());
    let before = *sim.camera();
    let cursor = pos2(612.0, 233.0);

    sim.wheel(cursor, 1.0);
    assert!((sim.camera().zoom - 1.1).abs() < 1e-5);
    sim.wheel(cursor, -1.0);

    assert!((sim.camera().zoom - before.zoom).abs() < 1e-5);
    assert!((sim.camera().offset - before.offset).length() < 1e-2);
}

#[test]
fn test_drag_onto_pinned_node_separates_next_tick() {
    let dataset = Dataset::from_json(
        r#"{
            "departments": [{ "id": "D", "name": "Dept" }],
            "employees": [
                { "id": "A", "name": "Mover", "department": "D" },
                { "id": "B", "name": "Anchor", "department": "D" }
            ]
        }"#,
    )
    .unwrap();
    let mut sim = simulation_with(&dataset);
    let a = sim.graph().index_of("A").unwrap();
    let b = sim.graph().index_of("B").unwrap();
    sim.set_pinned(b, true);
    let anchor = sim.graph().nodes()[b].position;

    let from = sim.camera().world_to_screen(sim.graph().nodes()[a].position);
    let to = sim.camera().world_to_screen(anchor);
    sim.pointer_down(from);
    sim.pointer_move(from + vec2(60.0, 0.0));
    sim.pointer_move(to);
    sim.pointer_up(Modifiers::default());
    assert!((sim.graph().nodes()[a].position - anchor).length() < 1e-2);

    tick(&mut sim, 1);

    let nodes = sim.graph().nodes();
    let minimum = (nodes[a].radius + nodes[b].radius) * sim.config().physics.collision_multiplier;
    assert!((nodes[a].position - nodes[b].position).length() >= minimum);
    assert_eq!(nodes[b].position, anchor);
}

#[test]
fn test_drag_onto_node_pinned_in_department_corner() {
    let dataset = Dataset::from_json(
        r#"{
            "departments": [{ "id": "D", "name": "Dept" }],
            "employees": [
                { "id": "A", "name": "Mover", "department": "D" },
                { "id": "B", "name": "Anchor", "department": "D" }
            ]
        }"#,
    )
    .unwrap();

    for seed in 0..32 {
        let mut config = SimConfig::default();
        config.layout.seed = Some(seed);
        let mut sim = OrgSimulation::new(config);
        sim.set_viewport(vec2(1000.0, 700.0));
        sim.load(&dataset);
        let a = sim.graph().index_of("A").unwrap();
        let b = sim.graph().index_of("B").unwrap();

        let node_b = &sim.graph().nodes()[b];
        let margin = node_b.radius + sim.config().physics.containment_margin;
        let (corner, _) = sim.graph().department("D").unwrap().interior(margin);

        let from = sim.camera().world_to_screen(node_b.position);
        let to = sim.camera().world_to_screen(corner);
        sim.pointer_down(from);
        sim.pointer_move(from + vec2(60.0, 0.0));
        sim.pointer_move(to);
        sim.pointer_up(Modifiers { shift: true });
        assert!(sim.graph().nodes()[b].pinned);
        let anchor = sim.graph().nodes()[b].position;

        let from = sim.camera().world_to_screen(sim.graph().nodes()[a].position);
        let to = sim.camera().world_to_screen(anchor);
        sim.pointer_down(from);
        sim.pointer_move(from + vec2(60.0, 0.0));
        sim.pointer_move(to);
        sim.pointer_up(Modifiers::default());

        tick(&mut sim, 1);

        let nodes = sim.graph().nodes();
        let minimum =
            (nodes[a].radius + nodes[b].radius) * sim.config().physics.collision_multiplier;
        let distance = (nodes[a].position - nodes[b].position).length();
        assert!(distance >= minimum, "seed {seed}: {distance} < {minimum}");
        assert_eq!(nodes[b].position, anchor);
    }
}

#[test]
fn test_blank_search_twice_clears_highlight() {
    let mut sim = simulation_with(&Dataset::sample());
    let found = sim.search("vega").to_vec();
    assert_eq!(found.len(), 1);
    sim.highlight_search_result(found[0]);
    assert_eq!(sim.highlight().search, Some(found[0]));

    assert!(sim.search("").is_empty());
    assert!(sim.search("").is_empty());
    assert_eq!(sim.highlight().search, None);
}

#[test]
fn test_search_focus_centers_result() {
    let mut sim = simulation_with(&Dataset::sample());
    sim.set_physics_enabled(false);
    let proj4 = sim.graph().index_of("proj4").unwrap();

    sim.highlight_search_result(proj4);
    let mut frame = 0;
    while sim.is_focusing() {
        frame += 1;
        tick(&mut sim, frame);
        assert!(frame < 500, "focus never settled");
    }

    let on_screen = sim
        .camera()
        .world_to_screen(sim.graph().nodes()[proj4].position);
    assert!((on_screen - pos2(500.0, 350.0)).length() < 1.0);
}

#[test]
fn test_new_focus_supersedes_previous() {
    let mut sim = simulation_with(&Dataset::sample());
    sim.set_physics_enabled(false);
    let proj1 = sim.graph().index_of("proj1").unwrap();
    let proj4 = sim.graph().index_of("proj4").unwrap();

    sim.focus(proj1);
    for frame in 0..3 {
        tick(&mut sim, frame);
    }
    sim.focus(proj4);
    for frame in 3..400 {
        tick(&mut sim, frame);
    }

    let on_screen = sim
        .camera()
        .world_to_screen(sim.graph().nodes()[proj4].position);
    assert!((on_screen - pos2(500.0, 350.0)).length() < 1.0);
}

#[test]
fn test_selection_highlights_touching_edges() {
    let mut sim = simulation_with(&Dataset::sample());
    let emp3 = sim.graph().index_of("emp3").unwrap();

    let at = sim.camera().world_to_screen(sim.graph().nodes()[emp3].position);
    sim.pointer_down(at);
    sim.pointer_up(Modifiers::default());

    let highlight = sim.highlight();
    assert_eq!(highlight.selected, Some(emp3));
    assert_eq!(highlight.edges.len(), 3);
    for &edge in &highlight.edges {
        let edge = sim.graph().edges()[edge];
        assert!(edge.source == emp3 || edge.target == emp3);
    }
}

#[test]
fn test_hidden_teams_keep_assigned_employees() {
    let mut sim = simulation_with(&Dataset::sample());
    sim.set_show_teams(false);

    let ids = sim
        .visible_nodes()
        .into_iter()
        .map(|node| node.id.as_str())
        .collect::<Vec<_>>();

    assert!(ids.contains(&"emp8"));
    assert!(!ids.contains(&"emp9"));
    assert!(sim
        .visible_edges()
        .iter()
        .all(|edge| edge.kind == EdgeKind::Assignment));
}

#[test]
fn test_settles_inside_departments() {
    let mut sim = simulation_with(&Dataset::sample());
    for frame in 0..600 {
        tick(&mut sim, frame);
    }

    let margin = sim.config().physics.containment_margin;
    for node in sim.graph().nodes() {
        let department = sim.graph().department(&node.department).unwrap();
        let (min, max) = department.interior(node.radius + margin);
        assert!(node.position.x >= min.x - 1e-3 && node.position.x <= max.x + 1e-3);
        assert!(node.position.y >= min.y - 1e-3 && node.position.y <= max.y + 1e-3);
    }
}
