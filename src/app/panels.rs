use eframe::egui::{self, Align, Color32, Context, Layout, RichText, Ui};

use crate::org::{EdgeKind, NodeType};
use crate::sim::{DepartmentFilter, UrlOpener};

use super::render_utils::node_color;
use super::{LoadSource, ViewModel};

struct ContextOpener<'a>(&'a Context);

impl UrlOpener for ContextOpener<'_> {
    fn open_url(&mut self, url: &str) {
        self.0.open_url(egui::OpenUrl::new_tab(url));
    }
}

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &LoadSource,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("org-canvas");
                    ui.separator();
                    let dataset = source
                        .dataset
                        .as_ref()
                        .map_or_else(|| "built-in sample".to_owned(), |path| path.display().to_string());
                    ui.label(format!("dataset: {dataset}"));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload dataset"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let visible = self.sim.visible();
                        ui.label(format!(
                            "visible: {} nodes, {} edges",
                            visible.nodes.len(),
                            visible.edges.len()
                        ));
                        ui.label(format!("zoom {:.2}", self.sim.camera().zoom));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.draw_controls(ui));
            });

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ctx, ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_canvas(ui));
    }

    fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("View");

        let mut show_teams = self.sim.toggles().show_teams;
        if ui.checkbox(&mut show_teams, "Show teams").changed() {
            self.sim.set_show_teams(show_teams);
        }
        let mut show_projects = self.sim.toggles().show_projects;
        if ui.checkbox(&mut show_projects, "Show projects").changed() {
            self.sim.set_show_projects(show_projects);
        }
        let mut physics = self.sim.physics_enabled();
        if ui.checkbox(&mut physics, "Physics").changed() {
            self.sim.set_physics_enabled(physics);
        }

        let current = match &self.sim.toggles().department {
            DepartmentFilter::All => "all".to_owned(),
            DepartmentFilter::Only(id) => id.clone(),
        };
        let current_name = self
            .sim
            .graph()
            .department(&current)
            .map_or_else(|| "All departments".to_owned(), |department| department.name.clone());
        let mut chosen = None;
        egui::ComboBox::from_label("Department")
            .selected_text(current_name)
            .show_ui(ui, |ui| {
                if ui.selectable_label(current == "all", "All departments").clicked() {
                    chosen = Some("all".to_owned());
                }
                for department in self.sim.graph().departments() {
                    if ui
                        .selectable_label(current == department.id, department.name.as_str())
                        .clicked()
                    {
                        chosen = Some(department.id.clone());
                    }
                }
            });
        if let Some(value) = chosen {
            self.sim.set_department_filter(&value);
            if !self.search.trim().is_empty() {
                self.sim.search(&self.search);
            }
        }

        ui.horizontal(|ui| {
            if ui.button("Reset view").clicked() {
                self.sim.reset_view();
            }
            if ui.button("Center").clicked() {
                self.sim.center_graph();
            }
            if ui.button("Unpin all").clicked() {
                self.sim.unpin_all();
            }
        });
        ui.label(
            RichText::new("Shift-release a dragged node to pin it.")
                .small()
                .weak(),
        );

        ui.separator();
        ui.heading("Search");
        ui.horizontal(|ui| {
            let edit = ui.text_edit_singleline(&mut self.search);
            if edit.changed() {
                self.sim.search(&self.search);
            }
            if ui.button("Clear").clicked() {
                self.search.clear();
                self.sim.clear_search();
            }
        });

        let mut picked = None;
        for &index in self.sim.search_results() {
            let node = &self.sim.graph().nodes()[index];
            let text = match node.role() {
                Some(role) if !role.is_empty() => format!("{}  ({role})", node.label),
                _ => node.label.clone(),
            };
            ui.horizontal(|ui| {
                ui.colored_label(node_color(node.node_type()), node.node_type().tag());
                let is_current = self.sim.highlight().search == Some(index);
                if ui.selectable_label(is_current, text).clicked() {
                    picked = Some(index);
                }
            });
        }
        if !self.search.trim().is_empty() && self.sim.search_results().is_empty() {
            ui.label(RichText::new("No matches").weak());
        }
        if let Some(index) = picked {
            self.sim.highlight_search_result(index);
        }

        ui.separator();
        let diagnostics = self.sim.diagnostics();
        egui::CollapsingHeader::new(format!("Diagnostics ({})", diagnostics.len()))
            .default_open(!diagnostics.is_empty())
            .show(ui, |ui| {
                if diagnostics.is_empty() {
                    ui.label("Dataset loaded cleanly.");
                }
                for warning in diagnostics {
                    ui.colored_label(Color32::from_rgb(240, 190, 90), warning.to_string());
                }
            });
    }

    fn draw_details(&mut self, ctx: &Context, ui: &mut Ui) {
        ui.heading("Details");

        let Some(index) = self.sim.highlight().selected else {
            ui.label("Click a node to inspect it.");
            return;
        };
        let Some(node) = self.sim.graph().node(index) else {
            return;
        };

        ui.label(RichText::new(&node.label).strong().size(16.0));
        ui.colored_label(node_color(node.node_type()), node.node_type().tag());
        ui.label(format!("id: {}", node.id));
        if let Some(department) = self.sim.graph().department(&node.department) {
            ui.label(format!("department: {}", department.name));
        }
        for line in self.sim.tooltip(index) {
            ui.label(line);
        }
        if let Some(team) = node.team().and_then(|id| self.sim.graph().node_by_id(id)) {
            ui.label(format!("team: {}", team.label));
        }
        if node.node_type() == NodeType::Team
            && let Some(owner) = self.sim.graph().owner_of(index)
        {
            ui.label(format!("owner: {}", self.sim.graph().nodes()[owner].label));
        }

        let link = self.sim.external_url(node);
        let mut pinned = node.pinned;

        ui.separator();
        ui.label(RichText::new("Connections").strong());
        for edge_index in self.sim.connected_edges(index) {
            let edge = self.sim.graph().edges()[edge_index];
            let other = if edge.source == index {
                edge.target
            } else {
                edge.source
            };
            let verb = match (edge.kind, edge.source == index) {
                (EdgeKind::Member, true) => "member of",
                (EdgeKind::Member, false) => "member",
                (EdgeKind::Assignment, true) => "works on",
                (EdgeKind::Assignment, false) => "assigned",
            };
            ui.label(format!("{verb} {}", self.sim.graph().nodes()[other].label));
        }

        ui.separator();
        let mut open_requested = false;
        ui.horizontal(|ui| {
            if ui.checkbox(&mut pinned, "Pinned").changed() {
                self.sim.set_pinned(index, pinned);
            }
            match &link {
                Ok(url) => {
                    if ui.button("Open link").on_hover_text(url).clicked() {
                        open_requested = true;
                    }
                }
                Err(gap) => {
                    ui.add_enabled(false, egui::Button::new("Open link"))
                        .on_disabled_hover_text(gap.to_string());
                }
            }
        });
        if open_requested {
            self.sim.open(index, &mut ContextOpener(ctx));
        }
    }
}
