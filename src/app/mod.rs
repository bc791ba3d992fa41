use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Result;
use eframe::egui::{self, Context};
use tracing::{error, info};

use crate::config::SimConfig;
use crate::org::Dataset;
use crate::sim::OrgSimulation;

mod canvas;
mod panels;
mod render_utils;

/// Where the viewer reads its inputs from. `None` means built-in sample / defaults.
#[derive(Clone, Debug, Default)]
pub struct LoadSource {
    pub dataset: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl LoadSource {
    fn load(&self) -> Result<(Dataset, SimConfig)> {
        let config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        let dataset = match &self.dataset {
            Some(path) => Dataset::load(path)?,
            None => Dataset::sample(),
        };
        Ok((dataset, config))
    }
}

type LoadResult = Result<(Dataset, SimConfig), String>;

pub struct OrgCanvasApp {
    source: LoadSource,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    sim: OrgSimulation,
    search: String,
    pointer_inside: bool,
}

impl OrgCanvasApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: LoadSource) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: LoadSource) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = source.load().map_err(|error| {
                error!("failed to load organization: {error:#}");
                format!("{error:#}")
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: LoadSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready(dataset: &Dataset, config: SimConfig) -> AppState {
        let mut sim = OrgSimulation::new(config);
        sim.load(dataset);
        info!(
            departments = sim.graph().departments().len(),
            diagnostics = sim.diagnostics().len(),
            "organization ready"
        );
        AppState::Ready(Box::new(ViewModel {
            sim,
            search: String::new(),
            pointer_inside: false,
        }))
    }
}

impl eframe::App for OrgCanvasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok((dataset, config))) => transition = Some(Self::ready(&dataset, config)),
                    Ok(Err(error)) => transition = Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading organization...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load organization");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.source.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok((dataset, config))) => {
                            transition = Some(Self::ready(&dataset, config));
                        }
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
