use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use eframe::{App, egui};
use gsm_core::config::{DEFAULT_REGISTRY_FILE, REGISTRY_ENV, picker_start_dir};
use gsm_core::{AddOutcome, BackupReport, Prompt, RegistryStore, SaveManager, Selection, SystemLauncher};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, PartialEq, Eq, Default)]
enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    fn visuals(self) -> egui::Visuals {
        match self {
            Theme::Dark => egui::Visuals::dark(),
            Theme::Light => egui::Visuals::light(),
        }
    }
    fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(Default)]
struct State {
    selection: Selection,
    game_name: String,
    manual_path: String,
    // Some while the game name window is open
    name_prompt: Option<String>,
    theme: Theme,
    status: String,
    last_backup_time: Option<DateTime<Local>>,
    picker_start: Option<PathBuf>,
}

struct AppGui {
    manager: SaveManager,
    state: State,
}

impl AppGui {
    fn new(cc: &eframe::CreationContext<'_>, manager: SaveManager) -> Self {
        let state = State {
            picker_start: picker_start_dir(),
            ..Default::default()
        };
        cc.egui_ctx.set_visuals(state.theme.visuals());
        Self { manager, state }
    }

    fn report_add(&mut self, result: Result<AddOutcome, gsm_core::Error>) {
        self.state.status = match result {
            Ok(AddOutcome::Added(i)) => {
                self.state.selection.select(i);
                "Path added".into()
            }
            Ok(AddOutcome::Duplicate) => "Path already registered".into(),
            Ok(AddOutcome::EmptyPath) => "Enter a path first".into(),
            Ok(AddOutcome::NotUnicode(p)) => {
                format!("Path is not valid Unicode: {}", p.display())
            }
            Ok(AddOutcome::Cancelled) => String::new(),
            Err(e) => {
                error!("{e}");
                format!("Save error: {}", e)
            }
        };
    }

    fn add_via_picker(&mut self, name: String) {
        let mut prompt = DialogPrompt { name: Some(name) };
        let start = self.state.picker_start.clone();
        let result = self.manager.add_via_picker(&mut prompt, start.as_deref());
        self.report_add(result);
    }

    fn add_manual(&mut self) {
        let result = self
            .manager
            .add_manual(&self.state.manual_path, &self.state.game_name);
        if matches!(result, Ok(AddOutcome::Added(_))) {
            self.state.manual_path.clear();
        }
        self.report_add(result);
    }

    fn open_selected(&mut self) {
        match self
            .manager
            .open_selected(self.state.selection, &SystemLauncher)
        {
            Ok(Some(rec)) => self.state.status = format!("Opened {}", rec.path),
            Ok(None) => {}
            Err(e) => {
                error!("{e}");
                self.state.status = format!("Open error: {}", e);
            }
        }
    }

    fn delete_selected(&mut self) {
        match self.manager.delete_selected(self.state.selection) {
            Ok(Some(rec)) => {
                if self.manager.registry().is_empty() {
                    self.state.selection.clear();
                } else {
                    self.state.selection.clamp(self.manager.registry().len());
                }
                self.state.status = format!("Deleted {}", rec.path);
            }
            Ok(None) => {}
            Err(e) => {
                error!("{e}");
                self.state.status = format!("Save error: {}", e);
            }
        }
    }

    fn backup(&mut self) {
        let mut prompt = DialogPrompt { name: None };
        if let Some(report) = self.manager.backup(&mut prompt) {
            self.state.last_backup_time = Some(report.started_at);
            self.state.status = report.summary();
            if report.failed() > 0 {
                show_failures(&report);
            }
        }
    }

    fn paths_table(&mut self, ui: &mut egui::Ui) {
        let view = self.manager.table();
        let col_width = (ui.available_width() / 2.0 - ui.spacing().item_spacing.x).max(50.0);
        let mut clicked: Option<usize> = None;
        egui::ScrollArea::vertical()
            .id_source("paths_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("paths_grid")
                    .num_columns(2)
                    .striped(true)
                    .min_col_width(col_width)
                    .max_col_width(col_width)
                    .show(ui, |ui| {
                        for title in view.columns {
                            ui.strong(title);
                        }
                        ui.end_row();
                        for (i, row) in view.rows.iter().enumerate() {
                            let sel = self.state.selection.is_selected(i);
                            if ui.selectable_label(sel, &row.game_name).clicked() {
                                clicked = Some(i);
                            }
                            if ui.selectable_label(sel, &row.path).clicked() {
                                clicked = Some(i);
                            }
                            ui.end_row();
                        }
                    });
            });
        if let Some(i) = clicked {
            self.state.selection.select(i);
        }
    }

    fn name_window(&mut self, ctx: &egui::Context) {
        let Some(mut name) = self.state.name_prompt.take() else {
            return;
        };
        let mut submit = false;
        let mut cancel = false;
        egui::Window::new("Game Name")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Enter the game name:");
                let resp = ui.text_edit_singleline(&mut name);
                if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        submit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });
        if submit {
            self.add_via_picker(name);
        } else if !cancel {
            self.state.name_prompt = Some(name);
        }
    }
}

impl App for AppGui {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "Registry: {}",
                    self.manager.store().path().display()
                ));
                ui.separator();
                let label = match self.state.theme {
                    Theme::Dark => "Light mode",
                    Theme::Light => "Dark mode",
                };
                if ui.button(label).clicked() {
                    self.state.theme = self.state.theme.toggled();
                    ctx.set_visuals(self.state.theme.visuals());
                }
                if let Some(time) = self.state.last_backup_time {
                    ui.separator();
                    ui.label(format!("Last backup: {}", time.format("%Y-%m-%d %H:%M:%S")));
                }
            });
        });

        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label("Game Name:");
            ui.add(egui::TextEdit::singleline(&mut self.state.game_name).desired_width(f32::INFINITY));
            ui.label("Manual Path Entry:");
            ui.horizontal(|ui| {
                let width = (ui.available_width() - 120.0).max(100.0);
                ui.add(egui::TextEdit::singleline(&mut self.state.manual_path).desired_width(width));
                if ui.button("Add Manually").clicked() {
                    self.add_manual();
                }
            });
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Add via Picker").clicked() && self.state.name_prompt.is_none() {
                    self.state.name_prompt = Some(self.state.game_name.clone());
                }
                let has_sel = self.state.selection.resolve(self.manager.registry()).is_some();
                if ui
                    .add_enabled(has_sel, egui::Button::new("Open Selected Path"))
                    .clicked()
                {
                    self.open_selected();
                }
                if ui
                    .add_enabled(has_sel, egui::Button::new("Delete Path"))
                    .clicked()
                {
                    self.delete_selected();
                }
                if ui.button("Backup").clicked() {
                    self.backup();
                }
            });
            ui.label(&self.state.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Saved Paths");
            ui.separator();
            self.paths_table(ui);
        });

        self.name_window(ctx);
    }
}

/// Native dialogs. The game name comes from the in-app window before the flow starts.
struct DialogPrompt {
    name: Option<String>,
}

impl Prompt for DialogPrompt {
    fn text_input(&mut self, _title: &str, _label: &str) -> Option<String> {
        self.name.take()
    }

    fn pick_directory(&mut self, title: &str, start: Option<&Path>) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title(title);
        if let Some(dir) = start {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_folder()
    }

    fn warn(&mut self, title: &str, message: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        let answer = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::YesNo)
            .show();
        matches!(answer, rfd::MessageDialogResult::Yes)
    }
}

fn show_failures(report: &BackupReport) {
    let details: Vec<String> = report.failures().map(|e| e.to_string()).collect();
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Backup")
        .set_description(format!(
            "{} folder(s) could not be copied:\n\n{}",
            report.failed(),
            details.join("\n")
        ))
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let registry_path = std::env::var_os(REGISTRY_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REGISTRY_FILE));
    let manager = SaveManager::open(RegistryStore::new(registry_path))?;

    let native_options = eframe::NativeOptions {
        viewport: egui::viewport::ViewportBuilder::default()
            .with_inner_size([1600.0, 900.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Game Save Manager",
        native_options,
        Box::new(|cc| Ok(Box::new(AppGui::new(cc, manager)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
