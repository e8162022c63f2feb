// src/gui.rs
use std::path::PathBuf;
use anyhow::{Context, Result};
use eframe::egui;
use egui::Color32;
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, Points, VLine};
use crate::config::PipelineConfig;
use crate::session::Session;
use crate::signal::{
    format_median_diffs, format_span_times, list_archives, render_channels_png, ArchiveEntry,
    PlotStyle, SignalPipeline,
};
use crate::types::*;

const LINK_GROUP: &str = "nvc_time_axis";
const LOG_LINES: usize = 8;

pub struct NvcViewerApp {
    config: PipelineConfig,
    pipeline: SignalPipeline,

    // 文件夹与文件列表
    folder: Option<PathBuf>,
    archives: Vec<ArchiveEntry>,
    selected: Option<usize>,

    // 当前文件的全部计算结果，换文件时整体替换
    session: Option<Session>,
    reset_view: bool,

    // 选区 (两个绘图区共享)
    span: SpanSelection,
    span_toggle: bool,
    span_revision: u64,
    view_x_range: (f64, f64),

    log_messages: Vec<String>,
}

impl NvcViewerApp {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let pipeline =
            SignalPipeline::from_config(&config).context("invalid pipeline configuration")?;
        Ok(Self {
            config,
            pipeline,
            folder: None,
            archives: Vec::new(),
            selected: None,
            session: None,
            reset_view: false,
            span: SpanSelection::default(),
            span_toggle: false,
            span_revision: 0,
            view_x_range: (0.0, 1.0),
            log_messages: vec!["Select a folder:".to_owned()],
        })
    }

    fn log(&mut self, msg: &str) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > LOG_LINES {
            self.log_messages.remove(0);
        }
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: ViewerAction) {
        match action {
            ViewerAction::BrowseFolder => {
                let folder = rfd::FileDialog::new()
                    .set_title("Select Folder")
                    .pick_folder();
                if let Some(folder) = folder {
                    self.open_folder(folder);
                }
            }
            ViewerAction::SelectFile(idx) => self.select_file(idx),
            ViewerAction::ToggleSpan(on) => {
                self.span_toggle = on;
                if on {
                    let (lo, hi) = self.view_x_range;
                    self.span.show((lo + hi) / 2.0, self.config.initial_span_width_s);
                } else {
                    self.span.hide();
                }
            }
            ViewerAction::CopySpanTimes => {
                let Some(span) = self.span.span() else {
                    return;
                };
                let text = format_span_times(span);
                self.copy_to_clipboard(ctx, text);
            }
            ViewerAction::CopyMedianDiff => {
                let (Some(span), Some(session)) = (self.span.span(), &self.session) else {
                    return;
                };
                match session.median_diffs(span, &self.pipeline) {
                    Ok(diffs) => self.copy_to_clipboard(ctx, format_median_diffs(diffs)),
                    Err(err) => {
                        log::warn!("median peak-trough diff failed: {err}");
                        self.log(&format!("Cannot compute diff: {err}"));
                    }
                }
            }
            ViewerAction::ExportPng => {
                if let Err(err) = self.export_png() {
                    log::error!("{err:#}");
                    self.log(&format!("Export failed: {err:#}"));
                }
            }
        }
    }

    fn open_folder(&mut self, folder: PathBuf) {
        match list_archives(&folder) {
            Ok(entries) => {
                log::info!("{} archives in {}", entries.len(), folder.display());
                self.log(&format!("{} file(s) in {}", entries.len(), folder.display()));
                self.archives = entries;
                self.folder = Some(folder);
                self.selected = None;
                self.session = None;
                // Populating the list selects its first entry.
                if !self.archives.is_empty() {
                    self.select_file(0);
                }
            }
            Err(err) => {
                log::error!("cannot list {}: {err}", folder.display());
                self.log(&format!("Cannot read folder: {err}"));
            }
        }
    }

    fn select_file(&mut self, idx: usize) {
        let Some(entry) = self.archives.get(idx).cloned() else {
            return;
        };
        self.selected = Some(idx);
        self.span_toggle = false;
        self.span.hide();
        // Drop the old session first so a failed load leaves nothing plotted.
        self.session = None;
        match Session::load(&entry.path, &self.config, &self.pipeline) {
            Ok(session) => {
                self.log(&format!("Loaded {}", entry.label()));
                self.session = Some(session);
                self.reset_view = true;
            }
            Err(err) => {
                log::error!("{err:#}");
                self.log(&format!("Error: {err:#}"));
            }
        }
    }

    fn copy_to_clipboard(&mut self, ctx: &egui::Context, text: String) {
        log::info!("copied to clipboard: {text}");
        self.log(&format!("Copied {text}"));
        ctx.output_mut(|o| o.copied_text = text);
    }

    fn export_png(&mut self) -> Result<()> {
        let Some(session) = &self.session else {
            return Ok(());
        };
        let default_name = format!("{}.png", session.file_name().trim_end_matches(".npz"));
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(default_name)
            .save_file()
        else {
            return Ok(());
        };
        let png = render_channels_png(&session.channels, self.span.span(), &PlotStyle::default())?;
        std::fs::write(&path, png).with_context(|| format!("writing {}", path.display()))?;
        self.log(&format!("Saved {}", path.display()));
        Ok(())
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui, actions: &mut Vec<ViewerAction>) {
        ui.horizontal(|ui| {
            let mut toggle = self.span_toggle;
            if ui.toggle_value(&mut toggle, "Toggle Span Selector").clicked() {
                actions.push(ViewerAction::ToggleSpan(toggle));
            }
            if ui.button("Copy Span Times").clicked() {
                actions.push(ViewerAction::CopySpanTimes);
            }
            if ui.button("Copy Median Peak-Trough Diff").clicked() {
                actions.push(ViewerAction::CopyMedianDiff);
            }
            if ui
                .add_enabled(self.session.is_some(), egui::Button::new("Export PNG"))
                .clicked()
            {
                actions.push(ViewerAction::ExportPng);
            }
            if let Some(span) = self.span.span() {
                let text = format!("Span: {:.2} – {:.2} s", span.start(), span.end());
                ui.label(egui::RichText::new(text).color(Color32::LIGHT_BLUE));
            }
        });
    }

    fn draw_channel_plot(&mut self, ui: &mut egui::Ui, id: PlotId, height: f32) {
        let Some(session) = &self.session else {
            return;
        };
        let idx = id.channel_index();
        let channel = &session.channels[idx];
        let raw = &session.raw_traces[idx];
        let (smooth_color, marker) = match id {
            PlotId::Electrode1 => (Color32::YELLOW, MarkerShape::Circle),
            PlotId::Electrode2 => (Color32::GREEN, MarkerShape::Cross),
        };
        let span = self.span.span();
        let dragging_here = self.span.drag().map(|d| d.origin) == Some(id);

        ui.label(egui::RichText::new(&channel.label).strong());
        let mut plot = Plot::new(id)
            .height(height)
            .legend(Legend::default())
            .link_axis(LINK_GROUP, true, false)
            .link_cursor(LINK_GROUP, true, false)
            // The primary drag edits the span while one is shown.
            .allow_drag(!self.span.is_active());
        if self.reset_view {
            plot = plot.reset();
        }
        let response = plot.show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(raw.clone()))
                    .name("Raw")
                    .color(Color32::from_rgba_unmultiplied(128, 128, 128, 40)),
            );
            plot_ui.line(
                Line::new(PlotPoints::from(channel.points()))
                    .name("Smoothed")
                    .color(smooth_color),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(channel.peak_points()))
                    .name("Peaks")
                    .shape(marker)
                    .radius(3.0)
                    .color(Color32::RED),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(channel.trough_points()))
                    .name("Troughs")
                    .shape(marker)
                    .radius(3.0)
                    .color(Color32::from_rgb(60, 120, 255)),
            );
            let bounds = plot_ui.plot_bounds();
            if let Some(span) = span {
                let (y_min, y_max) = (bounds.min()[1], bounds.max()[1]);
                let band = Color32::from_rgba_unmultiplied(100, 100, 255, 50);
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![[span.start(), y_max], [span.end(), y_max]]))
                        .color(band)
                        .fill(y_min as f32),
                );
                let edge = if dragging_here { Color32::WHITE } else { Color32::LIGHT_BLUE };
                plot_ui.vline(VLine::new(span.start()).color(edge).width(1.5));
                plot_ui.vline(VLine::new(span.end()).color(edge).width(1.5));
            }
            (bounds, plot_ui.pointer_coordinate())
        });
        let (bounds, pointer) = response.inner;
        if id == PlotId::Electrode1 {
            self.view_x_range = (bounds.min()[0], bounds.max()[0]);
        }
        let plot_response = &response.response;
        if let Some(pointer) = pointer {
            let tolerance = bounds.width() * 0.01;
            if plot_response.drag_started() {
                self.span.begin_drag(id, pointer.x, tolerance);
            } else if plot_response.dragged() {
                self.span.drag_to(id, pointer.x);
            }
        }
        if plot_response.drag_released() {
            self.span.end_drag(id);
        }
    }
}

impl eframe::App for NvcViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();

        egui::SidePanel::left("L").min_width(260.0).show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("NVC Analysis");
            ui.separator();

            if ui.button("Browse").clicked() {
                actions.push(ViewerAction::BrowseFolder);
            }
            match &self.folder {
                Some(folder) => ui.label(folder.display().to_string()),
                None => ui.label("No folder selected."),
            };

            let current = self
                .selected
                .and_then(|i| self.archives.get(i))
                .map(ArchiveEntry::label)
                .unwrap_or_default();
            egui::ComboBox::from_id_source("file_dropdown")
                .width(240.0)
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for (i, entry) in self.archives.iter().enumerate() {
                        if ui
                            .selectable_label(self.selected == Some(i), entry.label())
                            .clicked()
                            && self.selected != Some(i)
                        {
                            actions.push(ViewerAction::SelectFile(i));
                        }
                    }
                });

            if let Some(session) = &self.session {
                ui.add_space(10.0);
                ui.label(format!(
                    "{} samples @ {} Hz ({:.1} s)",
                    session.recording.len(),
                    session.recording.sampling_frequency_hz,
                    session.recording.duration_seconds()
                ));
            }

            ui.add_space(10.0);
            ui.separator();
            egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
                for m in &self.log_messages {
                    ui.monospace(m);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_toolbar(ui, &mut actions);
            ui.separator();
            if self.session.is_none() {
                ui.label("Select a file to plot.");
                return;
            }
            let height = (ui.available_height() / 2.0 - 30.0).max(120.0);
            for id in PlotId::ALL {
                self.draw_channel_plot(ui, id, height);
            }
            self.reset_view = false;
        });

        for action in actions {
            self.handle_action(ctx, action);
        }

        if self.span.revision() != self.span_revision {
            self.span_revision = self.span.revision();
            match self.span.span() {
                Some(span) => log::debug!("span {:.3}..{:.3} s", span.start(), span.end()),
                None => log::debug!("span hidden"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clipboard(ctx: &egui::Context) -> String {
        ctx.output(|o| o.copied_text.clone())
    }

    #[test]
    fn actions_without_file_or_span_do_nothing() {
        let ctx = egui::Context::default();
        let mut app = NvcViewerApp::new(PipelineConfig::default()).unwrap();
        let before = app.log_messages.clone();
        for action in [
            ViewerAction::CopyMedianDiff,
            ViewerAction::CopySpanTimes,
            ViewerAction::ExportPng,
        ] {
            app.handle_action(&ctx, action);
        }
        assert_eq!(app.log_messages, before);
        assert!(clipboard(&ctx).is_empty());
    }

    #[test]
    fn span_times_copy_without_a_file() {
        let ctx = egui::Context::default();
        let mut app = NvcViewerApp::new(PipelineConfig::default()).unwrap();
        app.view_x_range = (2.0, 8.0);
        app.handle_action(&ctx, ViewerAction::ToggleSpan(true));
        app.handle_action(&ctx, ViewerAction::CopySpanTimes);
        assert_eq!(clipboard(&ctx), "4.50,5.50");

        // No session: the diff stays a no-op even with a span.
        let before = app.log_messages.clone();
        app.handle_action(&ctx, ViewerAction::CopyMedianDiff);
        assert_eq!(app.log_messages, before);
        assert_eq!(clipboard(&ctx), "4.50,5.50");
    }

    #[test]
    fn toggling_off_clears_the_span() {
        let ctx = egui::Context::default();
        let mut app = NvcViewerApp::new(PipelineConfig::default()).unwrap();
        app.handle_action(&ctx, ViewerAction::ToggleSpan(true));
        assert!(app.span.is_active());
        app.handle_action(&ctx, ViewerAction::ToggleSpan(false));
        assert!(app.span.span().is_none());
        assert!(!app.span_toggle);
    }
}
