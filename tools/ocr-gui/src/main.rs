use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use eframe::egui::{self, Button, CentralPanel, Color32, ScrollArea, Spinner, TextEdit};
use eframe::NativeOptions;
use rfd::FileDialog;
use serde::{Deserialize, Serialize};

use ocr_client::client::{CancelToken, ClientError, OcrClient};
use ocr_client::config::{default_client_config, OcrClientConfig, OCR_CLIENT_DEFAULTS};
use ocr_model::ProcessedPage;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let options = NativeOptions::default();
    eframe::run_native(
        "Wikimedia OCR",
        options,
        Box::new(|_cc| Box::new(AppState::default())),
    )
}

/// A submission running on a worker thread.
///
/// Outcomes arriving for an older epoch (or after Cancel) are discarded, so
/// a late settlement can never clobber the state of a newer submission.
struct SubmitTask {
    rx: Receiver<Result<Vec<ProcessedPage>, ClientError>>,
    cancel: CancelToken,
    epoch: u64,
    started: Instant,
}

struct AppState {
    file_path: String,
    endpoint: String,
    timeout_secs: String,
    result: Vec<ProcessedPage>,
    error: Option<String>,
    status: String,
    task: Option<SubmitTask>,
    submit_epoch: u64,
}

/// On-disk GUI settings (Load/Save Config dialogs).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OcrGuiConfig {
    endpoint: String,
    timeout_secs: u64,
}

impl Default for AppState {
    fn default() -> Self {
        let defaults = default_client_config();
        Self {
            file_path: String::new(),
            endpoint: defaults.endpoint,
            timeout_secs: defaults.timeout.as_secs().to_string(),
            result: Vec::new(),
            error: None,
            status: String::new(),
            task: None,
            submit_epoch: 0,
        }
    }
}

impl AppState {
    fn processing(&self) -> bool {
        self.task.is_some()
    }

    fn select_file(&mut self) {
        if let Some(path) = FileDialog::new().add_filter("PDF", &["pdf"]).pick_file() {
            self.file_path = path.display().to_string();
            // A fresh selection clears a stale error right away.
            self.error = None;
        }
    }

    fn client_config(&self) -> OcrClientConfig {
        let mut config = default_client_config();
        let endpoint = self.endpoint.trim();
        if !endpoint.is_empty() {
            config.endpoint = endpoint.to_string();
        }
        if let Ok(secs) = self.timeout_secs.trim().parse::<u64>() {
            if secs > 0 {
                config.timeout = Duration::from_secs(secs);
            }
        }
        config
    }

    fn submit(&mut self) {
        // Checked here too, not only via the disabled button.
        let path = self.file_path.trim().to_string();
        if path.is_empty() {
            self.error = Some("Please select a PDF file".into());
            return;
        }

        self.error = None;
        self.submit_epoch += 1;
        let epoch = self.submit_epoch;
        let cancel = CancelToken::new();
        let config = self.client_config();
        let (tx, rx) = mpsc::channel();
        self.task = Some(SubmitTask { rx, cancel, epoch, started: Instant::now() });
        self.status = "Submitting...".into();

        thread::spawn(move || {
            let outcome =
                OcrClient::new(config).and_then(|client| client.process_pdf(Path::new(&path)));
            let _ = tx.send(outcome);
        });
    }

    fn cancel_submit(&mut self) {
        if let Some(task) = &self.task {
            task.cancel.cancel();
        }
        // Bump the epoch so the settlement, whenever it lands, is stale.
        self.submit_epoch += 1;
        self.task = None;
        self.status = "Canceled".into();
    }

    fn poll_task(&mut self) {
        let task = match self.task.take() {
            Some(task) => task,
            None => return,
        };
        match task.rx.try_recv() {
            Ok(outcome) => {
                if task.epoch != self.submit_epoch || task.cancel.is_canceled() {
                    self.status = "Discarded a stale response".into();
                    return;
                }
                let elapsed = task.started.elapsed().as_secs_f32();
                match outcome {
                    Ok(pages) => {
                        self.status = format!("Processed {} page(s) in {elapsed:.1}s", pages.len());
                        self.result = pages;
                    }
                    Err(err) => {
                        // The previous result stays visible on failure.
                        self.status = format!("Request failed after {elapsed:.1}s");
                        self.error = Some(err.user_message());
                    }
                }
            }
            Err(TryRecvError::Empty) => {
                self.task = Some(task);
            }
            Err(TryRecvError::Disconnected) => {
                self.error = Some("An error occurred".into());
                self.status.clear();
            }
        }
    }

    fn load_config_via_dialog(&mut self) {
        if let Some(path) = FileDialog::new().add_filter("JSON", &["json"]).pick_file() {
            match std::fs::read_to_string(&path) {
                Ok(body) => match serde_json::from_str::<OcrGuiConfig>(&body) {
                    Ok(cfg) => {
                        self.endpoint = cfg.endpoint;
                        self.timeout_secs = cfg.timeout_secs.to_string();
                        self.status = format!("Loaded config from {}", path.display());
                    }
                    Err(_) => {
                        self.status = "Load config failed: invalid JSON structure".into();
                    }
                },
                Err(e) => {
                    self.status = format!("Load config failed: {e}");
                }
            }
        }
    }

    fn save_config_via_dialog(&mut self) {
        let cfg = OcrGuiConfig {
            endpoint: self.endpoint.trim().to_string(),
            timeout_secs: self
                .timeout_secs
                .trim()
                .parse()
                .unwrap_or(OCR_CLIENT_DEFAULTS.timeout_secs),
        };
        if let Some(path) = FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("ocr-gui.json")
            .save_file()
        {
            match serde_json::to_string_pretty(&cfg) {
                Ok(body) => match std::fs::write(&path, body) {
                    Ok(()) => {
                        self.status = format!("Saved config to {}", path.display());
                    }
                    Err(e) => {
                        self.status = format!("Save config failed: {e}");
                    }
                },
                Err(e) => {
                    self.status = format!("Serialize config failed: {e}");
                }
            }
        }
    }
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_task();

        CentralPanel::default().show(ctx, |ui| {
            ui.heading("Wikimedia OCR");
            ui.separator();

            let processing = self.processing();

            ui.add_enabled_ui(!processing, |ui| {
                ui.horizontal(|ui| {
                    ui.label("PDF file:");
                    let resp =
                        ui.add(TextEdit::singleline(&mut self.file_path).desired_width(400.0));
                    if resp.changed() {
                        self.error = None;
                    }
                    if ui.button("Choose File").clicked() {
                        self.select_file();
                    }
                });

                ui.collapsing("Service settings", |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Endpoint");
                        ui.add(TextEdit::singleline(&mut self.endpoint).desired_width(400.0));
                    });
                    ui.horizontal(|ui| {
                        ui.label("Timeout (s)");
                        ui.add(TextEdit::singleline(&mut self.timeout_secs).desired_width(60.0));
                    });
                    ui.horizontal(|ui| {
                        if ui.button("Load Config").clicked() {
                            self.load_config_via_dialog();
                        }
                        if ui.button("Save Config").clicked() {
                            self.save_config_via_dialog();
                        }
                    });
                });
            });

            ui.horizontal(|ui| {
                let can_submit = !processing && !self.file_path.trim().is_empty();
                let label = if processing { "Processing..." } else { "Process PDF" };
                if ui.add_enabled(can_submit, Button::new(label)).clicked() {
                    self.submit();
                }
                if processing {
                    ui.add(Spinner::new());
                    if ui.button("Cancel").clicked() {
                        self.cancel_submit();
                    }
                }
            });

            if let Some(err) = &self.error {
                ui.colored_label(Color32::RED, err);
            }

            ui.separator();
            if !self.result.is_empty() {
                ui.heading("Processed Pages");
                ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                    for page in &self.result {
                        ui.strong(format!("Page {}", page.page_number));
                        ui.monospace(&page.text);
                        ui.separator();
                    }
                });
            }

            if !self.status.is_empty() {
                ui.separator();
                ui.label(&self.status);
            }
        });
    }
}
