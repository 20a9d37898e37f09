use clap::Parser;
use eframe::epi::{App, Frame};
use egui::{Button, Color32, CtxRef, RichText, ScrollArea, TextEdit};
use speaktome::talker::TtsService;
use speaktome::{Controller, FlushPolicy, ReadinessState, Settings};
use tracing::{error, info};

struct Main {
    controller: Controller<TtsService>,
    text: String,
}

impl Main {
    fn new(settings: &Settings) -> Self {
        let mut controller = Controller::new(
            TtsService::new(settings.install_command.clone()),
            settings.voice(),
        );
        if let Err(err) = controller.start() {
            error!(%err, "could not start voice data check");
        }
        Self {
            controller,
            text: String::new(),
        }
    }

    fn on_speak_pressed(&mut self) {
        self.controller.speak(&self.text, FlushPolicy::Flush);
    }

    fn on_clear_pressed(&mut self) {
        self.text.clear();
    }
}

impl App for Main {
    fn update(&mut self, ctx: &CtxRef, _frame: &Frame) {
        self.controller.poll();
        let state = self.controller.state();

        egui::CentralPanel::default().show(ctx, |ui| match state {
            ReadinessState::Uninitialized | ReadinessState::Initializing => {
                ui.vertical_centered_justified(|ui| {
                    ui.heading("Loading TTS...");
                });
            }
            ReadinessState::DataMissing => {
                ui.vertical_centered_justified(|ui| {
                    ui.heading(format!(
                        "No {} voice installed.",
                        self.controller.voice().locale.display_language()
                    ));
                    ui.label("Install one, then check again.");
                    if ui.button("Check again").clicked() {
                        if let Err(err) = self.controller.recheck() {
                            error!(%err, "recheck failed");
                        }
                    }
                });
            }
            ReadinessState::Failed => {
                ui.vertical_centered_justified(|ui| {
                    ui.heading("Error:");
                    ui.code(RichText::new("TTS instance not properly initialized").color(Color32::RED));
                });
            }
            ReadinessState::Ready | ReadinessState::ShutDown => {
                let enabled = state.controls_enabled();
                let speaking = self.controller.is_speaking();

                ui.horizontal(|ui| {
                    if ui.add_enabled(enabled, Button::new("Speak")).clicked() {
                        self.on_speak_pressed();
                    }
                    if ui.button("Clear").clicked() {
                        self.on_clear_pressed();
                    }

                    ui.separator();

                    ui.label("Status: ");
                    ui.label(match speaking {
                        true => "Speaking",
                        false => "Idle",
                    });
                });
                ui.separator();

                ScrollArea::vertical().show(ui, |ui| {
                    ui.add_enabled(
                        enabled,
                        TextEdit::multiline(&mut self.text)
                            .desired_width(f32::INFINITY)
                            .hint_text("Enter some text and press Speak"),
                    );
                });
            }
        });

        // Platform answers arrive on other threads; keep frames coming until they do.
        if matches!(state, ReadinessState::Uninitialized | ReadinessState::Initializing)
            || self.controller.is_speaking()
        {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self) {
        info!("exiting");
        self.controller.shutdown();
    }

    fn name(&self) -> &str {
        "SpeakToMe"
    }
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("speaktome=info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

fn main() {
    init_tracing();

    let settings = Settings::parse();
    if let Err(err) = settings.validate() {
        error!(%err, "invalid settings");
        std::process::exit(2);
    }
    info!(locale = %settings.locale, pitch = settings.pitch, rate = settings.rate, "starting");

    eframe::run_native(Box::new(Main::new(&settings)), eframe::NativeOptions::default());
}
