//! # Fretboard Trainer - Guitar Ear Training GUI
//!
//! The desktop front end of the fretboard trainer. A question names a note and a
//! string; the player finds it on the guitar and the live pitch tracker decides
//! whether it was played.
//!
//! ## Architecture
//! - **Main Thread**: Iced GUI application with dark theme, owns the practice round
//! - **Tracking Thread**: [`TrackingWorker`] owning the microphone and the pitch tracker
//! - **Communication**: Crossbeam channel of timestamped notes, drained every tick
//! - **Updates**: 60 FPS continuous updates via subscription system

mod ui;

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use fretboard_core::scales::{self, ALL_NOTES};
use fretboard_core::{
    Feedback, NoteInfo, PracticeRound, Question, QuestionGenerator, TrackedNote,
    TrackingWorker, TrainerConfig, YinEstimator,
};
use iced::{Element, Subscription, Theme};
use tracing_subscriber::EnvFilter;
use ui::main_display::create_main_view;

/// Settings file read at startup and written by "Save Settings".
const SETTINGS_PATH: &str = "fretboard_settings.json";

/// How long a confirmed answer stays on screen before the next question.
const AUTO_ADVANCE_DELAY: Duration = Duration::from_secs(1);

pub fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("[MAIN] Starting Fretboard Trainer...");
    let result = iced::application("Fretboard Trainer", TrainerApp::update, TrainerApp::view)
        .subscription(TrainerApp::subscription)
        .theme(TrainerApp::theme)
        .run();
    tracing::info!("[MAIN] Application finished with result: {:?}", result);
    result
}

#[derive(Debug, Clone)]
pub enum Message {
    // Practice flow
    NextQuestion,
    ToggleListening,
    ToggleHint,

    // Question filters
    ScaleSelected(&'static str),
    StringSelected(StringChoice),

    SaveSettings,

    // Continuous update message
    Tick,
}

/// String filter as offered in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringChoice {
    Any,
    Only(usize),
}

impl StringChoice {
    pub const ALL: [StringChoice; 7] = [
        StringChoice::Any,
        StringChoice::Only(0),
        StringChoice::Only(1),
        StringChoice::Only(2),
        StringChoice::Only(3),
        StringChoice::Only(4),
        StringChoice::Only(5),
    ];

    fn index(self) -> Option<usize> {
        match self {
            StringChoice::Any => None,
            StringChoice::Only(i) => Some(i),
        }
    }
}

impl std::fmt::Display for StringChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StringChoice::Any => f.write_str("Any string"),
            StringChoice::Only(i) => match fretboard_core::guitar::guitar_string(*i) {
                Some(string) => f.write_str(string.label),
                None => write!(f, "String {}", i + 1),
            },
        }
    }
}

/// Everything the view needs, rebuilt from the round after every change.
#[derive(Debug, Clone)]
pub struct AppDisplayData {
    pub listening: bool,
    pub status: Option<String>,

    pub question: Question,
    pub current_note: NoteInfo,
    pub feedback: Feedback,
    pub show_hint: bool,
    pub solved: u32,

    pub scale_name: &'static str,
    pub string_choice: StringChoice,
}

struct TrainerApp {
    config: TrainerConfig,
    worker: Option<TrackingWorker>,
    note_sender: Sender<TrackedNote>,
    note_receiver: Receiver<TrackedNote>,

    round: PracticeRound,
    // wall-clock moment the current question was confirmed, for auto-advance
    confirmed_instant: Option<Instant>,

    display_data: AppDisplayData,
}

impl Default for TrainerApp {
    fn default() -> Self {
        let config = match TrainerConfig::load(SETTINGS_PATH) {
            Ok(config) => {
                tracing::info!("[MAIN] Loaded settings from {}", SETTINGS_PATH);
                config
            }
            Err(e) => {
                tracing::warn!("[MAIN] Using default settings: {:#}", e);
                TrainerConfig::default()
            }
        };

        let (note_sender, note_receiver) = crossbeam_channel::unbounded();
        let mut round = PracticeRound::new(config.matching, QuestionGenerator::new());
        let question = round.next_question();

        let mut app = Self {
            config,
            worker: None,
            note_sender,
            note_receiver,
            round,
            confirmed_instant: None,
            display_data: AppDisplayData {
                listening: false,
                status: None,
                question,
                current_note: NoteInfo::empty(),
                feedback: Feedback {
                    correct: false,
                    detected_fret: None,
                },
                show_hint: false,
                solved: 0,
                scale_name: ALL_NOTES.name,
                string_choice: StringChoice::Any,
            },
        };
        app.start_listening();
        app
    }
}

impl TrainerApp {
    fn start_listening(&mut self) {
        if self.worker.is_some() {
            return;
        }
        match TrackingWorker::spawn_with_capture(
            self.config,
            YinEstimator::default(),
            self.note_sender.clone(),
        ) {
            Ok(worker) => {
                tracing::info!("[MAIN] Listening at {} Hz", worker.sample_rate());
                self.worker = Some(worker);
                // the new session restarts its clock at zero
                self.round.restart();
                self.confirmed_instant = None;
                self.display_data.listening = true;
                self.display_data.status = None;
            }
            Err(e) => {
                tracing::error!("[MAIN] Could not start audio capture: {:#}", e);
                self.display_data.listening = false;
                self.display_data.status = Some(format!("No audio input: {e}"));
            }
        }
    }

    fn stop_listening(&mut self) {
        if let Some(mut worker) = self.worker.take() {
            worker.stop();
        }
        // drop notes from the finished session
        while self.note_receiver.try_recv().is_ok() {}
        self.display_data.listening = false;
        self.display_data.current_note = NoteInfo::empty();
    }

    fn next_question(&mut self) {
        let question = self.round.next_question();
        self.confirmed_instant = None;
        self.display_data.question = question;
        self.display_data.feedback = Feedback {
            correct: false,
            detected_fret: None,
        };
    }

    fn update(&mut self, message: Message) {
        match message {
            Message::NextQuestion => self.next_question(),
            Message::ToggleListening => {
                if self.worker.is_some() {
                    self.stop_listening();
                } else {
                    self.start_listening();
                }
            }
            Message::ToggleHint => {
                self.display_data.show_hint = !self.display_data.show_hint;
            }
            Message::ScaleSelected(name) => {
                let Some(scale) = scales::find_scale(name) else {
                    tracing::warn!("[MAIN] Unknown scale {}", name);
                    return;
                };
                tracing::info!("[MAIN] Practicing {}", scale.name);
                self.round.set_available_notes(scale.notes.clone());
                self.display_data.scale_name = scale.name;
                self.next_question();
            }
            Message::StringSelected(choice) => {
                if let Err(e) = self.round.set_available_string(choice.index()) {
                    tracing::warn!("[MAIN] {}", e);
                    return;
                }
                self.display_data.string_choice = choice;
                self.next_question();
            }
            Message::SaveSettings => match self.config.save(SETTINGS_PATH) {
                Ok(()) => tracing::info!("[MAIN] Settings saved to {}", SETTINGS_PATH),
                Err(e) => tracing::error!("[MAIN] Error saving settings: {:#}", e),
            },
            Message::Tick => self.on_tick(),
        }
    }

    fn on_tick(&mut self) {
        if self.worker.as_ref().is_some_and(|w| !w.is_running()) {
            tracing::warn!("[MAIN] Tracking thread stopped unexpectedly");
            self.stop_listening();
            self.display_data.status = Some("Audio input stopped".to_string());
        }

        let tracked: Vec<TrackedNote> = self.note_receiver.try_iter().collect();
        for TrackedNote { note, at } in tracked {
            let was_confirmed = self.round.confirmed_at().is_some();
            self.display_data.feedback = self.round.submit(&note, at);
            self.display_data.current_note = note;
            if !was_confirmed && self.round.confirmed_at().is_some() {
                self.display_data.solved += 1;
                self.confirmed_instant = Some(Instant::now());
            }
        }

        if self
            .confirmed_instant
            .is_some_and(|t| t.elapsed() >= AUTO_ADVANCE_DELAY)
        {
            self.next_question();
        }
    }

    fn view(&self) -> Element<'_, Message> {
        create_main_view(&self.display_data)
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::time::every(Duration::from_millis(16)).map(|_| Message::Tick)
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}
