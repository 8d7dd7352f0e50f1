//! Application state and event handling
//!
//! Central state machine: events come in, state updates, actions go out.
//! Long operations are never run here; they are returned as [`Action`]s for
//! the main loop to spawn, and their results come back as [`AppEvent`]s.

use crate::commands::{Command, is_command, parse_command};
use crate::config::ConnectionConfig;
use crate::error::{CycleError, DbResult, ModelResult, SessionError};
use crate::pipeline::CycleReport;
use crate::session::Session;
use crate::ui::ComponentAction;
use crate::ui::connection_dialog::{ConnectionDialog, DialogAction};
use crate::ui::input::TextInput;
use crate::ui::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Main application state
pub struct App {
    /// Workflow state shared by every operation
    pub session: Session,

    /// Which panel currently has focus
    pub focus: PanelFocus,

    /// Focus before the connection dialog was opened (to restore on Escape)
    pub previous_focus: PanelFocus,

    /// UI Components
    pub search_input: TextInput,
    pub question_input: TextInput,
    pub connection_dialog: ConnectionDialog,

    /// Result of the last successful cycle
    pub last_report: Option<CycleReport>,

    /// Last question and its answer
    pub answer: AnswerState,

    /// UI theme (created once, reused every frame)
    pub theme: Theme,

    /// Status message to display
    pub status_message: Option<StatusMessage>,

    /// Advanced on every tick while work is in flight
    pub spinner_frame: usize,

    /// Model name shown in the answer panel title
    pub model_name: String,

    /// Whether the application is running
    pub running: bool,
}

/// Panel focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelFocus {
    Search,
    Question,
    ConnectionDialog,
}

/// Status message with severity level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub message: String,
    pub level: StatusLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// What the answer panel shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnswerState {
    #[default]
    Empty,
    Pending {
        question: String,
    },
    Answered {
        question: String,
        text: String,
    },
    Failed {
        question: String,
        error: String,
    },
}

/// Application events from the event loop
#[derive(Debug)]
pub enum AppEvent {
    /// Keyboard input event
    Key(KeyEvent),
    /// Bracketed paste event
    Paste(String),
    /// Terminal resize event
    Resize,
    /// Animation tick
    Tick,
    /// Schema text loaded after connecting
    SchemaPrimed {
        generation: u64,
        result: DbResult<String>,
    },
    /// Fetch → rank → store cycle finished
    CycleFinished(Result<CycleReport, CycleError>),
    /// Model answer arrived (or failed)
    AnswerReady(ModelResult<String>),
}

/// Actions returned by event handlers for the main loop to execute
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// Prime the schema for a newly adopted connection
    Connect {
        config: ConnectionConfig,
        generation: u64,
    },
    /// Run one fetch cycle
    RunCycle {
        config: ConnectionConfig,
        query: String,
    },
    /// Ask the model one question
    Ask { question: String, schema: String },
    Quit,
    None,
}

pub const HELP_TEXT: &str = "Enter=submit  Tab=switch input  Ctrl+O=connect  /clear  /help  Ctrl+Q=quit";

impl App {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            focus: PanelFocus::Search,
            previous_focus: PanelFocus::Search,
            search_input: TextInput::new(),
            question_input: TextInput::new(),
            connection_dialog: ConnectionDialog::new(),
            last_report: None,
            answer: AnswerState::Empty,
            theme: Theme::default(),
            status_message: None,
            spinner_frame: 0,
            model_name: String::new(),
            running: true,
        }
    }

    pub fn with_model_name(mut self, name: &str) -> Self {
        self.model_name = name.to_string();
        self
    }

    /// Handle an application event and return resulting action
    pub fn handle_event(&mut self, event: AppEvent) -> Action {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Paste(data) => {
                match self.focus {
                    PanelFocus::Search => self.search_input.insert_text(&data),
                    PanelFocus::Question => self.question_input.insert_text(&data),
                    PanelFocus::ConnectionDialog => self.connection_dialog.paste(&data),
                }
                Action::None
            }
            AppEvent::Resize => Action::None,
            AppEvent::Tick => {
                if self.is_busy() {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                }
                Action::None
            }
            AppEvent::SchemaPrimed { generation, result } => {
                self.schema_primed(generation, result);
                Action::None
            }
            AppEvent::CycleFinished(result) => {
                self.cycle_finished(result);
                Action::None
            }
            AppEvent::AnswerReady(result) => {
                self.answer_ready(result);
                Action::None
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            return Action::Quit;
        }

        self.status_message = None;

        // Connection dialog intercepts all keys when visible
        if self.focus == PanelFocus::ConnectionDialog {
            return match self.connection_dialog.handle_key(key) {
                DialogAction::Connect(config) => {
                    self.connection_dialog.hide();
                    self.focus = self.previous_focus;
                    self.connect(config)
                }
                DialogAction::Dismissed => {
                    self.connection_dialog.hide();
                    self.focus = self.previous_focus;
                    Action::None
                }
                DialogAction::Consumed => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('o') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.request_reconnect();
                return Action::None;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.cycle_focus();
                return Action::None;
            }
            _ => {}
        }

        let submitted = match self.focus {
            PanelFocus::Search => self.search_input.handle_key(key),
            PanelFocus::Question => self.question_input.handle_key(key),
            PanelFocus::ConnectionDialog => ComponentAction::Ignored,
        };

        match submitted {
            ComponentAction::Submit(text) if is_command(&text) => {
                self.active_input_mut().clear();
                match parse_command(&text) {
                    Ok(cmd) => self.execute_command(cmd),
                    Err(e) => {
                        self.set_status(e.to_string(), StatusLevel::Error);
                        Action::None
                    }
                }
            }
            ComponentAction::Submit(text) => match self.focus {
                PanelFocus::Search => self.start_cycle(text.trim().to_string()),
                PanelFocus::Question => self.ask(text.trim().to_string()),
                PanelFocus::ConnectionDialog => Action::None,
            },
            ComponentAction::Consumed | ComponentAction::Ignored => Action::None,
        }
    }

    fn active_input_mut(&mut self) -> &mut TextInput {
        match self.focus {
            PanelFocus::Question => &mut self.question_input,
            _ => &mut self.search_input,
        }
    }

    fn execute_command(&mut self, command: Command) -> Action {
        match command {
            Command::Connect => {
                self.request_reconnect();
                Action::None
            }
            Command::Clear => {
                self.last_report = None;
                self.answer = AnswerState::Empty;
                Action::None
            }
            Command::Help => {
                self.set_status(HELP_TEXT.to_string(), StatusLevel::Info);
                Action::None
            }
            Command::Quit => Action::Quit,
        }
    }

    /// Adopt a connection config and ask for the schema to be primed
    pub fn connect(&mut self, config: ConnectionConfig) -> Action {
        match self.session.connect(config.clone()) {
            Ok(generation) => {
                self.connection_dialog.prefill(&config);
                self.set_status(
                    format!("Connecting to {}...", config.display_name()),
                    StatusLevel::Info,
                );
                Action::Connect { config, generation }
            }
            Err(e) => {
                self.set_status(e.to_string(), StatusLevel::Error);
                Action::None
            }
        }
    }

    fn schema_primed(&mut self, generation: u64, result: DbResult<String>) {
        match result {
            Ok(text) => {
                // A stale prime (a store happened meanwhile) is simply dropped
                self.session.apply_schema(text, generation);
                self.set_status(
                    "Database connected successfully!".to_string(),
                    StatusLevel::Success,
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "schema priming failed");
                self.set_status(format!("Could not connect: {}", e), StatusLevel::Error);
            }
        }
    }

    fn start_cycle(&mut self, query: String) -> Action {
        match self.session.begin_cycle() {
            Ok(config) => {
                self.set_status(
                    format!("Fetching top brands for '{}'...", query),
                    StatusLevel::Info,
                );
                Action::RunCycle { config, query }
            }
            Err(e) => {
                self.set_status(e.to_string(), StatusLevel::Error);
                Action::None
            }
        }
    }

    fn cycle_finished(&mut self, result: Result<CycleReport, CycleError>) {
        self.session.finish_cycle(&result);
        match result {
            Ok(report) => {
                match report.schema {
                    Ok(_) => self.set_status(
                        "Top brands stored in database!".to_string(),
                        StatusLevel::Success,
                    ),
                    Err(ref e) => self.set_status(
                        format!("Top brands stored, but the schema could not be read: {}", e),
                        StatusLevel::Warning,
                    ),
                }
                self.last_report = Some(report);
                self.focus = PanelFocus::Question;
            }
            Err(e) => self.set_status(cycle_error_text(&e), StatusLevel::Error),
        }
    }

    fn ask(&mut self, question: String) -> Action {
        if question.is_empty() {
            return Action::None;
        }
        match self.session.begin_question() {
            Ok(schema) => {
                self.question_input.clear();
                self.answer = AnswerState::Pending {
                    question: question.clone(),
                };
                Action::Ask { question, schema }
            }
            Err(e) => {
                self.set_status(e.to_string(), StatusLevel::Error);
                Action::None
            }
        }
    }

    fn answer_ready(&mut self, result: ModelResult<String>) {
        self.session.finish_question();
        let question = match std::mem::take(&mut self.answer) {
            AnswerState::Pending { question } => question,
            _ => String::new(),
        };
        self.answer = match result {
            Ok(text) => AnswerState::Answered { question, text },
            Err(e) => {
                self.set_status(e.to_string(), StatusLevel::Error);
                AnswerState::Failed {
                    question,
                    error: e.to_string(),
                }
            }
        };
    }

    /// Whether a fetch or a question is in flight
    pub fn is_busy(&self) -> bool {
        self.session.cycle_running() || self.session.question_pending()
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Search => PanelFocus::Question,
            PanelFocus::Question => PanelFocus::Search,
            other => other,
        };
    }

    pub fn set_status(&mut self, message: String, level: StatusLevel) {
        self.status_message = Some(StatusMessage { message, level });
    }

    /// Open the connection dialog unless work against the current connection is in flight
    fn request_reconnect(&mut self) {
        if self.is_busy() {
            self.set_status(SessionError::Busy.to_string(), StatusLevel::Warning);
            return;
        }
        self.show_connection_dialog();
    }

    /// Show the connection dialog
    pub fn show_connection_dialog(&mut self) {
        if self.focus != PanelFocus::ConnectionDialog {
            self.previous_focus = self.focus;
        }
        self.focus = PanelFocus::ConnectionDialog;
        self.connection_dialog.show();
    }
}

/// Status text for a failed cycle, with the fetch failure appended when there was one
fn cycle_error_text(err: &CycleError) -> String {
    match err {
        CycleError::NoProducts(Some(source)) => format!("{} ({})", err, source),
        _ => err.to_string(),
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
