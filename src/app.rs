use crate::config::Config;
use crate::error::AppError;
use crate::events::terminal::Handler as TerminalEventHandler;
use crate::logger::{CustomLogger, LogBuffer};
use crate::state::State;
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::{Arc, Mutex};

pub type ConfigSaveSender = std::sync::mpsc::Sender<()>;
type ConfigSaveReceiver = std::sync::mpsc::Receiver<()>;

/// Oversees event processing, state management, and terminal output.
///
pub struct App {
    state: Arc<Mutex<State>>,
    config: Config,
}

/// Install the custom logger, forwarding every line into the buffer drained
/// by the state on each tick.
///
fn init_logger(level: LevelFilter, buffer: &LogBuffer) -> Result<(), AppError> {
    let logger = CustomLogger::new(level);
    let sink = Arc::clone(buffer);
    logger.set_log_callback(Box::new(move |line| {
        if let Ok(mut lines) = sink.lock() {
            lines.push(line);
        }
    }));
    log::set_boxed_logger(Box::new(logger)).map_err(|e| AppError::Logger(e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

fn terminal_error(e: io::Error) -> AppError {
    AppError::Terminal(e.to_string())
}

/// Copy the settings the user can change at runtime from state into config.
///
fn sync_config(config: &mut Config, state: &State) {
    config.theme_name = state.get_theme().name.clone();
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub fn start(config: Config) -> Result<()> {
        let log_buffer: LogBuffer = Arc::new(Mutex::new(Vec::new()));
        init_logger(config.level_filter(), &log_buffer)?;

        info!("Starting application...");
        let (config_save_tx, config_save_rx) = std::sync::mpsc::channel::<()>();
        let mut app = App {
            state: Arc::new(Mutex::new(State::new(&config, config_save_tx, log_buffer))),
            config,
        };
        app.start_config_saver(config_save_rx);
        app.start_ui()?;

        // Save config on exit
        {
            let state = app
                .state
                .lock()
                .map_err(|e| AppError::Other(format!("State lock poisoned: {}", e)))?;
            sync_config(&mut app.config, &state);
            if let Err(e) = app.config.save() {
                error!("Failed to save config on exit: {}", e);
            }
        }

        info!("Exiting application...");
        Ok(())
    }

    /// Start a thread to handle config save requests.
    ///
    fn start_config_saver(&self, receiver: ConfigSaveReceiver) {
        let state = Arc::clone(&self.state);
        let mut config = self.config.clone();
        std::thread::spawn(move || {
            while receiver.recv().is_ok() {
                // The UI thread holds the lock while drawing; a request that
                // races with it is picked up by the save on exit.
                if let Ok(state_guard) = state.try_lock() {
                    sync_config(&mut config, &state_guard);
                    if let Err(e) = config.save() {
                        error!("Failed to save config: {}", e);
                    }
                }
            }
        });
    }

    /// Begin the terminal event poll on a separate thread before starting the
    /// render loop on the main thread. Return the result following an exit
    /// request or unrecoverable error.
    ///
    fn start_ui(&mut self) -> Result<()> {
        debug!("Starting user interface on main thread...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(terminal_error)?;
        enable_raw_mode().map_err(terminal_error)?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(terminal_error)?;
        terminal.hide_cursor().map_err(terminal_error)?;

        let terminal_event_handler = TerminalEventHandler::new();
        let result = loop {
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(e) => break Err(AppError::Other(format!("State lock poisoned: {}", e)).into()),
            };
            if let Err(e) = terminal.draw(|frame| crate::ui::render(frame, &mut state)) {
                break Err(e.into());
            }
            match terminal_event_handler.handle_next(&mut state) {
                Ok(true) => (),
                Ok(false) => {
                    debug!("Received application exit request.");
                    break Ok(());
                }
                Err(e) => break Err(e),
            }
        };

        disable_raw_mode().map_err(terminal_error)?;
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen, DisableMouseCapture).map_err(terminal_error)?;
        terminal.show_cursor().map_err(terminal_error)?;

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_error_mapping() {
        let err = terminal_error(io::Error::new(io::ErrorKind::Other, "no tty"));
        assert!(matches!(err, AppError::Terminal(ref msg) if msg == "no tty"));
        assert!(err.to_string().contains("no tty"));
    }

    #[test]
    fn test_sync_config_copies_theme() {
        let (tx, _rx) = std::sync::mpsc::channel();
        let buffer: LogBuffer = Arc::new(Mutex::new(Vec::new()));
        let mut config = Config::new();
        let mut state = State::new(&config, tx, buffer);
        state.cycle_theme();
        sync_config(&mut config, &state);
        assert_eq!(config.theme_name, state.get_theme().name);
        assert_ne!(config.theme_name, "civic-light");
    }
}
