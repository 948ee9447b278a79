use crate::model::Model;
use crossterm::event::EventStream;
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use crossterm::cursor;
use datepick_core::{Action, Command};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

/// Why a [`Program`] could not start or stopped early.
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// Terminal setup, drawing, event reading or the log file failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The log file could not be installed as the tracing output.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// How a [`Program`] sets up the terminal and logging.
///
/// # Example
///
/// ```rust,ignore
/// use datepick::ProgramOptions;
///
/// let opts = ProgramOptions::default()
///     .with_title("Book a stay")
///     .with_log_file("datepick.log");
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Redraw rate cap, clamped to 1..=120.
    pub fps: u32,
    /// Render in the alternate screen (default: true).
    pub alt_screen: bool,
    pub title: Option<String>,
    /// Restore the terminal before a panic message prints (default: true).
    pub catch_panics: bool,
    /// Send `tracing` output here. Filtered by `RUST_LOG`, `info` when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            title: None,
            catch_panics: true,
            log_file: None,
        }
    }
}

impl ProgramOptions {
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_alt_screen(mut self, alt_screen: bool) -> Self {
        self.alt_screen = alt_screen;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }
}

/// Drives a [`Model`] on a real terminal until it returns
/// [`Command::quit()`].
///
/// Messages produced by commands go through an unbounded channel, so the
/// engine's deferred messages (such as the settle tick after a blur) are
/// handled after the events already queued.
///
/// # Example
///
/// ```rust,ignore
/// use datepick::{Program, ProgramError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let app = Program::<App>::new(())?.run().await?;
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    options: ProgramOptions,
    needs_redraw: bool,
    should_quit: bool,
}

impl<M: Model> Program<M> {
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        if let Some(path) = &options.log_file {
            init_logging(path)?;
        }

        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (model, init_cmd) = M::init(flags);
        let terminal = init_terminal(&options)?;

        let mut program = Self {
            model,
            terminal,
            msg_tx,
            msg_rx,
            options,
            needs_redraw: true,
            should_quit: false,
        };
        tracing::debug!("program initialized");
        program.execute_command(init_cmd);
        Ok(program)
    }

    /// Run until quit and return the final model.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let result = self.event_loop().await;
        tracing::debug!("shutting down");
        restore_terminal(self.options.alt_screen)?;
        result.map(|()| self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.render()?;

        let fps = self.options.fps.clamp(1, 120);
        let mut frame_interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut events = EventStream::new();

        loop {
            if self.should_quit {
                return Ok(());
            }

            tokio::select! {
                biased;

                Some(msg) = self.msg_rx.recv() => {
                    self.process_message(msg);
                    // Drain what is already queued before the next frame.
                    while let Ok(msg) = self.msg_rx.try_recv() {
                        self.process_message(msg);
                        if self.should_quit {
                            break;
                        }
                    }
                }

                event = events.next() => match event {
                    Some(Ok(event)) => {
                        if let Some(msg) = self.model.event(event) {
                            self.process_message(msg);
                        }
                    }
                    Some(Err(err)) => return Err(err.into()),
                    None => return Ok(()),
                },

                _ = frame_interval.tick() => {
                    if self.needs_redraw {
                        self.render()?;
                        self.needs_redraw = false;
                    }
                }
            }
        }
    }

    fn process_message(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.execute_command(cmd);
        self.needs_redraw = true;
    }

    fn execute_command(&mut self, cmd: Command<M::Message>) {
        if dispatch(cmd, &self.msg_tx) {
            self.should_quit = true;
        }
    }

    fn render(&mut self) -> Result<(), ProgramError> {
        self.terminal.draw(|frame| self.model.view(frame))?;
        Ok(())
    }
}

/// Queue every message in `cmd` in order. Returns whether it asked to quit.
fn dispatch<Msg: Send + 'static>(cmd: Command<Msg>, tx: &mpsc::UnboundedSender<Msg>) -> bool {
    let mut quit = false;
    for action in cmd.into_actions() {
        match action {
            Action::Message(msg) => {
                let _ = tx.send(msg);
            }
            Action::Quit => quit = true,
        }
    }
    quit
}

/// Install a `tracing` subscriber writing plain text to `path`.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Fails if a
/// global subscriber is already set.
pub fn init_logging(path: impl AsRef<Path>) -> Result<(), ProgramError> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| ProgramError::Logging(err.to_string()))
}

fn init_terminal(options: &ProgramOptions) -> Result<Terminal<CrosstermBackend<Stdout>>, ProgramError> {
    if options.catch_panics {
        use std::sync::Once;
        static HOOK_INSTALLED: Once = Once::new();
        let alt_screen = options.alt_screen;
        HOOK_INSTALLED.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = restore_terminal(alt_screen);
                original_hook(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut writer = stdout();
    if options.alt_screen {
        execute!(writer, EnterAlternateScreen)?;
    }
    if let Some(title) = &options.title {
        execute!(writer, SetTitle(title))?;
    }
    execute!(writer, cursor::Hide)?;
    Ok(Terminal::new(CrosstermBackend::new(writer))?)
}

fn restore_terminal(alt_screen: bool) -> io::Result<()> {
    // Keep going after individual failures so as much state as possible
    // is restored; the raw mode error is the one reported.
    let raw = disable_raw_mode();
    let mut writer = stdout();
    execute!(writer, cursor::Show).ok();
    if alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_queues_messages_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cmd = Command::sequence([
            Command::message(1),
            Command::batch([Command::message(2), Command::none()]),
            Command::message(3),
        ]);
        assert!(!dispatch(cmd, &tx));
        let got: Vec<i32> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(got, vec![1, 2, 3]);
    }

    #[test]
    fn dispatch_reports_quit() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cmd = Command::batch([Command::message("bye"), Command::quit()]);
        assert!(dispatch(cmd, &tx));
        assert_eq!(rx.try_recv().ok(), Some("bye"));
    }

    #[test]
    fn options_builder() {
        let opts = ProgramOptions::default()
            .with_fps(500)
            .with_title("demo")
            .with_log_file("demo.log");
        assert_eq!(opts.fps, 500);
        assert_eq!(opts.title.as_deref(), Some("demo"));
        assert_eq!(opts.log_file, Some(PathBuf::from("demo.log")));
        assert!(opts.alt_screen);
    }
}
