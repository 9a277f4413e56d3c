//! Main application loop for the dashboard.

use crate::config::Config;
use crate::debug;
use crate::error::{DashboardError, Result};
use crate::host::{Host, HostMetrics};
use crate::input::{self, Action};
use crate::render::{RenderSink, Tui};
use crate::types::{Options, WidgetSpec};
use crate::widgets::{create_widget, HostTarget, WidgetKind};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout};
use std::time::{Duration, Instant};

/// The dashboard application.
pub struct App {
    config: Config,
    local: Box<dyn HostMetrics>,
    remote: Option<Box<dyn HostMetrics>>,
    frame: Tui,
    last_refresh: Option<Instant>,
    should_quit: bool,
}

impl App {
    /// Creates an application reading from this machine and, if configured,
    /// from the SSH host.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let timeout = config.timeout();
        let local: Box<dyn HostMetrics> = Box::new(Host::local(timeout));
        let remote = config.host.as_ref().map(|h| {
            Box::new(Host::ssh(h.username.clone(), h.address.clone(), h.port, timeout))
                as Box<dyn HostMetrics>
        });

        Self::with_hosts(config, local, remote)
    }

    /// Creates an application over arbitrary metrics services.
    #[must_use]
    pub fn with_hosts(
        config: Config,
        local: Box<dyn HostMetrics>,
        remote: Option<Box<dyn HostMetrics>>,
    ) -> Self {
        Self { config, local, remote, frame: Tui::new(), last_refresh: None, should_quit: false }
    }

    /// Runs the application main loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup or drawing fails.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;

        debug::hold_stderr();

        let result = self.main_loop(&mut terminal);

        let restored = disable_raw_mode()
            .and_then(|()| stdout().execute(LeaveAlternateScreen).map(|_| ()))
            .and_then(|()| terminal.show_cursor());
        debug::release_stderr();

        result?;
        Ok(restored?)
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let poll_timeout = Duration::from_millis(100);
        let interval = self.config.refresh_interval();

        loop {
            if self.last_refresh.map_or(true, |t| t.elapsed() >= interval) {
                self.refresh();
            }

            terminal.draw(|frame| frame.render_widget(&self.frame, frame.area()))?;

            if event::poll(poll_timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_action(input::handle_key(key));
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Refresh => self.last_refresh = None,
            Action::None => {}
        }
    }

    /// Rebuilds every widget and replaces the current frame.
    pub fn refresh(&mut self) {
        self.frame = self.build_frame();
        self.last_refresh = Some(Instant::now());
    }

    /// Builds and renders every configured widget into a new frame.
    ///
    /// A widget that fails is replaced by a text box carrying the error,
    /// titled with the widget identifier.
    pub fn build_frame(&mut self) -> Tui {
        crate::time_scope!("app", "build_frame");

        let Self { config, local, remote, .. } = self;
        let mut tui = Tui::new();

        for spec in &config.widgets {
            if let Err(err) = draw_widget(spec, local.as_mut(), remote.as_mut(), &mut tui) {
                crate::warn!("app", "{}: {}", spec.name, err);
                let title = format!(" {} ", spec.name);
                if let Err(e) = tui.add_text_box(&err.to_string(), &title, &Options::new()) {
                    crate::error!("app", "{}: error tile rejected: {}", spec.name, e);
                }
            }
        }

        tui
    }

    /// The frame drawn on screen.
    #[must_use]
    pub fn frame(&self) -> &Tui {
        &self.frame
    }

    /// Returns whether the app should quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn draw_widget(
    spec: &WidgetSpec,
    local: &mut dyn HostMetrics,
    remote: Option<&mut Box<dyn HostMetrics>>,
    sink: &mut dyn RenderSink,
) -> Result<()> {
    let (_, target) = WidgetKind::resolve(&spec.name)?;
    let host: &mut dyn HostMetrics = match (target, remote) {
        (HostTarget::Local, _) => local,
        (HostTarget::Remote, Some(remote)) => remote.as_mut(),
        (HostTarget::Remote, None) => {
            return Err(DashboardError::ConfigInvalid {
                key: "host".to_string(),
                message: format!("widget '{}' needs a remote host", spec.name),
            })
        }
    };

    create_widget(spec, host)?.render(sink)
}
