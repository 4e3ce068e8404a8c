use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
};
use glyphfall_config::Config;
use glyphfall_core::{MotionPreference, PageDocument, PageEvent};
use glyphfall_page::{PageAnimator, PointerTracker};
use glyphfall_rain::{CELL_HEIGHT_PX, CELL_WIDTH_PX, GlyphCanvas};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{DefaultTerminal, Frame};
use tracing::info;

mod logging;
mod page;

use page::PageView;

/// Input poll timeout; also paces animation frames.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init();

    let config = Config::load()?;
    // Terminals expose no motion preference; only overrides apply.
    let motion = MotionPreference::from_reduced(config.reduced_motion(false));
    let (doc, view) = PageView::build(&config);
    let animator = PageAnimator::new(&config, doc, motion, StdRng::from_os_rng())?;

    let terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;
    let result = App::new(animator, view).run(terminal);
    let released = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();
    result?;
    released?;
    Ok(())
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Page animation state and document.
    animator: PageAnimator<PageDocument>,
    /// Layout and scroll position.
    view: PageView,
    /// Background surface the rain draws on.
    canvas: GlyphCanvas,
    /// Turns mouse positions into card enter/leave events.
    pointer: PointerTracker,
    /// Last pointer position in pixels.
    last_pointer: Option<(f32, f32)>,
    /// Terminal size in cells.
    cols: u16,
    rows: u16,
    /// Page load time.
    started: Instant,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(animator: PageAnimator<PageDocument>, view: PageView) -> Self {
        Self {
            running: false,
            animator,
            view,
            canvas: GlyphCanvas::new(),
            pointer: PointerTracker::new(),
            last_pointer: None,
            cols: 0,
            rows: 0,
            started: Instant::now(),
        }
    }

    /// Milliseconds since the page loaded.
    fn now(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.cols = size.width;
        self.rows = size.height;
        self.started = Instant::now();
        self.animator.load(
            0,
            GlyphCanvas::viewport_for(self.cols, self.rows),
            &mut self.canvas,
        );

        self.running = true;
        while self.running {
            let now = self.now();
            self.animator.advance(now);
            self.animator.frame(now, &mut self.canvas);
            self.update_reveal();
            terminal.draw(|frame| self.render(frame, now))?;
            self.handle_crossterm_events()?;
        }
        info!(
            frames = self.animator.rain().frames_drawn(),
            "page closed"
        );
        Ok(())
    }

    /// Renders the user interface.
    fn render(&self, frame: &mut Frame, now: u64) {
        self.canvas.render(frame);
        self.view.render(frame, &self.animator, now);
    }

    /// Report intersections for elements that are still waiting to reveal.
    fn update_reveal(&mut self) {
        let viewport = self.animator.viewport();
        let entries = self
            .animator
            .reveal()
            .entries(viewport, self.view.observed_rects(self.cols));
        for entry in entries {
            self.animator
                .handle(PageEvent::Intersection(entry), &mut self.canvas);
        }
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Uses polling with timeout so animations keep running.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(FRAME_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(cols, rows) => self.on_resize(cols, rows),
                Event::FocusLost => self.dispatch_pointer(None),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        let page = self.rows.saturating_sub(2).max(1) as i32;
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Down | KeyCode::Char('j')) => self.scroll(1),
            (_, KeyCode::Up | KeyCode::Char('k')) => self.scroll(-1),
            (_, KeyCode::PageDown | KeyCode::Char(' ')) => self.scroll(page),
            (_, KeyCode::PageUp) => self.scroll(-page),
            (_, KeyCode::Home | KeyCode::Char('g')) => {
                self.view.scroll_to_top();
                self.refresh_pointer();
            }
            (_, KeyCode::End | KeyCode::Char('G')) => {
                self.view.scroll_to_end(self.cols, self.rows);
                self.refresh_pointer();
            }
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll(3),
            MouseEventKind::ScrollUp => self.scroll(-3),
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let x = (mouse.column as f32 + 0.5) * CELL_WIDTH_PX as f32;
                let y = (mouse.row as f32 + 0.5) * CELL_HEIGHT_PX as f32;
                self.dispatch_pointer(Some((x, y)));
            }
            _ => {}
        }
    }

    fn on_resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.view.clamp_scroll(cols, rows);
        self.animator.handle(
            PageEvent::Resize(GlyphCanvas::viewport_for(cols, rows)),
            &mut self.canvas,
        );
        self.refresh_pointer();
    }

    fn scroll(&mut self, delta: i32) {
        self.view.scroll_by(delta, self.cols, self.rows);
        self.refresh_pointer();
    }

    /// Cards move under a still pointer when the page scrolls.
    fn refresh_pointer(&mut self) {
        self.dispatch_pointer(self.last_pointer);
    }

    fn dispatch_pointer(&mut self, position: Option<(f32, f32)>) {
        self.last_pointer = position;
        let events = match position {
            Some((x, y)) => self
                .pointer
                .move_to(x, y, self.view.card_rects(self.cols)),
            None => self.pointer.leave(),
        };
        for event in events {
            self.animator.handle(event, &mut self.canvas);
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
