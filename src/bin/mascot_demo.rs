//! Terminal playground for the mascot eye.
//!
//! Move the mouse around the eye, click it to poke it, and drive host
//! commands from the keyboard. Logs go to stderr (`RUST_LOG=debug`), so
//! redirect it when running in a terminal: `mascot-demo 2>mascot.log`.

use std::cell::Cell;
use std::io::{self, Write, stdout};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::cursor::{self, MoveTo};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};

use spark_mascot::state::input::{self, CellScale, InputEvent, KeyPress};
use spark_mascot::{
    EyelidState, Mascot, MascotConfig, MascotOptions, MascotState, Rect, TerminalSink, advance_to,
};

const HELP: &str = "n/a/r state  t think  s squint  b blink  p poke  f tracking  q quit";

#[derive(Parser, Debug)]
#[command(about = "Terminal playground for the mascot eye", version)]
struct Args {
    /// Disable gaze movement and the thinking oscillation
    #[arg(long)]
    reduced_motion: bool,

    /// Behave like a touch device: no pointer tracking, no glances
    #[arg(long)]
    touch: bool,

    /// Horizontal gaze clamp
    #[arg(long)]
    clamp_x: Option<f64>,

    /// Vertical gaze clamp
    #[arg(long)]
    clamp_y: Option<f64>,

    /// JSON options file (camelCase keys); flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Eye width in cells
    #[arg(long, default_value_t = 23)]
    width: u16,

    /// Eye height in cells
    #[arg(long, default_value_t = 9)]
    height: u16,
}

/// Raw mode, alternate screen and mouse capture for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        input::enable_mouse()?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = input::disable_mouse();
        let _ = execute!(stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::init();

    let options = load_options(&args)?;
    let clamp = MascotConfig::from_options(&options);

    let _guard = TerminalGuard::enter().context("preparing the terminal")?;

    let (cols, rows) = terminal::size().context("reading terminal size")?;
    let origin = (
        cols.saturating_sub(args.width) / 2,
        rows.saturating_sub(args.height) / 2,
    );
    let sink = TerminalSink::new(stdout(), origin, args.width, args.height)
        .with_range(clamp.eye_clamp_x, clamp.eye_clamp_y);
    let (width, height) = sink.size();

    let scale = CellScale::default();
    let surface = Rc::new(Cell::new(Rect::new(
        f64::from(origin.0) * scale.x,
        f64::from(origin.1) * scale.y,
        f64::from(width) * scale.x,
        f64::from(height) * scale.y,
    )));

    let mascot = Mascot::new(options);
    mascot.mount(surface, sink).context("mounting the mascot")?;
    log::info!("mascot demo started ({cols}x{rows})");

    let status_row = origin.1 + height + 1;
    let start = Instant::now();

    loop {
        if let Some(event) = input::poll_event(Duration::from_millis(16), scale)? {
            match event {
                InputEvent::Key(key) => {
                    if !handle_key(&mascot, &key) {
                        break;
                    }
                }
                InputEvent::Resize(w, h) => log::debug!("terminal resized to {w}x{h}"),
                other => {
                    input::route_event(&other);
                }
            }
        }

        advance_to(start.elapsed().as_secs_f64() * 1000.0);
        draw_status(status_row, &mascot)?;
    }

    mascot.destroy();
    Ok(())
}

fn load_options(args: &Args) -> Result<MascotOptions> {
    let mut options = match &args.config {
        Some(path) => MascotOptions::load(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => MascotOptions::default(),
    };

    if args.reduced_motion {
        options.reduced_motion = Some(true);
    }
    if args.touch {
        options.is_touch_device = Some(true);
    }
    if let Some(x) = args.clamp_x {
        options.eye_clamp_x = Some(x);
    }
    if let Some(y) = args.clamp_y {
        options.eye_clamp_y = Some(y);
    }

    Ok(options)
}

/// Apply a key command. Returns false to quit.
fn handle_key(mascot: &Mascot, key: &KeyPress) -> bool {
    if key.ctrl && key.key == "c" {
        return false;
    }

    match key.key.as_str() {
        "q" | "Escape" => return false,
        "n" => mascot.set_state(MascotState::Neutral),
        "a" => mascot.set_state(MascotState::Alert),
        "r" => mascot.set_state(MascotState::Relaxed),
        "t" => {
            if mascot.get_state() == MascotState::Thinking {
                mascot.set_state(MascotState::Neutral);
            } else {
                mascot.set_state(MascotState::Thinking);
            }
        }
        "s" => {
            if mascot.get_eyelid_state() == EyelidState::Squinting {
                mascot.open_eyelids();
            } else {
                mascot.set_eyelid_state(EyelidState::Squinting);
            }
        }
        "b" => mascot.blink(),
        "p" => mascot.poke(),
        "f" => {
            if mascot.is_pointer_tracking_enabled() {
                mascot.disable_pointer_tracking();
            } else {
                mascot.enable_pointer_tracking();
            }
        }
        _ => {}
    }
    true
}

fn draw_status(row: u16, mascot: &Mascot) -> io::Result<()> {
    let view = mascot.view();
    let status = format!(
        "state={} eyelid={} pokes={} tracking={}",
        view.state,
        view.eyelid_state,
        view.poke_count,
        if mascot.is_pointer_tracking_enabled() { "on" } else { "off" },
    );

    let mut out = stdout();
    queue!(
        out,
        MoveTo(0, row),
        Clear(ClearType::CurrentLine),
        Print(status),
        MoveTo(0, row + 1),
        Clear(ClearType::CurrentLine),
        Print(HELP)
    )?;
    out.flush()
}
