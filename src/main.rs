use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_invaders::assets::AssetSet;
use space_invaders::compute::{
    confirm, init_state, move_player_left, move_player_right, move_player_to, player_shoot, tap,
    tick,
};
use space_invaders::config::{Cli, GameConfig};
use space_invaders::display::{self, Canvas, ScaleCache, Viewport};
use space_invaders::entities::{GameState, GameStatus};
use space_invaders::input::{Command, InputState};
use space_invaders::sound::HitSound;

const TITLE: &str = "Space Invaders";

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game, so log lines go to a file.
fn init_logging(config: &GameConfig) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("creating log file {}", config.log_file.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Everything the loop needs besides the game state itself.
struct Session {
    config: GameConfig,
    assets: AssetSet,
    sound: HitSound,
    rng: StdRng,
}

fn log_transition(before: GameStatus, after: &GameState) {
    if before == after.status {
        return;
    }
    match after.status {
        GameStatus::Playing => info!("Game started"),
        GameStatus::GameOver => info!("Game over, total score {}", after.score),
        GameStatus::Start => {}
    }
}

/// Runs until a quit input arrives.
///
/// Each iteration drains pending input, applies held movement keys, advances
/// one tick, renders, then sleeps out the rest of the frame.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let (columns, rows) = terminal::size().context("querying terminal size")?;
    let mut state = init_state(
        session.config.field_width,
        session.config.field_height,
        session.config.rules(),
        &mut session.rng,
    );
    let mut view = Viewport::new(columns, rows, state.width, state.height);
    let mut canvas = Canvas::new(columns, rows);
    let mut scaled = ScaleCache::new();
    let mut input = InputState::new();
    let frame = session.config.frame_duration();

    loop {
        let frame_start = Instant::now();
        input.begin_frame();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Some(command) = input.handle(&ev) else {
                continue;
            };
            let before = state.status;
            match command {
                Command::Quit => return Ok(()),
                Command::Confirm => state = confirm(&state, &mut session.rng),
                Command::Fire => state = player_shoot(&state),
                Command::Tap { column, .. } => {
                    state = tap(&state, view.logical_x(column), &mut session.rng)
                }
                Command::Drag { column, .. } => {
                    state = move_player_to(&state, view.logical_x(column))
                }
                Command::Resize { columns, rows } => {
                    view = Viewport::new(columns, rows, state.width, state.height);
                    canvas = Canvas::new(columns, rows);
                    scaled.clear();
                    out.execute(terminal::Clear(terminal::ClearType::All))?;
                }
            }
            log_transition(before, &state);
        }

        // ── Apply held-key movement, then advance the world ───────────────────
        if input.left_held() {
            state = move_player_left(&state);
        }
        if input.right_held() {
            state = move_player_right(&state);
        }

        let before = state.status;
        state = tick(&state, &mut session.rng);
        log_transition(before, &state);

        display::render(&mut canvas, &state, &session.assets, &view, &mut scaled);
        session.sound.play(out, state.frame_hits)?;
        display::present(out, &canvas)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Terminal ──────────────────────────────────────────────────────────────────

/// Take over the terminal.  On failure part of it may already be switched,
/// so the caller restores unconditionally.
fn setup_terminal<W: Write>(out: &mut W, keyboard_enhanced: &mut bool) -> Result<()> {
    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(terminal::SetTitle(TITLE))?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    *keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    Ok(())
}

fn restore_terminal<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Dedicate a thread exclusively to blocking event reads, sending them
/// through a channel so the game loop never has to block on I/O.
fn spawn_input_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                error!("Input reader stopped: {e}");
                break;
            }
        }
    });
    rx
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = GameConfig::resolve(&cli).map_err(|e| anyhow!(e))?;
    init_logging(&config)?;
    info!("Starting with {config:?}");

    let mut session = Session {
        assets: AssetSet::load(&config.asset_dir),
        sound: HitSound::detect(config.sound),
        rng: match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        },
        config,
    };

    let mut out = BufWriter::new(stdout());
    let mut keyboard_enhanced = false;
    let result = setup_terminal(&mut out, &mut keyboard_enhanced)
        .and_then(|()| game_loop(&mut out, &mut session, &spawn_input_reader()));
    restore_terminal(&mut out, keyboard_enhanced);

    match &result {
        Ok(()) => info!("Exited cleanly"),
        Err(e) => error!("Exited with error: {e:#}"),
    }
    result
}
