use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use log::{debug, info};
use rand::{thread_rng, Rng};

use fruit_ninja::compute::{init_state, reset_state, update};
use fruit_ninja::display::{self, Renderer, TerminalScreen};
use fruit_ninja::entities::{GameState, Level, FRAME_TIME, PROMPT_POLL};
use fruit_ninja::input::{KeyboardState, TickInput};
use fruit_ninja::menu::{phase_after_tick, Menu, Phase, RoundOverPrompt};

// ── Input plumbing ────────────────────────────────────────────────────────────

/// Move every pending terminal event into `keys` without blocking, then
/// settle key state at the current instant.
fn drain_events(rx: &mpsc::Receiver<Event>, keys: &mut KeyboardState) {
    while let Ok(ev) = rx.try_recv() {
        if let Event::Key(key) = ev {
            keys.record(&key, Instant::now());
        }
    }
    keys.sync(Instant::now());
}

// ── Screens ───────────────────────────────────────────────────────────────────

fn menu_screen<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    keys: &mut KeyboardState,
) -> std::io::Result<Phase> {
    display::clear(out)?;
    drain_events(rx, keys);
    let mut menu = Menu::open(keys);

    loop {
        display::draw_menu(out, &menu)?;
        drain_events(rx, keys);
        if keys.interrupted() {
            return Ok(Phase::Exit);
        }
        if let Some(choice) = menu.poll(keys) {
            return Ok(choice.into());
        }
        thread::sleep(PROMPT_POLL);
    }
}

/// Reset `state` for a round of `level` and play it. Returns the next phase;
/// the final score is left in `state`.
fn play_round<W: Write>(
    screen: &mut TerminalScreen<W>,
    renderer: &mut Renderer,
    rx: &mpsc::Receiver<Event>,
    keys: &mut KeyboardState,
    state: &mut GameState,
    level: Level,
    rng: &mut impl Rng,
) -> std::io::Result<Phase> {
    display::clear(screen.writer())?;
    reset_state(state, level);
    renderer.invalidate();
    info!("round started on level {} ({})", level.number(), level.title());

    loop {
        drain_events(rx, keys);
        if keys.interrupted() {
            return Ok(Phase::Exit);
        }

        update(state, &TickInput::sample(keys), rng);
        renderer.render(screen, state)?;

        if let Some(next) = phase_after_tick(state) {
            info!(
                "round ended after {} ticks, score {}, bomb hit: {}",
                state.frame,
                state.score,
                state.is_game_over()
            );
            return Ok(next);
        }

        thread::sleep(FRAME_TIME);
    }
}

fn round_over_screen<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    keys: &mut KeyboardState,
    score: u32,
) -> std::io::Result<Phase> {
    display::draw_round_over(out, score)?;
    drain_events(rx, keys);
    let mut prompt = RoundOverPrompt::open(keys);

    loop {
        drain_events(rx, keys);
        if keys.interrupted() {
            return Ok(Phase::Exit);
        }
        if let Some(next) = prompt.poll(keys) {
            return Ok(next);
        }
        thread::sleep(PROMPT_POLL);
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    // stderr shares the terminal; opt in with RUST_LOG and redirect 2>.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    out.execute(cursor::Hide)?;

    // Ask the terminal itself whether it can report key releases; pushing
    // the flags succeeds on any Unix terminal, so that proves nothing. This
    // query reads stdin and must run before the event thread starts.
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();

    // Blocking reads live on their own thread so the game loop only ever
    // polls the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let mut screen = TerminalScreen::new(out);
    let result = run(&mut screen, &rx, KeyboardState::new(keyboard_enhanced));

    // Always restore the terminal
    let out = screen.writer();
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("terminal I/O failed")
}

fn run<W: Write>(
    screen: &mut TerminalScreen<W>,
    rx: &mpsc::Receiver<Event>,
    mut keys: KeyboardState,
) -> std::io::Result<()> {
    debug!("terminal reports key releases: {}", keys.reports_releases());
    let mut rng = thread_rng();
    let mut state = init_state(Level::Classic);
    let mut renderer = Renderer::new();
    let mut phase = Phase::Menu;

    loop {
        phase = match phase {
            Phase::Menu => menu_screen(screen.writer(), rx, &mut keys)?,
            Phase::Playing(level) => play_round(
                screen,
                &mut renderer,
                rx,
                &mut keys,
                &mut state,
                level,
                &mut rng,
            )?,
            Phase::RoundOver => round_over_screen(screen.writer(), rx, &mut keys, state.score)?,
            Phase::Exit => break,
        };
    }
    Ok(())
}
