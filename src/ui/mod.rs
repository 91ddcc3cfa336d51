//! GUI module for the Gomoku game
//!
//! The window runs on the main thread; the [`Gomoku`] coordinator runs on a
//! worker thread. They meet in a [`Visualizer`], which is both the game's
//! observer (mirroring every change into a shared [`Scene`]) and a player
//! for each human seat (turning board clicks into key-guarded submissions).

mod app;
mod board_view;
mod theme;

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::board::{Pos, Stone, TOTAL_CELLS};
use crate::error::UsageError;
use crate::game::{Game, Gomoku, TurnOutcome};
use crate::player::{MoveKey, MoveSlot, Player, StateObserver};
use crate::rules;

pub use app::GomokuApp;

/// Lines of turn log kept for the side panel
const LOG_CAPACITY: usize = 200;

/// How long a human seat waits for a click before yielding back to the coordinator
const CLICK_WAIT: Duration = Duration::from_millis(100);

/// A human seat waiting on a click
#[derive(Debug, Clone)]
struct PendingClick {
    stone: Stone,
    key: MoveKey,
    slot: MoveSlot,
}

/// Everything the window draws, as last reported by the coordinator
#[derive(Debug, Clone)]
pub struct Scene {
    cells: Vec<Option<Stone>>,
    pub last_move: Option<Pos>,
    pub captures: [u32; 2],
    pub turn: u32,
    pub current: Stone,
    pub winner: Option<Stone>,
    pub five_line: Option<Vec<Pos>>,
    pub log: Vec<String>,
    /// Last refusal reported to a human seat
    pub message: Option<String>,
    pending: Option<PendingClick>,
    clicked: bool,
    closed: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            cells: vec![None; TOTAL_CELLS],
            last_move: None,
            captures: [0; 2],
            turn: 0,
            current: Stone::Black,
            winner: None,
            five_line: None,
            log: Vec::new(),
            message: None,
            pending: None,
            clicked: false,
            closed: false,
        }
    }
}

impl Scene {
    pub fn get(&self, pos: Pos) -> Option<Stone> {
        self.cells[pos.to_index()]
    }

    /// Stone of the human seat currently waiting for a click
    pub fn awaiting(&self) -> Option<Stone> {
        self.pending.as_ref().map(|p| p.stone)
    }

    fn set(&mut self, x: i32, y: i32, value: Option<Stone>) {
        if let Some(pos) = Pos::checked(x, y) {
            self.cells[pos.to_index()] = value;
        }
    }

    fn sync(&mut self, game: &Game) {
        for (index, cell) in self.cells.iter_mut().enumerate() {
            let (x, y) = Pos::from_index(index).coords();
            *cell = game.get(x, y).stone();
        }
        self.last_move = game.last_move();
        self.captures = [
            game.capture_count(Stone::Black),
            game.capture_count(Stone::White),
        ];
        self.turn = game.turn();
        self.current = game.current();
        self.winner = game.winner();
        self.five_line = game.winner().and_then(|winner| {
            let anchor = game.pending().filter(|p| p.owner == winner)?;
            rules::five_line_at(game.board(), anchor.pos)
        });
    }
}

struct Shared {
    scene: Mutex<Scene>,
    wake: Condvar,
    repaint: Mutex<Option<egui::Context>>,
}

/// Bridge between the coordinator thread and the window.
///
/// Cheap to clone; every clone shares the same scene. Seat a clone for each
/// human player and install one as the game's observer.
#[derive(Clone)]
pub struct Visualizer {
    shared: Arc<Shared>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                scene: Mutex::new(Scene::default()),
                wake: Condvar::new(),
                repaint: Mutex::new(None),
            }),
        }
    }

    /// Lock the scene. A panic on the other side leaves it readable.
    pub fn scene(&self) -> MutexGuard<'_, Scene> {
        self.shared
            .scene
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Frames are requested on this context whenever the scene changes
    fn attach(&self, ctx: egui::Context) {
        *self
            .shared
            .repaint
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(ctx);
    }

    fn request_repaint(&self) {
        let repaint = self
            .shared
            .repaint
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(ctx) = repaint.as_ref() {
            ctx.request_repaint();
        }
    }

    /// A click on `pos`. Returns true when it became the waiting seat's move.
    pub fn click(&self, pos: Pos) -> bool {
        let mut scene = self.scene();
        if scene.get(pos).is_some() {
            return false;
        }
        let Some(pending) = scene.pending.take() else {
            return false;
        };
        let accepted = pending.slot.submit(pos.x as i32, pos.y as i32, pending.key);
        if accepted {
            scene.clicked = true;
            scene.message = None;
        } else {
            scene.pending = Some(pending);
        }
        drop(scene);
        self.shared.wake.notify_all();
        accepted
    }

    /// The window is gone; stop waiting for clicks
    pub fn close(&self) {
        let mut scene = self.scene();
        scene.closed = true;
        scene.pending = None;
        drop(scene);
        self.shared.wake.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.scene().closed
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl StateObserver for Visualizer {
    fn report_change(&mut self, _game: &Game, x: i32, y: i32, value: Option<Stone>) {
        self.scene().set(x, y, value);
        self.request_repaint();
    }

    fn log_turn(&mut self, game: &Game, logs: &[String]) {
        let mut scene = self.scene();
        scene.sync(game);
        scene.log.extend(logs.iter().cloned());
        let overflow = scene.log.len().saturating_sub(LOG_CAPACITY);
        scene.log.drain(..overflow);
        drop(scene);
        self.request_repaint();
    }
}

impl Player for Visualizer {
    fn name(&self, stone: Stone) -> String {
        format!("Player {}", stone.number())
    }

    fn report(&mut self, _game: &Game, message: &str) {
        self.scene().message = Some(message.to_string());
        self.request_repaint();
    }

    fn get_move(&mut self, game: &Game, stone: Stone, key: MoveKey, slot: &MoveSlot) -> bool {
        let mut scene = self.scene();
        if scene.closed {
            return false;
        }
        scene.current = stone;
        scene.turn = game.turn();
        scene.clicked = false;
        scene.pending = Some(PendingClick {
            stone,
            key,
            slot: slot.clone(),
        });
        self.request_repaint();

        let (mut scene, _) = self
            .shared
            .wake
            .wait_timeout_while(scene, CLICK_WAIT, |s| !s.clicked && !s.closed)
            .unwrap_or_else(PoisonError::into_inner);
        let submitted = std::mem::take(&mut scene.clicked);
        scene.pending = None;
        submitted
    }
}

/// Drive `gomoku` to the end, pausing `pace` after every placement.
fn play_out(mut gomoku: Gomoku, pace: Duration) -> Result<Option<Stone>, UsageError> {
    loop {
        match gomoku.next()? {
            TurnOutcome::Finished => return Ok(gomoku.game().winner()),
            TurnOutcome::Played(_) if !pace.is_zero() => thread::sleep(pace),
            _ => {}
        }
    }
}

/// Run `gomoku` on a worker thread behind a window until either ends.
///
/// `visualizer` must be the game's observer and should fill the human seats.
pub fn run(gomoku: Gomoku, visualizer: Visualizer, pace: Duration) -> anyhow::Result<()> {
    let abort = gomoku.abort_handle();
    let worker = thread::Builder::new()
        .name("coordinator".to_string())
        .spawn(move || play_out(gomoku, pace))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Gomoku"),
        ..Default::default()
    };
    let app_view = visualizer.clone();
    let result = eframe::run_native(
        "Gomoku",
        options,
        Box::new(move |cc| {
            app_view.attach(cc.egui_ctx.clone());
            Ok(Box::new(GomokuApp::new(app_view)))
        }),
    );

    abort.abort();
    visualizer.close();
    match worker.join() {
        Ok(Ok(Some(winner))) => info!(%winner, "game over"),
        Ok(Ok(None)) => info!("game stopped without a winner"),
        Ok(Err(err)) => return Err(err.into()),
        Err(_) => warn!("coordinator thread panicked"),
    }
    result.map_err(|err| anyhow::anyhow!("window failed: {err}"))
}
