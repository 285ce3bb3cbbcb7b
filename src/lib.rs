pub mod engine;
pub mod error;
pub mod persist;
pub mod player;
pub mod rng;
pub mod rules;
pub mod world;

use tracing::{debug, info, warn};

use engine::{
    Command, FinalScore, GameStatus, Outcome, OutcomeKind, Output, handle_answer, handle_attack,
    handle_drop, handle_examine, handle_inventory, handle_move, handle_take, handle_use,
    monster_strikes, render_room,
};
use error::{EngineError, PersistError};
use persist::SnapshotStore;
use rng::GameRng;
use world::World;

pub use world::{load_world_from_file, load_world_from_str};

pub struct GameState {
    pub world: World,
    rng: GameRng,
    status: GameStatus,
    store: Option<Box<dyn SnapshotStore>>,
}

#[cfg(feature = "wasm")]
mod wasm_bindings {
    use super::*;
    use serde::Serialize;
    use serde_wasm_bindgen::to_value;
    use wasm_bindgen::prelude::*;

    #[derive(Serialize)]
    struct WasmStepResult {
        blocks: Vec<engine::OutputBlock>,
        quit: bool,
        score: u32,
        health: u32,
    }

    #[wasm_bindgen]
    pub struct WasmGame {
        state: GameState,
    }

    #[wasm_bindgen]
    impl WasmGame {
        /// Create a new game from a TOML world string. Call `init()` to get the initial render.
        #[wasm_bindgen(constructor)]
        pub fn new(world_toml: &str) -> Result<WasmGame, JsValue> {
            let world =
                load_world_from_str(world_toml).map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(WasmGame {
                state: GameState::new(world).with_store(persist::MemoryStore::new()),
            })
        }

        /// Return the initial render output.
        #[wasm_bindgen]
        pub fn init(&mut self) -> JsValue {
            let out = self.state.initialize();
            self.result(out, false)
        }

        /// Process a player command and return the resulting output blocks and quit flag.
        #[wasm_bindgen]
        pub fn step(&mut self, input: &str) -> JsValue {
            let (out, quit) = self.state.step(input);
            self.result(out, quit)
        }

        fn result(&self, out: Output, quit: bool) -> JsValue {
            to_value(&WasmStepResult {
                blocks: out.blocks,
                quit,
                score: self.state.world.player.score,
                health: self.state.world.player.health,
            })
            .unwrap_or(JsValue::NULL)
        }
    }
}

impl GameState {
    pub fn new(world: World) -> Self {
        Self::with_rng(world, GameRng::from_entropy())
    }

    /// Same seed, same critical hits.
    pub fn with_seed(world: World, seed: u64) -> Self {
        Self::with_rng(world, GameRng::new(seed))
    }

    pub fn with_rng(world: World, rng: GameRng) -> Self {
        let status = status_for(&world);
        GameState {
            world,
            rng,
            status,
            store: None,
        }
    }

    pub fn with_store(mut self, store: impl SnapshotStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn final_score(&self) -> FinalScore {
        FinalScore {
            score: self.world.player.score,
            rank: self.world.player.rank(),
        }
    }

    /// Describes the starting room.
    pub fn initialize(&mut self) -> Output {
        let mut out = Output::new();
        render_room(&mut out, &self.world);
        out
    }

    /// Applies one command. Gameplay failures are `Ok` outcomes; only contract
    /// violations by the caller come back as `Err`.
    pub fn apply(&mut self, cmd: Command) -> Result<Outcome, EngineError> {
        check_arguments(&cmd)?;
        debug!(?cmd, room = self.world.player.room, "applying command");

        let room = self.world.player.room;

        if self.status.is_terminal() && !cmd.is_terminal_safe() {
            let fin = self.final_score();
            let mut outcome = Outcome::failure(OutcomeKind::GameOver, room).with_text(format!(
                "The game is over. Final score: {} ({}).",
                fin.score, fin.rank
            ));
            outcome.status = self.status;
            return Ok(outcome);
        }

        let mut outcome = match cmd {
            Command::Move(dir) => handle_move(&mut self.world, dir),
            Command::Look => self.look(),
            Command::Inventory => handle_inventory(&self.world),
            Command::Attack => handle_attack(&mut self.world, &mut self.rng),
            Command::Take(name) => handle_take(&mut self.world, &name),
            Command::Drop(name) => handle_drop(&mut self.world, &name),
            Command::Examine(name) => handle_examine(&self.world, &name),
            Command::Use(name) => handle_use(&mut self.world, &name),
            Command::Answer(text) => handle_answer(&mut self.world, &text),
            Command::Save => self.save(),
            Command::Load => self.load(),
            Command::Quit => self.quit(),
        };

        if !self.status.is_terminal() && self.world.player.is_asleep() {
            let fin = self.final_score();
            self.status = GameStatus::Over(fin);
            info!(score = fin.score, rank = %fin.rank, "game over");
            outcome.event(format!(
                "You collapse, exhausted. GAME OVER. Final score: {} ({}).",
                fin.score, fin.rank
            ));
        }

        outcome.room = self.world.player.room;
        outcome.status = self.status;
        Ok(outcome)
    }

    /// Parses and applies one line of player text; returns (output, quit?)
    pub fn step(&mut self, input: &str) -> (Output, bool) {
        let input = input.trim();
        if input.is_empty() {
            return (Output::new(), false);
        }

        match Command::parse(input).map_err(|e| e.to_string()) {
            Ok(cmd) => match self.apply(cmd) {
                Ok(outcome) => {
                    let quit = matches!(outcome.status, GameStatus::Quit(_));
                    (outcome.output, quit)
                }
                Err(e) => {
                    let mut out = Output::new();
                    out.say(e.to_string());
                    (out, false)
                }
            },
            Err(msg) => {
                let mut out = Output::new();
                out.say(msg);
                (out, false)
            }
        }
    }

    fn look(&mut self) -> Outcome {
        let mut outcome = Outcome::success(OutcomeKind::Looked, self.world.player.room);
        render_room(&mut outcome.output, &self.world);
        if self.world.rules.monster_attacks_on_look {
            monster_strikes(&mut self.world, &mut outcome);
        }
        outcome
    }

    fn save(&mut self) -> Outcome {
        let room = self.world.player.room;
        let result = match self.store.as_mut() {
            Some(store) => store.save(&self.world),
            None => Err(PersistError::NoStore),
        };
        match result {
            Ok(()) => {
                info!("game saved");
                Outcome::success(OutcomeKind::Saved, room).with_text("Game saved.")
            }
            Err(e) => persist_failed(room, "save", e),
        }
    }

    /// Replaces the live world wholesale; on any failure the live world is untouched.
    fn load(&mut self) -> Outcome {
        let room = self.world.player.room;
        let result = match self.store.as_mut() {
            Some(store) => store.load(),
            None => Err(PersistError::NoStore),
        };
        match result {
            Ok(world) => {
                self.world = world;
                self.status = status_for(&self.world);
                info!(room = self.world.player.room, "game loaded");
                let mut outcome = Outcome::success(OutcomeKind::Loaded, self.world.player.room)
                    .with_text("Game loaded.");
                render_room(&mut outcome.output, &self.world);
                outcome
            }
            Err(e) => persist_failed(room, "load", e),
        }
    }

    fn quit(&mut self) -> Outcome {
        let fin = self.final_score();
        self.status = GameStatus::Quit(fin);
        info!(score = fin.score, rank = %fin.rank, "player quit");
        Outcome::success(OutcomeKind::Quit, self.world.player.room).with_text(format!(
            "Goodbye. Final score: {} ({}).",
            fin.score, fin.rank
        ))
    }
}

fn status_for(world: &World) -> GameStatus {
    if world.player.is_asleep() {
        GameStatus::Over(FinalScore {
            score: world.player.score,
            rank: world.player.rank(),
        })
    } else {
        GameStatus::Playing
    }
}

fn persist_failed(room: world::RoomId, action: &str, err: PersistError) -> Outcome {
    warn!(%err, action, "persistence failed");
    Outcome::failure(OutcomeKind::PersistFailed, room)
        .with_text(format!("Could not {} the game: {}", action, err))
}

fn check_arguments(cmd: &Command) -> Result<(), EngineError> {
    let (value, what) = match cmd {
        Command::Take(s) | Command::Drop(s) | Command::Use(s) => (s, "item name"),
        Command::Examine(s) => (s, "examine target"),
        Command::Answer(s) => (s, "answer"),
        _ => return Ok(()),
    };
    if value.trim().is_empty() {
        return Err(EngineError::EmptyName(what));
    }
    Ok(())
}
