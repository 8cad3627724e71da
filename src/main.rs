mod audio;
mod config;
mod error;
mod game;
mod guess;
mod input;
mod leaderboard;
mod render;
mod session;

use audio::TerminalAudio;
use bracket_terminal::prelude::*;
use config::GameConfig;
use game::Game;
use input::{GameEvent, ScriptedInput, key_event};
use render::{StatusPanel, draw_board, draw_log, draw_standings, draw_title, draw_username_prompt};
use session::{MonotonicClock, Phase};

const SCREEN_HEIGHT: i32 = 50;
const LOG_PANEL_START: i32 = SCREEN_HEIGHT - 8;

/// bracket-terminal's `main_loop` calls `tick` once per frame; that frame
/// pacing is the game's only scheduler. At most one key is consumed per tick.
struct NumberGuessState {
    game: Game,
    clock: MonotonicClock,
    script: Option<ScriptedInput>,
    status: StatusPanel,
}

impl GameState for NumberGuessState {
    fn tick(&mut self, ctx: &mut BTerm) {
        if let Some(event) = self.poll_event(ctx) {
            self.game.apply(event, &self.clock);
        }
        if self.game.is_finished() {
            ctx.quit();
            return;
        }
        ctx.cls();
        self.draw_scene(ctx);
    }
}

impl NumberGuessState {
    fn poll_event(&mut self, ctx: &BTerm) -> Option<GameEvent> {
        if let Some(script) = self.script.as_mut() {
            if let Some(event) = script.next_event() {
                return Some(event);
            }
            if script.is_exhausted() {
                log::info!("Input script finished; reading the keyboard");
                self.script = None;
            }
        }
        ctx.key.and_then(|key| key_event(key, ctx.shift))
    }

    fn draw_scene(&self, ctx: &mut BTerm) {
        let session = self.game.session();
        match session.phase() {
            Phase::Title => draw_title(ctx),
            Phase::AwaitingUsername => draw_username_prompt(ctx, session.username()),
            Phase::LevelInProgress { .. } | Phase::LevelCleared { .. } => {
                let elapsed = session.elapsed(&self.clock).as_secs();
                self.status.draw(ctx, &self.game, elapsed);
                draw_board(ctx, session);
            }
            Phase::Completed => {
                let elapsed = session.elapsed(&self.clock).as_secs();
                self.status.draw(ctx, &self.game, elapsed);
                draw_standings(
                    ctx,
                    self.game.standings(),
                    self.game.last_record(),
                    self.game.merge_outcome(),
                );
            }
            Phase::Abandoned => {}
        }
        draw_log(ctx, self.game.message_log(), LOG_PANEL_START);
    }
}

fn main() -> BError {
    env_logger::init();
    let config = GameConfig::from_env()?;
    let script = match &config.script {
        Some(path) => Some(ScriptedInput::from_file(path)?),
        None => None,
    };
    let context = BTermBuilder::simple80x50()
        .with_title("Number Guessing Game")
        .build()?;
    let game_state = NumberGuessState {
        game: Game::new(config, Box::new(TerminalAudio::new())),
        clock: MonotonicClock::new(),
        script,
        status: StatusPanel::new(),
    };
    main_loop(context, game_state)
}
