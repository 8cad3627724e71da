use bracket_terminal::prelude::*;

use crate::{
    game::Game,
    guess::MISS_GLYPH,
    leaderboard::{MergeOutcome, ScoreRecord},
    session::{Phase, Session},
};

pub const STATUS_ROWS: i32 = 7;
pub const BOARD_TOP: i32 = 10;

pub struct StatusPanel;

impl StatusPanel {
    pub const fn new() -> Self {
        Self
    }

    pub fn draw(&self, ctx: &mut BTerm, game: &Game, elapsed_secs: u64) {
        let session = game.session();
        let (width, _) = ctx.get_char_size();
        let width = width as i32;
        ctx.draw_box(0, 0, width - 1, STATUS_ROWS - 1, RGB::named(GRAY), RGB::named(BLACK));
        ctx.print_color(
            2,
            1,
            RGB::named(WHITE),
            RGB::named(BLACK),
            format!("Player: {}", session.username()),
        );

        if let (Some(level), Some(digits)) = (session.level(), session.digit_length()) {
            ctx.print_color(
                2,
                2,
                RGB::named(LIGHT_BLUE),
                RGB::named(BLACK),
                format!(
                    "Level {}/{} | {} digits",
                    level,
                    session.rules().levels,
                    digits
                ),
            );
        }

        let stats = session.stats();
        ctx.print_color(
            2,
            3,
            RGB::named(LIGHT_GREEN),
            RGB::named(BLACK),
            format!("Time: {elapsed_secs} seconds"),
        );
        ctx.print_color(
            2,
            4,
            RGB::named(YELLOW),
            RGB::named(BLACK),
            format!(
                "Success ratio: {:.2}% ({}/{})",
                stats.success_ratio(),
                stats.attempts_with_hit,
                stats.attempts_total
            ),
        );
        if let Some(started) = game.run_started() {
            ctx.print_color(
                2,
                5,
                RGB::named(DARK_GRAY),
                RGB::named(BLACK),
                format!("Started at {}", started.format("%H:%M:%S")),
            );
        }
    }
}

pub fn draw_title(ctx: &mut BTerm) {
    let (width, height) = ctx.get_char_size();
    let (box_w, box_h) = (20, 2);
    let left = (width as i32 - box_w) / 2;
    let top = height as i32 / 2 - 1;
    ctx.print_color_centered(
        top - 6,
        RGB::named(YELLOW),
        RGB::named(BLACK),
        "Number Guessing Game",
    );
    ctx.draw_box(left, top, box_w, box_h, RGB::named(BLUE), RGB::named(BLACK));
    ctx.print_color_centered(top + 1, RGB::named(WHITE), RGB::named(BLACK), "Start Game");
    ctx.print_color_centered(
        top + 5,
        RGB::named(GRAY),
        RGB::named(BLACK),
        "Enter to start | Esc to quit",
    );
}

pub fn draw_username_prompt(ctx: &mut BTerm, draft: &str) {
    ctx.print_color_centered(
        BOARD_TOP,
        RGB::named(WHITE),
        RGB::named(BLACK),
        format!("Username: {draft}_"),
    );
    ctx.print_color_centered(
        BOARD_TOP + 2,
        RGB::named(GRAY),
        RGB::named(BLACK),
        "No spaces. Press Enter to begin.",
    );
}

/// Last feedback mask and the digits typed so far.
pub fn draw_board(ctx: &mut BTerm, session: &Session) {
    let Some(width) = session.digit_length() else {
        return;
    };
    let feedback = session
        .last_mask()
        .map(|mask| mask.to_string())
        .unwrap_or_else(|| MISS_GLYPH.to_string().repeat(width));
    ctx.print_color(
        4,
        BOARD_TOP,
        RGB::named(WHITE),
        RGB::named(BLACK),
        format!("Guess: {feedback}"),
    );
    ctx.print_color(
        4,
        BOARD_TOP + 2,
        RGB::named(LIGHT_CYAN),
        RGB::named(BLACK),
        format!("Input:   {}", session.attempt().padded(width)),
    );

    match session.phase() {
        Phase::LevelCleared { level } => {
            ctx.print_color(
                4,
                BOARD_TOP + 4,
                RGB::named(LIGHT_GREEN),
                RGB::named(BLACK),
                format!("Level {level} cleared. Press Enter to continue."),
            );
        }
        Phase::LevelInProgress { .. } => {
            ctx.print_color(
                4,
                BOARD_TOP + 4,
                RGB::named(DARK_GRAY),
                RGB::named(BLACK),
                "Type digits | Backspace to erase | Esc to quit",
            );
        }
        _ => {}
    }
}

pub fn draw_standings(
    ctx: &mut BTerm,
    standings: &[ScoreRecord],
    mine: Option<&ScoreRecord>,
    outcome: Option<&MergeOutcome>,
) {
    ctx.print_color(
        4,
        BOARD_TOP,
        RGB::named(YELLOW),
        RGB::named(BLACK),
        format!("Top {} High Scores", standings.len()),
    );
    for (idx, record) in standings.iter().enumerate() {
        let is_mine = mine.is_some_and(|m| m.username == record.username);
        let fg = if is_mine {
            RGB::named(LIGHT_GREEN)
        } else {
            RGB::named(WHITE)
        };
        ctx.print_color(
            4,
            BOARD_TOP + 2 + idx as i32,
            fg,
            RGB::named(BLACK),
            format!(
                "{}. {} - Ratio: {:.2} - Time Taken: {} seconds",
                idx + 1,
                record.username,
                record.success_ratio,
                record.elapsed_secs
            ),
        );
    }

    let footer_y = BOARD_TOP + 3 + standings.len() as i32;
    if let Some(record) = mine {
        let verdict = match outcome {
            Some(MergeOutcome::Improved { .. }) => " (new best)",
            Some(MergeOutcome::Kept { .. }) => " (best unchanged)",
            _ => "",
        };
        ctx.print_color(
            4,
            footer_y,
            RGB::named(LIGHT_CYAN),
            RGB::named(BLACK),
            format!(
                "This run: {:.2}% in {} seconds{verdict}",
                record.success_ratio, record.elapsed_secs
            ),
        );
    }
    ctx.print_color(
        4,
        footer_y + 2,
        RGB::named(GRAY),
        RGB::named(BLACK),
        "Enter to play again | Esc to quit",
    );
}

pub fn draw_log(ctx: &mut BTerm, log: &[String], start_y: i32) {
    let (width, _) = ctx.get_char_size();
    let width = width as i32;
    let height = (log.len() as i32).min(5) + 2;
    let top = (start_y - 1).max(0);
    ctx.draw_box(
        0,
        top,
        width - 1,
        height,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    ctx.print_color(
        2,
        top + 1,
        RGB::named(WHITE),
        RGB::named(BLACK),
        "Messages",
    );
    for (row, entry) in log.iter().take(5).enumerate() {
        ctx.print(2, top + 2 + row as i32, entry);
    }
}
