//! HUD text model
//!
//! Built from the game state at render time; no HUD text is stored in the
//! simulation.

use crate::color::Color;
use crate::consts::{CANVAS_SIZE, SIM_DT};
use crate::sim::GameState;

/// Rating shown after a lost ball, one step per five combo hits
pub const COMBO_MESSAGES: [&str; 10] = [
    "lame...",
    "ok, i guess?",
    "getting somewhere!",
    "nice!",
    "stylish!",
    "epic!",
    "crushing!",
    "supreme!",
    "legendary!",
    "élégant!",
];

/// HUD font size in canvas pixels
pub const FONT_SIZE: f32 = 50.0;

/// One line of HUD text
#[derive(Debug, Clone, PartialEq)]
pub struct HudLine {
    pub id: &'static str,
    pub text: String,
    pub color: Color,
    /// Center of the text in canvas pixels, y down
    pub pos: (f32, f32),
}

/// Message for a given combo
pub fn combo_message(last_combo: u32) -> &'static str {
    let index = (last_combo / 5) as usize;
    COMBO_MESSAGES[index.min(COMBO_MESSAGES.len() - 1)]
}

/// All HUD lines visible this frame
pub fn hud_lines(state: &GameState) -> Vec<HudLine> {
    let score = &state.score;
    let (width, height) = (CANVAS_SIZE.0 as f32, CANVAS_SIZE.1 as f32);
    let mut lines = Vec::with_capacity(4);

    lines.push(HudLine {
        id: "hud-score",
        text: format!("Score: {}", score.score),
        color: Color::WHITE,
        pos: (width / 4.0, 70.0),
    });

    if score.combo > 0 {
        lines.push(HudLine {
            id: "hud-combo",
            text: format!("{}x Combo!", score.combo),
            color: Color::hsl(60.0 / 360.0, 1.0, 0.5),
            pos: (width / 2.0, 70.0),
        });
    }

    if score.combo_message_ticks > 0 {
        let time = state.time_ticks as f32 * SIM_DT;
        lines.push(HudLine {
            id: "hud-combo-message",
            text: format!("That combo was {}", combo_message(score.last_combo)),
            color: Color::hsl((time * 90.0 / 360.0).rem_euclid(1.0), 1.0, 0.5),
            pos: (width / 2.0, height / 2.0),
        });
    }

    if state.ball.is_none() {
        let text = if score.bricks_left == 0 {
            "You won! (Click to restart the game)"
        } else {
            "Click to spawn the ball!"
        };
        lines.push(HudLine {
            id: "hud-prompt",
            text: text.to_string(),
            color: Color::WHITE,
            pos: (width / 2.0, height / 2.0 - 50.0),
        });
    }

    lines
}

/// Element ids the HUD may use, for hiding lines that are not shown
pub const HUD_IDS: [&str; 4] = ["hud-score", "hud-combo", "hud-combo-message", "hud-prompt"];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};

    fn texts(state: &GameState) -> Vec<String> {
        hud_lines(state).into_iter().map(|l| l.text).collect()
    }

    #[test]
    fn test_combo_message_buckets() {
        assert_eq!(combo_message(0), "lame...");
        assert_eq!(combo_message(4), "lame...");
        assert_eq!(combo_message(5), "ok, i guess?");
        assert_eq!(combo_message(49), "élégant!");
        assert_eq!(combo_message(1000), "élégant!");
    }

    #[test]
    fn test_fresh_level_prompts_spawn() {
        let state = GameState::new(1);
        assert_eq!(texts(&state), vec!["Score: 0", "Click to spawn the ball!"]);
    }

    #[test]
    fn test_combo_shown_while_playing() {
        let mut state = GameState::new(1);
        state.spawn_ball();
        state.break_brick(0);
        state.break_brick(0);
        let lines = hud_lines(&state);
        assert_eq!(lines[0].text, "Score: 3");
        assert_eq!(lines[1].text, "2x Combo!");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_combo_message_after_loss() {
        let mut state = GameState::new(1);
        state.spawn_ball();
        state.score.combo = 11;
        state.lose_ball();
        let texts = texts(&state);
        assert!(texts.contains(&"That combo was getting somewhere!".to_string()));
        assert!(texts.contains(&"Click to spawn the ball!".to_string()));

        for _ in 0..crate::consts::COMBO_MESSAGE_TICKS {
            tick(&mut state, &TickInput::default());
        }
        assert!(!hud_lines(&state).iter().any(|l| l.id == "hud-combo-message"));
    }

    #[test]
    fn test_win_prompt() {
        let mut state = GameState::new(1);
        while !state.bricks.is_empty() {
            state.break_brick(0);
        }
        tick(&mut state, &TickInput::default());
        assert!(texts(&state).contains(&"You won! (Click to restart the game)".to_string()));
    }
}
