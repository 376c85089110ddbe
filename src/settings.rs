use serde::{Deserialize, Serialize};

use crate::{easy_skip_chance, uci::EngineParams, Chance};

/// Who plays Black.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Two people share the board
    Pvp,
    BotEasy,
    BotMedium,
    BotHard,
}

impl Mode {
    pub fn difficulty(self) -> Option<Difficulty> {
        match self {
            Mode::Pvp => None,
            Mode::BotEasy => Some(Difficulty::Easy),
            Mode::BotMedium => Some(Difficulty::Medium),
            Mode::BotHard => Some(Difficulty::Hard),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Plies searched by the in-process opponent.
    pub fn search_depth(self) -> u8 {
        match self {
            Difficulty::Easy | Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn skip_chance(self) -> Option<Chance> {
        match self {
            Difficulty::Easy => Some(easy_skip_chance()),
            Difficulty::Medium | Difficulty::Hard => None,
        }
    }

    /// Search depth and skill level asked of the external engine.
    pub fn engine_params(self) -> EngineParams {
        match self {
            Difficulty::Easy => EngineParams { depth: 5, skill: 0 },
            Difficulty::Medium => EngineParams { depth: 10, skill: 5 },
            Difficulty::Hard => EngineParams { depth: 15, skill: 20 },
        }
    }
}

/// Which opponent answers in the bot modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpponentKind {
    /// The built-in alpha-beta search
    Minimax,
    /// An external UCI engine driven through `Session::engine_request`
    Engine,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player_white: String,
    pub player_black: String,
    pub mode: Mode,
    pub opponent: OpponentKind,
    pub sound_enabled: bool,
    /// Starting time on each side's clock
    pub clock_seconds: i32,
    /// 0 is silent and 10 is everything
    pub log_level: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            player_white: "Player 1".to_string(),
            player_black: "Computer".to_string(),
            mode: Mode::BotHard,
            opponent: OpponentKind::Minimax,
            sound_enabled: true,
            clock_seconds: 600,
            log_level: 0,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Settings, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn player_name(&self, color: chess::Color) -> &str {
        match color {
            chess::Color::White => &self.player_white,
            chess::Color::Black => &self.player_black,
        }
    }
}
