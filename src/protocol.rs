//! Line-oriented text protocol for driving the engine from another process.
//!
//! The framing follows GTP: one command per line, an optional numeric id in
//! front, and replies of the form `=id message` on success or `?id message`
//! on failure, each wrapped in blank lines. Coordinates are matrix
//! coordinates `x y` (column, row).
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`, `quit`
//! - `boardsize <n>` - Start a new game with `n` platforms per side
//! - `clear_board` - Restart the current game
//! - `move <x> <y>` - Move the pawn of the player to move
//! - `wall <h|v> <x> <y>` - Place a wall centred on junction `(x, y)`
//! - `genmove [iterations]` - Search, play and print an action
//! - `undo`, `redo` - Step through the action log
//! - `valid_moves` - Pawn destinations for the player to move
//! - `winner` - `P1`, `P2` or `none`
//! - `showboard` - Text rendering of the position
//! - `snapshot`, `loadsnapshot <json>` - Export or replace the full state
//! - `record`, `loadrecord <json>` - Export or replay the action log
//!
//! ## Example
//!
//! ```ignore
//! use quoridor_rust::protocol::ProtocolEngine;
//! let mut engine = ProtocolEngine::new(Default::default())?;
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use fastrand::Rng;
use log::info;

use crate::action::{Action, Orientation, Wall};
use crate::board::Coord;
use crate::config::SearchConfig;
use crate::constants::DEFAULT_SIZE;
use crate::error::{Error, Result};
use crate::game::GameState;
use crate::history::ActionLog;
use crate::mcts::search_with_rng;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "known_command",
    "list_commands",
    "loadrecord",
    "loadsnapshot",
    "move",
    "name",
    "protocol_version",
    "quit",
    "record",
    "redo",
    "showboard",
    "snapshot",
    "undo",
    "valid_moves",
    "version",
    "wall",
];

/// Protocol engine state.
pub struct ProtocolEngine {
    game: GameState,
    log: ActionLog,
    config: SearchConfig,
    rng: Rng,
}

impl ProtocolEngine {
    /// Create an engine on a default-size board.
    pub fn new(config: SearchConfig) -> Result<Self> {
        Self::with_size(DEFAULT_SIZE, config)
    }

    /// Create an engine on a board with `size` platforms per side.
    pub fn with_size(size: usize, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        Ok(Self {
            game: GameState::with_size(size)?,
            log: ActionLog::new(),
            config,
            rng,
        })
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// Run the command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Answer commands from `input` on `output` until `quit` or end of input.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let Some((id, command, args)) = Self::parse_line(&line) else {
                continue;
            };
            let args: Vec<&str> = args.iter().map(String::as_str).collect();

            let (success, message) = self.execute(&command, &args);
            output.write_all(format_reply(id, success, &message).as_bytes())?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split a line into its id, lowercased command name and arguments.
    ///
    /// Blank lines and `#` comments yield `None`.
    fn parse_line(line: &str) -> Option<(Option<u32>, String, Vec<String>)> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (id, command_line) = Self::parse_id(line);
        let mut parts = command_line.split_whitespace();
        let command = parts.next()?.to_lowercase();
        Some((id, command, parts.map(str::to_string).collect()))
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(name) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&name.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(size) = arg.parse::<usize>() else {
                    return (false, "invalid size".to_string());
                };
                reply(GameState::new(size, self.game.turn_order()).map(|game| {
                    self.game = game;
                    self.log.clear();
                    String::new()
                }))
            }

            "clear_board" => {
                self.game.restart();
                self.log.clear();
                (true, String::new())
            }

            "move" => {
                let Some(to) = parse_coord(args) else {
                    return (false, "expected: move <x> <y>".to_string());
                };
                let from = self.game.current_player().position();
                reply(self.play(Action::Move { from, to }).map(|_| String::new()))
            }

            "wall" => {
                let orientation = match args.first().map(|s| s.to_lowercase()).as_deref() {
                    Some("h") => Orientation::Horizontal,
                    Some("v") => Orientation::Vertical,
                    _ => return (false, "expected: wall <h|v> <x> <y>".to_string()),
                };
                let Some(center) = parse_coord(&args[1..]) else {
                    return (false, "expected: wall <h|v> <x> <y>".to_string());
                };
                reply(
                    Wall::new(orientation, center)
                        .and_then(|wall| self.play(Action::Block(wall)))
                        .map(|_| String::new()),
                )
            }

            "genmove" => {
                let mut config = self.config.clone();
                if let Some(arg) = args.first() {
                    match arg.parse::<usize>() {
                        Ok(n) => config.iterations = n,
                        Err(_) => return (false, "invalid iteration count".to_string()),
                    }
                }
                reply(self.genmove(&config))
            }

            "undo" => match self.log.previous() {
                Some(action) => {
                    self.game.undo_action(&action);
                    (true, String::new())
                }
                None => (false, "nothing to undo".to_string()),
            },

            "redo" => match self.log.next() {
                Some(action) => {
                    self.game.do_action(&action);
                    (true, String::new())
                }
                None => (false, "nothing to redo".to_string()),
            },

            "valid_moves" => {
                let moves: Vec<String> = self
                    .game
                    .valid_moves(true)
                    .into_iter()
                    .map(|(x, y)| format!("{x},{y}"))
                    .collect();
                (true, moves.join(" "))
            }

            "winner" => match self.game.check_winner(false) {
                Some(winner) => (true, winner.to_string()),
                None => (true, "none".to_string()),
            },

            "showboard" => (true, format!("\n{}", self.game)),

            "snapshot" => reply(self.game.to_json()),

            "loadsnapshot" => {
                let json = args.join(" ");
                reply(GameState::from_json(&json).map(|game| {
                    self.game = game;
                    self.log.clear();
                    String::new()
                }))
            }

            "record" => reply(self.log.to_json()),

            "loadrecord" => {
                let json = args.join(" ");
                reply(self.load_record(&json).map(|n| n.to_string()))
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }

    /// Apply a checked action and record it.
    fn play(&mut self, action: Action) -> Result<()> {
        self.game.try_action(&action)?;
        self.log.record(action);
        Ok(())
    }

    fn genmove(&mut self, config: &SearchConfig) -> Result<String> {
        let result = search_with_rng(&self.game, config, &mut self.rng, |_| {})?;
        info!(
            "{} plays {} ({} visits)",
            self.game.current_turn(),
            result.action,
            result.visits
        );
        self.game = result.state;
        self.log.record(result.action);
        Ok(command_for(&result.action))
    }

    /// Replay a JSON record from a fresh board; returns the number of actions.
    ///
    /// Nothing changes unless every action in the record is legal in turn.
    fn load_record(&mut self, json: &str) -> Result<usize> {
        let mut log = ActionLog::from_json(json)?;
        let mut game = self.game.clone();
        game.restart();
        let mut applied = 0;
        while let Some(action) = log.next() {
            game.try_action(&action).map_err(|e| Error::InvalidRecord {
                reason: format!("action {applied}: {e}"),
            })?;
            applied += 1;
        }
        self.game = game;
        self.log = log;
        Ok(applied)
    }
}

/// Frame one response: `=` or `?`, the echoed id, the message, then a blank
/// line. A blank line also precedes it.
fn format_reply(id: Option<u32>, success: bool, message: &str) -> String {
    let prefix = if success { '=' } else { '?' };
    let id = id.map(|i| i.to_string()).unwrap_or_default();
    format!("\n{prefix}{id} {message}\n\n")
}

fn reply(result: Result<String>) -> (bool, String) {
    match result {
        Ok(message) => (true, message),
        Err(e) => (false, e.to_string()),
    }
}

fn parse_coord(args: &[&str]) -> Option<Coord> {
    match args {
        [x, y, ..] => Some((x.parse().ok()?, y.parse().ok()?)),
        _ => None,
    }
}

/// The command that would replay `action`.
fn command_for(action: &Action) -> String {
    match action {
        Action::Move { to, .. } => format!("move {} {}", to.0, to.1),
        Action::Block(wall) => format!("wall {wall}"),
    }
}
