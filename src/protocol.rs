//! Line-oriented text protocol for driving the agent.
//!
//! The command syntax follows GTP conventions: one command per line, an
//! optional numeric id in front, and responses of the form `=id message` on
//! success or `?id message` on failure, each followed by a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `clear_board` - Reset to the empty board
//! - `play <coord|direction>` - Play a move for the side to move (`D5`, `NNE`)
//! - `genmove` - Let the agent choose and play a move for the side to move
//! - `showboard` - Print the board
//! - `heuristic <name>` - Select the agent's evaluation function
//! - `depth <n>` - Set the agent's search depth
//! - `time_limit <ms>` - Set the time budget of `genmove`
//!
//! ## Example
//!
//! ```ignore
//! use knight_isolation::protocol::Engine;
//! let mut engine = Engine::new();
//! engine.run(std::io::stdin().lock(), std::io::stdout())?;
//! ```

use std::io::{self, BufRead, Write};
use std::time::Duration;

use fastrand::Rng;

use crate::agent::{AgentConfig, CustomPlayer};
use crate::constants::TIME_LIMIT_MS;
use crate::heuristics::HeuristicKind;
use crate::isolation::{Action, Direction, Isolation, parse_coord, str_coord};
use crate::play::take_turn;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "clear_board",
    "depth",
    "genmove",
    "heuristic",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "time_limit",
    "version",
];

/// Protocol engine state.
pub struct Engine {
    /// Current game position
    state: Isolation,
    /// Settings handed to the agent on every `genmove`
    config: AgentConfig,
    /// Time budget per generated move
    time_limit: Duration,
    /// Seeds each agent instance
    rng: Rng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(AgentConfig::default())
    }

    pub fn with_config(config: AgentConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        Self {
            state: Isolation::new(),
            config,
            time_limit: Duration::from_millis(TIME_LIMIT_MS),
            rng,
        }
    }

    /// Current position.
    pub fn state(&self) -> &Isolation {
        &self.state
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end == 0 {
            return (None, trimmed);
        }
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Resolve a move argument to an action for the side to move.
    fn parse_action(&self, arg: &str) -> Option<Action> {
        if let Some(dest) = parse_coord(arg) {
            return self.state.action_to(dest);
        }
        Direction::from_name(arg)
            .map(Action::Jump)
            .filter(|a| self.state.actions().contains(a))
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "clear_board" => {
                self.state = Isolation::new();
                (true, String::new())
            }

            "showboard" => (true, format!("\n{}", self.state)),

            "heuristic" => {
                let Some(name) = args.first() else {
                    return (true, self.config.heuristic.to_string());
                };
                match name.parse::<HeuristicKind>() {
                    Ok(kind) => {
                        self.config.heuristic = kind;
                        (true, String::new())
                    }
                    Err(e) => (false, e),
                }
            }

            "depth" => {
                let Some(arg) = args.first() else {
                    return (true, self.config.depth.to_string());
                };
                match arg.parse::<u32>() {
                    Ok(depth) if depth >= 1 => {
                        self.config.depth = depth;
                        (true, String::new())
                    }
                    _ => (false, "depth must be a positive integer".to_string()),
                }
            }

            "time_limit" => {
                let Some(arg) = args.first() else {
                    return (true, self.time_limit.as_millis().to_string());
                };
                match arg.parse::<u64>() {
                    Ok(ms) if ms > 0 => {
                        self.time_limit = Duration::from_millis(ms);
                        (true, String::new())
                    }
                    _ => (false, "time limit must be a positive number of milliseconds".to_string()),
                }
            }

            "play" => {
                let Some(arg) = args.last() else {
                    return (false, "missing argument".to_string());
                };
                if self.state.terminal_test() {
                    return (false, "game is over".to_string());
                }
                let Some(action) = self.parse_action(arg) else {
                    return (false, "illegal move".to_string());
                };
                match self.state.result(action) {
                    Ok(next) => {
                        self.state = next;
                        (true, String::new())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => {
                if self.state.terminal_test() {
                    return (true, "resign".to_string());
                }
                let config = AgentConfig {
                    seed: Some(self.rng.u64(..)),
                    ..self.config.clone()
                };
                let mut agent = CustomPlayer::with_config(self.state.player(), config);
                let action = match take_turn(&mut agent, &self.state, self.time_limit) {
                    Ok(action) => action,
                    Err(reason) => return (false, format!("no move: {reason:?}")),
                };
                let Some(dest) = self.state.destination(action) else {
                    return (false, format!("agent chose an unusable move {action}"));
                };
                match self.state.result(action) {
                    Ok(next) => {
                        self.state = next;
                        (true, str_coord(dest))
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Engine {
        Engine::with_config(AgentConfig {
            seed: Some(3),
            ..AgentConfig::default()
        })
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = Engine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = Engine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_name_command() {
        let mut engine = seeded();
        let (success, response) = engine.execute("name", &[]);
        assert!(success);
        assert_eq!(response, "knight-isolation");
    }

    #[test]
    fn test_known_command() {
        let mut engine = seeded();
        assert_eq!(engine.execute("known_command", &["genmove"]), (true, "true".to_string()));
        assert_eq!(engine.execute("known_command", &["boardsize"]), (true, "false".to_string()));
        assert!(!engine.execute("known_command", &[]).0);
    }

    #[test]
    fn test_play_and_clear() {
        let mut engine = seeded();
        assert!(engine.execute("play", &["D5"]).0);
        assert!(engine.execute("play", &["F5"]).0);
        // D5 to E7 is a knight jump (NNE); D5 to D6 is not.
        assert!(!engine.execute("play", &["D6"]).0);
        assert!(engine.execute("play", &["nne"]).0);
        assert_eq!(engine.state().ply_count(), 3);
        assert_eq!(engine.state().loc(crate::isolation::PlayerId::FIRST), parse_coord("E7"));

        assert!(engine.execute("clear_board", &[]).0);
        assert_eq!(engine.state().ply_count(), 0);
    }

    #[test]
    fn test_genmove_plays_legal_move() {
        let mut engine = seeded();
        let (success, response) = engine.execute("genmove", &[]);
        assert!(success);
        let dest = parse_coord(&response).unwrap();
        assert_eq!(engine.state().ply_count(), 1);
        assert_eq!(engine.state().loc(crate::isolation::PlayerId::FIRST), Some(dest));
    }

    #[test]
    fn test_settings() {
        let mut engine = seeded();
        assert!(engine.execute("heuristic", &["central"]).0);
        assert_eq!(engine.execute("heuristic", &[]), (true, "central".to_string()));
        assert!(!engine.execute("heuristic", &["magic"]).0);

        assert!(engine.execute("depth", &["3"]).0);
        assert_eq!(engine.execute("depth", &[]), (true, "3".to_string()));
        assert!(!engine.execute("depth", &["0"]).0);

        assert!(engine.execute("time_limit", &["500"]).0);
        assert_eq!(engine.execute("time_limit", &[]), (true, "500".to_string()));
        assert!(!engine.execute("time_limit", &["soon"]).0);
    }

    #[test]
    fn test_run_loop() {
        let input = "1 name\n\n# comment\nplay A1\n2 showboard\nbogus\nquit\nname\n";
        let mut output = Vec::new();
        seeded().run(input.as_bytes(), &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.starts_with("=1 knight-isolation\n\n"));
        assert!(text.contains("=2 \n"));
        assert!(text.contains("? unknown command: bogus"));
        // Nothing is answered after quit.
        assert_eq!(text.matches("knight-isolation").count(), 1);
    }
}
