//! Line-oriented command protocol over one current snapshot.
//!
//! ```text
//! position json {"51":"wk","58":"bk"}
//! coverage
//! {"white":["41","42",...],"black":[...]}
//! ```

use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

use crate::analysis::{Analyzer, Hint};
use crate::board::{Board, Color};
use crate::config::AnalysisConfig;
use crate::defense::is_defended;
use crate::error::CoverageError;
use crate::safety::{is_move_safe_with, would_capture_be_safe_with, HintKind};
use crate::square::Square;
use crate::threat::classify_threat;

pub struct Session {
    board: Board,
    analyzer: Analyzer,
    debug: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl Session {
    pub fn new(config: AnalysisConfig) -> Self {
        Session {
            board: Board::startpos(),
            analyzer: Analyzer::new(config),
            debug: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.analyzer.config()
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut out = stdout.lock();

        for line in stdin.lock().lines() {
            let command = line?;
            let command = command.trim();
            if !command.is_empty() && !self.handle_command(command, &mut out)? {
                break;
            }
            out.flush()?;
        }

        Ok(())
    }

    /// Executes one command, writing any reply to `out`. Returns `false` on `quit`.
    pub fn handle_command(&mut self, command: &str, out: &mut impl Write) -> io::Result<bool> {
        let (name, rest) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let reply = match name {
            "quit" => return Ok(false),
            "isready" => Ok("readyok".to_string()),
            "position" => self.position(rest),
            "coverage" => json(&self.analyzer.coverage(&self.board)),
            "threat" => self.square_and_color(&args).and_then(|(square, color)| {
                json(&classify_threat(square, &self.board, color))
            }),
            "defended" => self
                .square_and_color(&args)
                .map(|(square, color)| is_defended(square, &self.board, color).to_string()),
            "capture" => self.square_and_color(&args).map(|(square, color)| {
                would_capture_be_safe_with(square, &self.board, color, self.analyzer.config())
                    .to_string()
            }),
            "move" => self.square_and_color(&args).map(|(square, color)| {
                is_move_safe_with(square, &self.board, color, self.analyzer.config()).to_string()
            }),
            "report" => self.report(&args),
            "setoption" => self.setoption(&args),
            "debug" => {
                self.debug = args.first() == Some(&"on");
                Ok(String::new())
            }
            "d" => Ok(format!("{}\nFen: {}", self.board, self.board.to_fen())),
            _ => Err(format!("unknown command: {}", command)),
        };

        match reply {
            Ok(text) if text.is_empty() => {}
            Ok(text) => writeln!(out, "{}", text)?,
            Err(message) => {
                warn!(%command, %message, "command rejected");
                writeln!(out, "error {}", message)?;
                if self.debug {
                    writeln!(out, "info string rejected: {}", command)?;
                }
            }
        }

        Ok(true)
    }

    fn position(&mut self, rest: &str) -> Result<String, String> {
        let (kind, body) = match rest.split_once(char::is_whitespace) {
            Some((kind, body)) => (kind, body.trim()),
            None => (rest, ""),
        };

        let board = match kind {
            "startpos" => Board::startpos(),
            "fen" => Board::from_fen(body).map_err(|e| e.to_string())?,
            "json" => Board::from_json(body).map_err(|e| e.to_string())?,
            _ => return Err(format!("unknown position source: {:?}", kind)),
        };

        let fen = board.to_fen();
        debug!(%fen, pieces = board.piece_count(), "position set");
        self.board = board;
        Ok(self.info(format!("position {}", fen)))
    }

    fn setoption(&mut self, args: &[&str]) -> Result<String, String> {
        // setoption name <flag> value <true|false>
        let (name, value) = match args {
            ["name", name, "value", value] => (*name, *value),
            _ => return Err("usage: setoption name <flag> value <true|false>".to_string()),
        };
        let value: bool = value.parse().map_err(|_| format!("invalid value: {}", value))?;

        let mut config = *self.analyzer.config();
        if !config.set_option(name, value) {
            return Err(format!("unknown option: {}", name));
        }
        self.analyzer.set_config(config);
        debug!(option = name, value, "option set");
        Ok(self.info(format!("option {} = {}", name, value)))
    }

    /// An `info string` reply, only when debug output is on.
    fn info(&self, message: String) -> String {
        if self.debug {
            format!("info string {}", message)
        } else {
            String::new()
        }
    }

    fn report(&self, args: &[&str]) -> Result<String, String> {
        let (color, hints) = args
            .split_first()
            .ok_or("usage: report <w|b> [move:<sq>|capture:<sq> ...]")?;
        let player: Color = color.parse()?;

        let hints = hints
            .iter()
            .map(|hint| parse_hint(hint))
            .collect::<Result<Vec<_>, _>>()?;

        json(&self.analyzer.analyze(&self.board, player, &hints))
    }

    fn square_and_color(&self, args: &[&str]) -> Result<(Square, Color), String> {
        match args {
            [square, color] => {
                let square: Square = square.parse().map_err(|e: CoverageError| e.to_string())?;
                let color: Color = color.parse()?;
                Ok((square, color))
            }
            _ => Err("expected <square> <w|b>".to_string()),
        }
    }
}

fn parse_hint(hint: &str) -> Result<Hint, String> {
    let (kind, square) = hint
        .split_once(':')
        .ok_or_else(|| format!("invalid hint: {}", hint))?;
    let kind = match kind {
        "move" => HintKind::Move,
        "capture" => HintKind::Capture,
        _ => return Err(format!("invalid hint kind: {}", kind)),
    };
    let square: Square = square.parse().map_err(|e: CoverageError| e.to_string())?;
    Ok(Hint::new(square, kind))
}

fn json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(session: &mut Session, command: &str) -> String {
        let mut out = Vec::new();
        assert!(session.handle_command(command, &mut out).unwrap());
        String::from_utf8(out).unwrap().trim_end().to_string()
    }

    #[test]
    fn json_position_and_coverage() {
        let mut session = Session::default();
        assert_eq!(run(&mut session, r#"position json {"12": "wp"}"#), "");
        assert_eq!(run(&mut session, "coverage"), r#"{"white":["23"],"black":[]}"#);
    }

    #[test]
    fn threat_and_capture_queries() {
        let mut session = Session::default();
        run(&mut session, r#"position json {"42": "wk", "51": "bp", "81": "bq"}"#);
        assert_eq!(run(&mut session, "capture 51 w"), "false");
        assert_eq!(run(&mut session, "defended 51 w"), "false");
        assert_eq!(
            run(&mut session, "threat 71 b"),
            r#"{"king_threat":false,"other_threat":true}"#
        );

        run(&mut session, "setoption name capture_simulation value false");
        assert!(!session.config().capture_simulation);
        assert_eq!(run(&mut session, "capture 51 w"), "true");
    }

    #[test]
    fn report_lists_hint_verdicts() {
        let mut session = Session::default();
        run(&mut session, r#"position json {"42": "wk", "51": "bp", "81": "bq"}"#);
        let reply = run(&mut session, "report w capture:51 move:33");
        let report: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(report["hints"][0]["verdict"], "danger");
        assert_eq!(report["hints"][1]["verdict"], "safe");
    }

    #[test]
    fn errors_do_not_end_the_session() {
        let mut session = Session::default();
        assert!(run(&mut session, "threat 99 w").starts_with("error "));
        assert!(run(&mut session, "position json {\"11\": \"zz\"}").starts_with("error "));
        assert!(run(&mut session, "frobnicate").starts_with("error "));
        assert_eq!(run(&mut session, "isready"), "readyok");
    }

    #[test]
    fn debug_mode_reports_state_changes() {
        let mut session = Session::default();
        assert_eq!(run(&mut session, r#"position json {"51": "wk"}"#), "");

        run(&mut session, "debug on");
        assert_eq!(
            run(&mut session, r#"position json {"51": "wk"}"#),
            "info string position 8/8/8/8/8/8/8/4K3"
        );
        assert_eq!(
            run(&mut session, "setoption name pin_filtering value false"),
            "info string option pin_filtering = false"
        );
        let rejected = run(&mut session, "frobnicate");
        assert!(rejected.starts_with("error "));
        assert!(rejected.ends_with("info string rejected: frobnicate"));

        run(&mut session, "debug off");
        assert_eq!(run(&mut session, "position startpos"), "");
    }

    #[test]
    fn quit_stops() {
        let mut session = Session::default();
        let mut out = Vec::new();
        assert!(!session.handle_command("quit", &mut out).unwrap());
    }

    #[test]
    fn fen_position() {
        let mut session = Session::default();
        run(&mut session, "position fen 8/8/8/8/8/8/8/R7 w - - 0 1");
        assert_eq!(session.board().piece_count(), 1);
        assert!(run(&mut session, "d").contains("Fen: 8/8/8/8/8/8/8/R7"));
    }
}
