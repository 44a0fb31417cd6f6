//! Parsing of interactive commands.

use crate::error::CommandError;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create,
    Join { room_code: String },
    Load { path: String, duration: Option<f64> },
    Play,
    Pause,
    Seek { time: f64 },
    Status,
    Help,
}

impl Command {
    /// Parse one input line. Command names are case-insensitive.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Err(CommandError::Unknown(String::new()));
        };
        let args: Vec<&str> = parts.collect();

        match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("create", []) => Ok(Command::Create),
            ("create", _) => Err(CommandError::Usage("create")),
            ("join", [code]) => Ok(Command::Join {
                room_code: code.to_string(),
            }),
            ("join", _) => Err(CommandError::Usage("join <CODE>")),
            ("load", [path]) => Ok(Command::Load {
                path: path.to_string(),
                duration: None,
            }),
            ("load", [path, duration]) => Ok(Command::Load {
                path: path.to_string(),
                duration: Some(parse_seconds(duration)?),
            }),
            ("load", _) => Err(CommandError::Usage("load <PATH> [DURATION_SECS]")),
            ("play", []) => Ok(Command::Play),
            ("pause", []) => Ok(Command::Pause),
            ("seek", [time]) => Ok(Command::Seek {
                time: parse_seconds(time)?,
            }),
            ("seek", _) => Err(CommandError::Usage("seek <SECS>")),
            ("status", []) => Ok(Command::Status),
            ("help", _) | ("?", _) => Ok(Command::Help),
            ("play", _) | ("pause", _) | ("status", _) => {
                Err(CommandError::Usage("play | pause | status"))
            }
            _ => Err(CommandError::Unknown(name.to_string())),
        }
    }
}

/// Non-negative, finite seconds
fn parse_seconds(text: &str) -> Result<f64, CommandError> {
    match text.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(secs),
        _ => Err(CommandError::InvalidSeconds(text.to_string())),
    }
}

/// Text printed by `help`
pub const HELP: &str = "\
Commands:
  create                        create a room and become its host
  join <CODE>                   join a room by code
  load <PATH> [DURATION_SECS]   load a local video file (only name and size are shared)
  play | pause                  control playback for everyone in the room
  seek <SECS>                   jump to a position
  status                        show room, video and playback state
  help                          show this help";
