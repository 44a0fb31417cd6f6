//! Message formatting utilities for client display.

use syncwatch_server::infrastructure::dto::websocket::ErrorKindDto;

use crate::sync::{DropReason, SyncAction, SyncEvent, SyncPhase};

/// File picked with `load`
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedVideo {
    pub name: String,
    pub size: u64,
    pub duration: Option<f64>,
}

/// Everything `status` shows
pub struct StatusView<'a> {
    pub room_code: Option<&'a str>,
    pub is_host: bool,
    pub video: Option<&'a LoadedVideo>,
    pub host_video: Option<(&'a str, u64)>,
    pub position: f64,
    pub paused: bool,
    pub phase: SyncPhase,
}

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    pub fn format_room_created(room_code: &str) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str(&format!("Room created: {}\n", room_code));
        output.push_str("Share this code so others can join.\n");
        output.push_str("============================================================\n");
        output
    }

    pub fn format_room_joined(room_code: &str) -> String {
        format!("\n* Joined room {}\n", room_code)
    }

    pub fn format_user_joined(connection_id: &str) -> String {
        format!("\n+ {} joined\n", short_id(connection_id))
    }

    pub fn format_user_left(connection_id: &str) -> String {
        format!("\n- {} left\n", short_id(connection_id))
    }

    /// Format the host's file announcement, warning when the local file differs
    pub fn format_host_video(name: &str, size: u64, local: Option<&LoadedVideo>) -> String {
        let mut output = format!("\n# Host is playing '{}' ({})\n", name, format_size(size));
        match local {
            None => output.push_str("  Load the same file with 'load <PATH>' to follow along.\n"),
            Some(video) if video.name != name || video.size != size => output.push_str(&format!(
                "  Warning: your file is '{}' ({}); playback may not line up.\n",
                video.name,
                format_size(video.size)
            )),
            Some(_) => {}
        }
        output
    }

    pub fn format_video_loaded(video: &LoadedVideo) -> String {
        let duration = video
            .duration
            .map(|d| format!(", {}", format_clock(d)))
            .unwrap_or_default();
        format!(
            "\n# Loaded '{}' ({}{})\n",
            video.name,
            format_size(video.size),
            duration
        )
    }

    /// Format an event received from another member
    pub fn format_remote_event(event: &SyncEvent) -> String {
        format!("\n< {}\n", describe(event))
    }

    /// Format an event forwarded to the room
    pub fn format_sent_event(event: &SyncEvent) -> String {
        format!("\n> {}\n", describe(event))
    }

    pub fn format_not_forwarded() -> String {
        "\n(applied locally; not sent because the last sync was less than a second ago)\n"
            .to_string()
    }

    pub fn format_dropped(event: &SyncEvent, reason: DropReason) -> String {
        let why = match reason {
            DropReason::RateLimited => "too soon after the last sync",
            DropReason::NonFiniteTime => "invalid time",
        };
        format!("\n< {} (ignored: {})\n", describe(event), why)
    }

    pub fn format_deferred(event: &SyncEvent) -> String {
        format!(
            "\n< {} (will apply once a video is loaded)\n",
            describe(event)
        )
    }

    pub fn format_error(kind: ErrorKindDto, message: &str) -> String {
        let label = match kind {
            ErrorKindDto::RoomNotFound => "room not found",
            ErrorKindDto::NotAMember => "not a member",
            ErrorKindDto::InvalidPayload => "invalid request",
            ErrorKindDto::Internal => "server error",
        };
        format!("\n! Error ({}): {}\n", label, message)
    }

    pub fn format_notice(text: &str) -> String {
        format!("\n{}\n", text)
    }

    pub fn format_status(view: &StatusView<'_>) -> String {
        let mut output = String::new();
        output.push_str("\n------------------------------------------------------------\n");
        match view.room_code {
            Some(code) if view.is_host => output.push_str(&format!("Room:     {} (host)\n", code)),
            Some(code) => output.push_str(&format!("Room:     {}\n", code)),
            None => output.push_str("Room:     (none)\n"),
        }
        match view.video {
            Some(video) => output.push_str(&format!(
                "Video:    {} ({})\n",
                video.name,
                format_size(video.size)
            )),
            None => output.push_str("Video:    (none)\n"),
        }
        if let Some((name, size)) = view.host_video {
            output.push_str(&format!("Host has: {} ({})\n", name, format_size(size)));
        }
        output.push_str(&format!(
            "Playback: {} at {}\n",
            if view.paused { "paused" } else { "playing" },
            format_clock(view.position)
        ));
        output.push_str(&format!("Sync:     {:?}\n", view.phase));
        output.push_str("------------------------------------------------------------\n");
        output
    }
}

fn describe(event: &SyncEvent) -> String {
    match (event.action, event.is_playing) {
        (SyncAction::Play, _) => format!("play at {}", format_clock(event.time)),
        (SyncAction::Pause, _) => format!("pause at {}", format_clock(event.time)),
        (SyncAction::Seek, Some(true)) => format!("seek to {} (playing)", format_clock(event.time)),
        (SyncAction::Seek, Some(false)) => format!("seek to {} (paused)", format_clock(event.time)),
        (SyncAction::Seek, None) => format!("seek to {}", format_clock(event.time)),
    }
}

/// Connection ids are UUIDs; the first block is enough to tell people apart
fn short_id(connection_id: &str) -> &str {
    connection_id.split('-').next().unwrap_or(connection_id)
}

/// `h:mm:ss.s` or `m:ss.s`
pub fn format_clock(secs: f64) -> String {
    if !secs.is_finite() {
        return "--:--".to_string();
    }
    let tenths = (secs.max(0.0) * 10.0).round() as u64;
    let (hours, rest) = (tenths / 36_000, tenths % 36_000);
    let (minutes, rest) = (rest / 600, rest % 600);
    let (seconds, tenth) = (rest / 10, rest % 10);
    if hours > 0 {
        format!("{}:{:02}:{:02}.{}", hours, minutes, seconds, tenth)
    } else {
        format!("{}:{:02}.{}", minutes, seconds, tenth)
    }
}

/// Human-readable byte count (decimal units)
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1_000 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1_000.0;
    let mut unit = 0;
    while value >= 1_000.0 && unit < UNITS.len() - 1 {
        value /= 1_000.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        // テスト項目: 秒数が時計表記に変換される
        // given (前提条件):
        // when (操作):
        // then (期待する結果):
        assert_eq!(format_clock(0.0), "0:00.0");
        assert_eq!(format_clock(3.25), "0:03.3");
        assert_eq!(format_clock(754.0), "12:34.0");
        assert_eq!(format_clock(5400.5), "1:30:00.5");
        assert_eq!(format_clock(f64::NAN), "--:--");
    }

    #[test]
    fn test_format_size() {
        // テスト項目: バイト数が読みやすい単位に変換される
        // given (前提条件):
        // when (操作):
        // then (期待する結果):
        assert_eq!(format_size(999), "999 B");
        assert_eq!(format_size(50_000_000), "50.0 MB");
        assert_eq!(format_size(1_500_000_000), "1.5 GB");
    }

    #[test]
    fn test_format_host_video_warns_on_mismatch() {
        // テスト項目: ローカルのファイルがホストと異なる場合は警告が表示される
        // given (前提条件):
        let local = LoadedVideo {
            name: "other.mp4".to_string(),
            size: 10,
            duration: None,
        };
        let same = LoadedVideo {
            name: "movie.mp4".to_string(),
            size: 50_000_000,
            duration: None,
        };

        // when (操作):
        let mismatch = MessageFormatter::format_host_video("movie.mp4", 50_000_000, Some(&local));
        let matched = MessageFormatter::format_host_video("movie.mp4", 50_000_000, Some(&same));
        let missing = MessageFormatter::format_host_video("movie.mp4", 50_000_000, None);

        // then (期待する結果):
        assert!(mismatch.contains("Warning"));
        assert!(!matched.contains("Warning"));
        assert!(missing.contains("load <PATH>"));
    }

    #[test]
    fn test_format_user_joined_shortens_id() {
        // テスト項目: 接続 ID は先頭ブロックだけ表示される
        // given (前提条件):
        let id = "3f2b9c1e-8d7a-4c55-9e21-0a1b2c3d4e5f";

        // when (操作):
        let formatted = MessageFormatter::format_user_joined(id);

        // then (期待する結果):
        assert_eq!(formatted, "\n+ 3f2b9c1e joined\n");
    }
}
