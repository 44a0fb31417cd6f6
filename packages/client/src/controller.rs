//! Client-side watch party state: room membership, the loaded file, the
//! player and its sync engine.
//!
//! The controller never touches the network. Every input produces a
//! [`Reaction`] that the session carries out: frames to send, lines to print
//! and at most one settle timer to (re)arm.

use std::{path::Path, time::Duration};

use syncwatch_server::infrastructure::dto::websocket::{
    ClientMessage, ErrorKindDto, PlaybackActionDto, ServerMessage,
};
use syncwatch_shared::time::Clock;

use crate::{
    command::{Command, HELP},
    error::CommandError,
    formatter::{LoadedVideo, MessageFormatter, StatusView},
    sync::{
        LocalOutcome, ReconcilePlan, RemoteOutcome, SettleTicket, SimulatedPlayer, SyncAction,
        SyncEngine, SyncEvent, VideoElement,
    },
};

#[derive(Debug, Clone, PartialEq)]
struct RoomMembership {
    code: String,
    is_host: bool,
}

/// Side effects requested by the controller
#[derive(Debug, Default, PartialEq)]
pub struct Reaction {
    pub outgoing: Vec<ClientMessage>,
    pub output: Vec<String>,
    pub settle: Option<(SettleTicket, Duration)>,
}

impl Reaction {
    fn print(&mut self, line: String) {
        self.output.push(line);
    }
}

pub struct WatchController<C: Clock + Clone> {
    engine: SyncEngine<C>,
    player: SimulatedPlayer<C>,
    room: Option<RoomMembership>,
    /// A create/join was sent and not yet answered
    awaiting_room: bool,
    video: Option<LoadedVideo>,
    host_video: Option<(String, u64)>,
}

impl<C: Clock + Clone> WatchController<C> {
    pub fn new(clock: C) -> Self {
        Self {
            engine: SyncEngine::new(clock.clone()),
            player: SimulatedPlayer::new(clock),
            room: None,
            awaiting_room: false,
            video: None,
            host_video: None,
        }
    }

    pub fn room_code(&self) -> Option<&str> {
        self.room.as_ref().map(|room| room.code.as_str())
    }

    pub fn engine(&self) -> &SyncEngine<C> {
        &self.engine
    }

    pub fn player(&self) -> &SimulatedPlayer<C> {
        &self.player
    }

    /// A new connection is up. Rejoin the room we were in, if any.
    pub fn on_connected(&mut self) -> Reaction {
        // A create/join sent on a dropped connection is never answered.
        self.awaiting_room = false;
        let mut reaction = Reaction::default();
        if let Some(room) = &self.room {
            tracing::info!("Rejoining room {}", room.code);
            reaction.outgoing.push(ClientMessage::JoinRoom {
                room_code: room.code.clone(),
            });
        }
        reaction
    }

    pub fn on_server_message(&mut self, message: ServerMessage) -> Reaction {
        let mut reaction = Reaction::default();
        match message {
            ServerMessage::RoomCreated { room_code } => {
                self.awaiting_room = false;
                reaction.print(MessageFormatter::format_room_created(&room_code));
                self.room = Some(RoomMembership {
                    code: room_code,
                    is_host: true,
                });
                self.host_video = None;
                self.announce_video(&mut reaction);
            }
            ServerMessage::RoomJoined { room_code } => {
                self.awaiting_room = false;
                reaction.print(MessageFormatter::format_room_joined(&room_code));
                let rejoined = self.room.as_ref().is_some_and(|room| room.code == room_code);
                if rejoined {
                    // The relay forwards this to current members only: after a
                    // reconnect the host has a new connection id, so the room
                    // does not remember it for later joiners
                    self.announce_video(&mut reaction);
                } else {
                    self.room = Some(RoomMembership {
                        code: room_code,
                        is_host: false,
                    });
                    self.host_video = None;
                }
            }
            ServerMessage::UserJoined { connection_id } => {
                reaction.print(MessageFormatter::format_user_joined(&connection_id));
            }
            ServerMessage::UserLeft { connection_id } => {
                reaction.print(MessageFormatter::format_user_left(&connection_id));
            }
            ServerMessage::HostVideoInfo { name, size } => {
                reaction.print(MessageFormatter::format_host_video(
                    &name,
                    size,
                    self.video.as_ref(),
                ));
                self.host_video = Some((name, size));
            }
            ServerMessage::VideoAction {
                action,
                time,
                is_playing,
            } => {
                let event = SyncEvent {
                    action: from_dto(action),
                    time,
                    is_playing,
                };
                self.on_remote(event, &mut reaction);
            }
            ServerMessage::PlaybackState { time, is_playing } => {
                let event = SyncEvent {
                    action: SyncAction::Seek,
                    time,
                    is_playing: Some(is_playing),
                };
                self.on_remote(event, &mut reaction);
            }
            ServerMessage::Error { kind, message } => {
                self.awaiting_room = false;
                reaction.print(MessageFormatter::format_error(kind, &message));
                // The room we tried to (re)join is gone
                if kind == ErrorKindDto::RoomNotFound {
                    self.room = None;
                    self.host_video = None;
                }
            }
        }
        reaction
    }

    /// Execute a user command.
    pub fn on_command(&mut self, command: Command) -> Result<Reaction, CommandError> {
        let mut reaction = Reaction::default();
        match command {
            Command::Create => {
                self.require_no_room()?;
                self.awaiting_room = true;
                reaction.outgoing.push(ClientMessage::CreateRoom);
            }
            Command::Join { room_code } => {
                self.require_no_room()?;
                self.awaiting_room = true;
                reaction.outgoing.push(ClientMessage::JoinRoom { room_code });
            }
            Command::Load { path, duration } => {
                let video = probe_file(&path, duration)?;
                return Ok(self.load_video(video));
            }
            Command::Play => {
                self.require_video()?;
                self.player.play();
                self.pump_element_events(&mut reaction);
            }
            Command::Pause => {
                self.require_video()?;
                self.player.pause();
                self.pump_element_events(&mut reaction);
            }
            Command::Seek { time } => {
                self.require_video()?;
                self.player.seek(time);
                self.pump_element_events(&mut reaction);
            }
            Command::Status => reaction.print(MessageFormatter::format_status(&self.status())),
            Command::Help => reaction.print(MessageFormatter::format_notice(HELP)),
        }
        Ok(reaction)
    }

    /// Load a local file into the player and announce it if we host the room.
    pub fn load_video(&mut self, video: LoadedVideo) -> Reaction {
        let mut reaction = Reaction::default();
        reaction.print(MessageFormatter::format_video_loaded(&video));
        if let Some((name, size)) = &self.host_video
            && (name != &video.name || *size != video.size)
        {
            reaction.print(MessageFormatter::format_host_video(name, *size, Some(&video)));
        }

        self.player.load(video.duration);
        let plan = self.engine.load(video.duration, self.player.snapshot());
        self.video = Some(video);

        if let Some(plan) = plan {
            self.apply_plan(plan, &mut reaction);
        }
        self.announce_video(&mut reaction);
        reaction
    }

    /// The settle timer fired.
    pub fn on_settle(&mut self, ticket: SettleTicket) {
        if !self.engine.settle(ticket) {
            tracing::trace!("Stale settle ticket {:?}", ticket);
        }
    }

    fn on_remote(&mut self, event: SyncEvent, reaction: &mut Reaction) {
        match self.engine.on_remote(event, self.player.snapshot()) {
            RemoteOutcome::Apply(plan) => {
                reaction.print(MessageFormatter::format_remote_event(&event));
                self.apply_plan(plan, reaction);
            }
            RemoteOutcome::Dropped(reason) => {
                reaction.print(MessageFormatter::format_dropped(&event, reason));
            }
            RemoteOutcome::Deferred => {
                reaction.print(MessageFormatter::format_deferred(&event));
            }
        }
    }

    fn apply_plan(&mut self, plan: ReconcilePlan, reaction: &mut Reaction) {
        tracing::debug!("Applying {:?}", plan.commands);
        self.player.apply(&plan.commands);
        // Notifications fired by the commands above are echo and come back suppressed
        self.pump_element_events(reaction);
        reaction.settle = Some((plan.settle, plan.settle_after));
    }

    /// Feed queued element notifications to the engine and send what it emits.
    fn pump_element_events(&mut self, reaction: &mut Reaction) {
        for event in self.player.take_events() {
            match self.engine.on_element_event(event) {
                LocalOutcome::Emit(sync) => {
                    let Some(room) = &self.room else {
                        continue;
                    };
                    reaction.print(MessageFormatter::format_sent_event(&sync));
                    reaction.outgoing.push(ClientMessage::VideoAction {
                        room_code: room.code.clone(),
                        action: to_dto(sync.action),
                        time: sync.time,
                        is_playing: sync.is_playing,
                    });
                }
                LocalOutcome::RateLimited => {
                    if self.room.is_some() {
                        reaction.print(MessageFormatter::format_not_forwarded());
                    }
                }
                LocalOutcome::Suppressed | LocalOutcome::Ignored => {}
            }
        }
    }

    fn announce_video(&self, reaction: &mut Reaction) {
        if let (Some(room), Some(video)) = (&self.room, &self.video)
            && room.is_host
        {
            reaction.outgoing.push(ClientMessage::HostVideoInfo {
                room_code: room.code.clone(),
                name: video.name.clone(),
                size: video.size,
            });
        }
    }

    /// The relay never removes a connection from a room it joined, so one
    /// connection stays in at most one room.
    fn require_no_room(&self) -> Result<(), CommandError> {
        if let Some(room) = &self.room {
            return Err(CommandError::AlreadyInRoom(room.code.clone()));
        }
        if self.awaiting_room {
            return Err(CommandError::RoomRequestPending);
        }
        Ok(())
    }

    fn require_video(&self) -> Result<(), CommandError> {
        match self.video {
            Some(_) => Ok(()),
            None => Err(CommandError::NoVideo),
        }
    }

    fn status(&self) -> StatusView<'_> {
        StatusView {
            room_code: self.room_code(),
            is_host: self.room.as_ref().is_some_and(|room| room.is_host),
            video: self.video.as_ref(),
            host_video: self
                .host_video
                .as_ref()
                .map(|(name, size)| (name.as_str(), *size)),
            position: self.player.position(),
            paused: self.player.is_paused(),
            phase: self.engine.phase(),
        }
    }
}

/// Read a local file's name and size. The contents are never read.
fn probe_file(path: &str, duration: Option<f64>) -> Result<LoadedVideo, CommandError> {
    let file_error = |reason: String| CommandError::File {
        path: path.to_string(),
        reason,
    };

    let metadata = std::fs::metadata(path).map_err(|e| file_error(e.to_string()))?;
    if !metadata.is_file() {
        return Err(file_error("not a regular file".to_string()));
    }
    let name = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| file_error("no file name".to_string()))?;

    Ok(LoadedVideo {
        name,
        size: metadata.len(),
        duration,
    })
}

fn to_dto(action: SyncAction) -> PlaybackActionDto {
    match action {
        SyncAction::Play => PlaybackActionDto::Play,
        SyncAction::Pause => PlaybackActionDto::Pause,
        SyncAction::Seek => PlaybackActionDto::Seek,
    }
}

fn from_dto(action: PlaybackActionDto) -> SyncAction {
    match action {
        PlaybackActionDto::Play => SyncAction::Play,
        PlaybackActionDto::Pause => SyncAction::Pause,
        PlaybackActionDto::Seek => SyncAction::Seek,
    }
}
