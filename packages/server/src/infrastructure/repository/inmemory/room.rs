//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! ルームテーブルと「接続 → 所属ルーム」の逆引きインデックスを 1 つの
//! `Mutex` で保護し、各操作をロックを保持したまま完結させます。
//! そのため、複数ルームにまたがる切断処理と同じルームへの join が
//! 交互に実行されることはありません。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Departure, JoinOutcome, PlaybackAction, PlaybackPosition, RepositoryError,
    Room, RoomCode, RoomCodeFactory, RoomRepository, Timestamp, VideoFileInfo,
};

/// 一意なコードを探すときの最大試行回数
const MAX_CODE_ATTEMPTS: usize = 32;

type CodeGenerator = Box<dyn FnMut() -> RoomCode + Send>;

struct Registry {
    rooms: HashMap<RoomCode, Room>,
    /// 逆引きインデックス: 接続 → 所属ルーム
    memberships: HashMap<ConnectionId, HashSet<RoomCode>>,
    generate_code: CodeGenerator,
}

impl Registry {
    fn index_membership(&mut self, connection_id: ConnectionId, room_code: RoomCode) {
        self.memberships
            .entry(connection_id)
            .or_default()
            .insert(room_code);
    }

    /// 送信者がメンバーであるルームを取得
    fn member_room_mut(
        &mut self,
        room_code: &RoomCode,
        sender: &ConnectionId,
    ) -> Result<&mut Room, RepositoryError> {
        let room = self
            .rooms
            .get_mut(room_code)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_code.as_str().to_string()))?;
        if !room.is_member(sender) {
            return Err(RepositoryError::NotAMember {
                connection_id: sender.as_str().to_string(),
                room_code: room_code.as_str().to_string(),
            });
        }
        Ok(room)
    }
}

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    registry: Mutex<Registry>,
}

impl InMemoryRoomRepository {
    /// ランダムなルームコードを使う Repository を作成
    pub fn new() -> Self {
        Self::with_code_generator(Box::new(RoomCodeFactory::generate))
    }

    /// ルームコードの生成方法を指定して作成（テスト用）
    pub fn with_code_generator(generate_code: CodeGenerator) -> Self {
        Self {
            registry: Mutex::new(Registry {
                rooms: HashMap::new(),
                memberships: HashMap::new(),
                generate_code,
            }),
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(
        &self,
        host: ConnectionId,
        created_at: Timestamp,
    ) -> Result<RoomCode, RepositoryError> {
        let mut registry = self.registry.lock().await;

        let mut code = None;
        for _ in 0..MAX_CODE_ATTEMPTS {
            let candidate = (registry.generate_code)();
            if !registry.rooms.contains_key(&candidate) {
                code = Some(candidate);
                break;
            }
            tracing::debug!("Room code '{}' already in use, retrying", candidate);
        }
        let code = code.ok_or(RepositoryError::RoomCodeExhausted(MAX_CODE_ATTEMPTS))?;

        registry
            .rooms
            .insert(code.clone(), Room::new(code.clone(), host.clone(), created_at));
        registry.index_membership(host, code.clone());

        Ok(code)
    }

    async fn join_room(
        &self,
        room_code: &RoomCode,
        connection_id: ConnectionId,
    ) -> Result<JoinOutcome, RepositoryError> {
        let mut registry = self.registry.lock().await;

        let room = registry
            .rooms
            .get_mut(room_code)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_code.as_str().to_string()))?;
        let newly_joined = room.add_member(connection_id.clone());
        let outcome = JoinOutcome {
            newly_joined,
            others: room.other_members(&connection_id),
            video: room.video.clone(),
            playback: room.playback.clone(),
        };

        registry.index_membership(connection_id, room_code.clone());

        Ok(outcome)
    }

    async fn relay_video_info(
        &self,
        room_code: &RoomCode,
        sender: &ConnectionId,
        video: VideoFileInfo,
    ) -> Result<Vec<ConnectionId>, RepositoryError> {
        let mut registry = self.registry.lock().await;
        let room = registry.member_room_mut(room_code, sender)?;
        if !room.record_video(sender, video) {
            tracing::debug!(
                "Video info from non-host '{}' in room '{}' forwarded but not remembered",
                sender,
                room_code
            );
        }
        Ok(room.other_members(sender))
    }

    async fn relay_playback(
        &self,
        room_code: &RoomCode,
        sender: &ConnectionId,
        action: PlaybackAction,
        position: PlaybackPosition,
        is_playing: Option<bool>,
        now_millis: u64,
    ) -> Result<Vec<ConnectionId>, RepositoryError> {
        let mut registry = self.registry.lock().await;
        let room = registry.member_room_mut(room_code, sender)?;
        room.record_playback(action, position, is_playing, now_millis);
        Ok(room.other_members(sender))
    }

    async fn remove_connection(&self, connection_id: &ConnectionId) -> Vec<Departure> {
        let mut registry = self.registry.lock().await;

        let Some(codes) = registry.memberships.remove(connection_id) else {
            return Vec::new();
        };
        let mut codes: Vec<RoomCode> = codes.into_iter().collect();
        codes.sort();

        let mut departures = Vec::with_capacity(codes.len());
        for code in codes {
            let Some(room) = registry.rooms.get_mut(&code) else {
                tracing::warn!(
                    "Membership index pointed at missing room '{}' for '{}'",
                    code,
                    connection_id
                );
                continue;
            };
            room.remove_member(connection_id);

            if room.is_empty() {
                registry.rooms.remove(&code);
                tracing::info!("Room '{}' deleted (no members left)", code);
                departures.push(Departure {
                    room_code: code,
                    remaining: Vec::new(),
                    room_deleted: true,
                });
            } else {
                departures.push(Departure {
                    remaining: room.sorted_members(),
                    room_code: code,
                    room_deleted: false,
                });
            }
        }

        departures
    }

    async fn get_room(&self, room_code: &RoomCode) -> Option<Room> {
        let registry = self.registry.lock().await;
        registry.rooms.get(room_code).cloned()
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let registry = self.registry.lock().await;
        let mut rooms: Vec<Room> = registry.rooms.values().cloned().collect();
        rooms.sort_by(|a, b| a.code.cmp(&b.code));
        rooms
    }

    async fn count_rooms(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - ルームの作成・参加・中継先の取得・切断時の後始末
    // - 逆引きインデックスがルームテーブルと一致していること
    //
    // 【なぜこのテストが必要か】
    // - Repository はレジストリの不変条件（空のルームは存在しない、
    //   メンバーは集合）を守る唯一の場所
    //
    // 【どのようなシナリオをテストするか】
    // 1. 作成したルームのコードが一意であること（衝突時の再生成を含む）
    // 2. 存在しないルームへの参加がエラーで、副作用がないこと
    // 3. 同じ接続の二重参加がメンバー 1 件になること
    // 4. 全員切断でルームが削除されること
    // 5. 非メンバーからの中継が拒否されること
    // ========================================

    fn id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    fn code(value: &str) -> RoomCode {
        RoomCode::new(value.to_string()).unwrap()
    }

    fn now() -> Timestamp {
        Timestamp::new(1_000)
    }

    fn position(seconds: f64) -> PlaybackPosition {
        PlaybackPosition::new(seconds).unwrap()
    }

    fn scripted_repository(codes: &[&str]) -> InMemoryRoomRepository {
        let mut queue: VecDeque<RoomCode> = codes.iter().map(|c| code(c)).collect();
        InMemoryRoomRepository::with_code_generator(Box::new(move || {
            queue.pop_front().unwrap_or_else(RoomCodeFactory::generate)
        }))
    }

    #[tokio::test]
    async fn test_create_room_makes_host_sole_member() {
        // テスト項目: 作成したルームのメンバーはホストのみ
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let room_code = repo.create_room(id("host"), now()).await.unwrap();

        // then (期待する結果):
        let room = repo.get_room(&room_code).await.unwrap();
        assert_eq!(room.sorted_members(), vec![id("host")]);
        assert_eq!(room.host, id("host"));
        let departures = repo.remove_connection(&id("host")).await;
        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].room_code, room_code);
    }

    #[tokio::test]
    async fn test_create_room_retries_on_collision() {
        // テスト項目: 生成したコードが使用中なら別のコードを採用する
        // given (前提条件):
        let repo = scripted_repository(&["AB12CD", "AB12CD", "ZZ99ZZ"]);
        let first = repo.create_room(id("alice"), now()).await.unwrap();

        // when (操作):
        let second = repo.create_room(id("bob"), now()).await.unwrap();

        // then (期待する結果):
        assert_eq!(first, code("AB12CD"));
        assert_eq!(second, code("ZZ99ZZ"));
        assert_eq!(repo.count_rooms().await, 2);
    }

    #[tokio::test]
    async fn test_create_room_gives_up_when_codes_exhausted() {
        // テスト項目: 一意なコードが見つからない場合はエラーになる
        // given (前提条件):
        let repo = InMemoryRoomRepository::with_code_generator(Box::new(|| code("SAME01")));
        repo.create_room(id("alice"), now()).await.unwrap();

        // when (操作):
        let result = repo.create_room(id("bob"), now()).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::RoomCodeExhausted(MAX_CODE_ATTEMPTS))
        );
        assert_eq!(repo.count_rooms().await, 1);
    }

    #[tokio::test]
    async fn test_created_codes_are_unique() {
        // テスト項目: 多数のルームを作成してもコードは重複しない
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let mut codes = HashSet::new();
        for i in 0..200 {
            let room_code = repo
                .create_room(id(&format!("host-{i}")), now())
                .await
                .unwrap();
            codes.insert(room_code);
        }

        // then (期待する結果):
        assert_eq!(codes.len(), 200);
        assert_eq!(repo.count_rooms().await, 200);
    }

    #[tokio::test]
    async fn test_join_nonexistent_room() {
        // テスト項目: 存在しないルームへの参加はエラーで、何も変わらない
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let result = repo.join_room(&code("NOPE00"), id("guest")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::RoomNotFound("NOPE00".to_string()))
        );
        assert!(repo.remove_connection(&id("guest")).await.is_empty());
        assert_eq!(repo.count_rooms().await, 0);
    }

    #[tokio::test]
    async fn test_join_room_twice_is_idempotent() {
        // テスト項目: 同じ接続が二度参加してもメンバーは 1 件
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let room_code = repo.create_room(id("host"), now()).await.unwrap();

        // when (操作):
        let first = repo.join_room(&room_code, id("guest")).await.unwrap();
        let second = repo.join_room(&room_code, id("guest")).await.unwrap();

        // then (期待する結果):
        assert!(first.newly_joined);
        assert!(!second.newly_joined);
        assert_eq!(first.others, vec![id("host")]);
        let room = repo.get_room(&room_code).await.unwrap();
        assert_eq!(room.member_count(), 2);
    }

    #[tokio::test]
    async fn test_join_returns_remembered_state() {
        // テスト項目: 参加時にホストの動画情報と再生状態が返される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let room_code = repo.create_room(id("host"), now()).await.unwrap();
        let video = VideoFileInfo::new("movie.mp4".to_string(), 50_000_000).unwrap();
        repo.relay_video_info(&room_code, &id("host"), video.clone())
            .await
            .unwrap();
        repo.relay_playback(
            &room_code,
            &id("host"),
            PlaybackAction::Play,
            PlaybackPosition::new(3.2).unwrap(),
            None,
            500,
        )
        .await
        .unwrap();

        // when (操作):
        let outcome = repo.join_room(&room_code, id("late")).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome.video, Some(video));
        let playback = outcome.playback.unwrap();
        assert_eq!(playback.action, PlaybackAction::Play);
        assert!(playback.is_playing);
        assert_eq!(playback.recorded_at_millis, 500);
    }

    #[tokio::test]
    async fn test_all_members_disconnect_deletes_room() {
        // テスト項目: N 人が参加して全員切断するとルームが消える
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let room_code = repo.create_room(id("m0"), now()).await.unwrap();
        for i in 1..5 {
            repo.join_room(&room_code, id(&format!("m{i}")))
                .await
                .unwrap();
        }

        // when (操作):
        let mut last = Vec::new();
        for i in 0..5 {
            last = repo.remove_connection(&id(&format!("m{i}"))).await;
        }

        // then (期待する結果):
        assert_eq!(
            last,
            vec![Departure {
                room_code: room_code.clone(),
                remaining: Vec::new(),
                room_deleted: true,
            }]
        );
        assert!(repo.get_room(&room_code).await.is_none());
        assert_eq!(repo.count_rooms().await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_cleans_every_room_of_connection() {
        // テスト項目: 複数ルームに所属する接続の切断で全ルームから外れる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let room_a = repo.create_room(id("alice"), now()).await.unwrap();
        let room_b = repo.create_room(id("bob"), now()).await.unwrap();
        repo.join_room(&room_a, id("carol")).await.unwrap();
        repo.join_room(&room_b, id("carol")).await.unwrap();
        repo.join_room(&room_b, id("alice")).await.unwrap();

        // when (操作):
        let departures = repo.remove_connection(&id("alice")).await;

        // then (期待する結果):
        assert_eq!(departures.len(), 2);
        for departure in &departures {
            assert!(!departure.room_deleted);
            assert!(!departure.remaining.contains(&id("alice")));
        }
        assert!(repo.remove_connection(&id("alice")).await.is_empty());
        let a = repo.get_room(&room_a).await.unwrap();
        assert_eq!(a.sorted_members(), vec![id("carol")]);
        // ホストが抜けても再選出されない
        assert_eq!(a.host, id("alice"));
    }

    #[tokio::test]
    async fn test_disconnect_unknown_connection_is_noop() {
        // テスト項目: どのルームにも属さない接続の切断は何もしない
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        repo.create_room(id("host"), now()).await.unwrap();

        // when (操作):
        let departures = repo.remove_connection(&id("stranger")).await;

        // then (期待する結果):
        assert!(departures.is_empty());
        assert_eq!(repo.count_rooms().await, 1);
    }

    #[tokio::test]
    async fn test_relay_playback_targets_exclude_sender_and_other_rooms() {
        // テスト項目: 中継先は同じルームの送信者以外のメンバーのみ
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let room_a = repo.create_room(id("alice"), now()).await.unwrap();
        let room_b = repo.create_room(id("zed"), now()).await.unwrap();
        repo.join_room(&room_a, id("bob")).await.unwrap();
        repo.join_room(&room_a, id("carol")).await.unwrap();
        repo.join_room(&room_b, id("yan")).await.unwrap();

        // when (操作):
        let targets = repo
            .relay_playback(&room_a, &id("alice"), PlaybackAction::Play, position(1.0), None, 0)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(targets, vec![id("bob"), id("carol")]);
        let other = repo.get_room(&room_b).await.unwrap();
        assert!(other.playback.is_none());
    }

    #[tokio::test]
    async fn test_relay_rejects_non_member() {
        // テスト項目: 非メンバーからの中継は NotAMember、存在しないルームは RoomNotFound で、何も記録しない
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let room_code = repo.create_room(id("alice"), now()).await.unwrap();

        // when (操作):
        let not_member = repo
            .relay_playback(&room_code, &id("mallory"), PlaybackAction::Pause, position(5.0), None, 0)
            .await;
        let not_found = repo
            .relay_playback(&code("NOPE00"), &id("alice"), PlaybackAction::Pause, position(5.0), None, 0)
            .await;

        // then (期待する結果):
        assert!(matches!(not_member, Err(RepositoryError::NotAMember { .. })));
        assert_eq!(
            not_found,
            Err(RepositoryError::RoomNotFound("NOPE00".to_string()))
        );
        let room = repo.get_room(&room_code).await.unwrap();
        assert!(room.playback.is_none());
        assert_eq!(room.sorted_members(), vec![id("alice")]);
    }

    #[tokio::test]
    async fn test_concurrent_joins_and_disconnects_keep_invariants() {
        // テスト項目: 並行した参加と切断の後も空のルームが残らない
        // given (前提条件):
        let repo = Arc::new(InMemoryRoomRepository::new());
        let room_code = repo.create_room(id("host"), now()).await.unwrap();

        // when (操作):
        let mut handles = Vec::new();
        for i in 0..50 {
            let repo = repo.clone();
            let room_code = room_code.clone();
            handles.push(tokio::spawn(async move {
                let guest = id(&format!("guest-{i}"));
                repo.join_room(&room_code, guest.clone()).await.ok();
                repo.remove_connection(&guest).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        repo.remove_connection(&id("host")).await;

        // then (期待する結果):
        assert_eq!(repo.count_rooms().await, 0);
        assert!(repo.remove_connection(&id("guest-0")).await.is_empty());
    }
}
