//! ルームコードの生成

use rand::Rng;

use super::value_object::RoomCode;

/// 生成するルームコードの長さ
pub const GENERATED_ROOM_CODE_LEN: usize = 6;

const ROOM_CODE_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// RoomCode の生成器
///
/// 生成自体は一意性を保証しない。衝突の回避は Repository がルームテーブルを
/// ロックした状態で行う。
pub struct RoomCodeFactory;

impl RoomCodeFactory {
    /// スレッドローカル乱数でルームコードを生成
    pub fn generate() -> RoomCode {
        Self::generate_with(&mut rand::rng())
    }

    /// 乱数生成器を指定してルームコードを生成
    pub fn generate_with<R: Rng>(rng: &mut R) -> RoomCode {
        let code: String = (0..GENERATED_ROOM_CODE_LEN)
            .map(|_| {
                let idx = rng.random_range(0..ROOM_CODE_CHARSET.len());
                ROOM_CODE_CHARSET[idx] as char
            })
            .collect();
        // 文字集合と長さは RoomCode の制約内に収まっている
        RoomCode::new(code).unwrap_or_else(|e| unreachable!("generated room code invalid: {e}"))
    }
}
