use crate::domain::value_objects::MemberId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 会員 - 外部の会員ディレクトリが所有する読み取り専用の参照データ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: MemberId,
    pub name: String,
    pub email: String,
}

/// 会員ディレクトリポート
///
/// 貸出コンテキストと会員コンテキストの境界を維持する。
/// 会員の作成・編集はこのコアの範囲外。
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// 全会員を取得する
    async fn list_members(&self) -> Result<Vec<Member>>;

    /// IDで会員を取得する
    ///
    /// 貸出作成前の会員バリデーションと、一覧での会員名解決に使用される。
    async fn find_by_id(&self, member_id: MemberId) -> Result<Option<Member>>;
}
