use crate::domain::staging::BookSnapshot;
use crate::domain::value_objects::BookId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 書籍カタログポート
///
/// 貸出コンテキストとカタログコンテキストの境界を維持する。
/// カタログのCRUD自体はこのコアの範囲外であり、ここでは現在の
/// スナップショットの読み取りだけを行う。reserve/releaseは
/// 同じ基礎レコードに対して`InventoryLedger`経由で行われる。
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// 貸出可能な書籍のスナップショットを取得する
    ///
    /// Loan Builderの入力。在庫0の書籍は含まれない。
    async fn list_available(&self) -> Result<Vec<BookSnapshot>>;

    /// 1冊の書籍のスナップショットを取得する
    ///
    /// 明細の書誌情報（タイトル/著者）の凍結に使用される。
    async fn get_snapshot(&self, book_id: BookId) -> Result<Option<BookSnapshot>>;
}
