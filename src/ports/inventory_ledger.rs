use crate::domain::value_objects::{BookId, Quantity};
use async_trait::async_trait;
use thiserror::Error;

/// 在庫操作のエラー
///
/// ビジネス上の結果として型付けされる（インフラ障害ではない）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// 台帳に存在しない書籍
    #[error("book {0} not found in inventory")]
    NotFound(BookId),

    /// 在庫不足（要求数と利用可能数を特定する）
    #[error("insufficient stock for book {book_id}: requested {requested}, available {available}")]
    InsufficientStock {
        book_id: BookId,
        requested: u32,
        available: u32,
    },
}

/// 在庫台帳ポート
///
/// 書籍ごとの貸出可能数を所有し、原子的なreserve/releaseを公開する。
/// 唯一の共有可変リソースであり、同一書籍に対するreserve/releaseは
/// 直列化されなければならない：reserveのcheck-then-decrementが競合し、
/// 最後の1冊に対する2つの同時予約が両方成功してはならない。
///
/// どの操作も無期限にブロックしない。予約は即座に成功または失敗し、
/// 在庫が空くのを待つキューイングは行わない。
#[async_trait]
pub trait InventoryLedger: Send + Sync {
    /// 在庫を予約する（貸出可能数を`quantity`だけ減らす）
    ///
    /// `quantity <= available`の場合のみ成功する。
    /// 失敗時は台帳を一切変更しない。
    async fn reserve(&self, book_id: BookId, quantity: Quantity) -> Result<(), InventoryError>;

    /// 在庫を解放する（貸出可能数を`quantity`だけ増やす）
    ///
    /// 以前に予約された数をそのまま戻すため、上限チェックは行わない。
    async fn release(&self, book_id: BookId, quantity: Quantity) -> Result<(), InventoryError>;
}
