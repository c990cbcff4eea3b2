use thiserror::Error;

use crate::domain::value_objects::BookId;
use crate::ports::InventoryError;

/// 貸出管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LoanApplicationError {
    /// 入力が不正（台帳には一切到達しない）
    #[error("validation error: {0}")]
    Validation(String),

    /// 会員が存在しない
    #[error("member not found")]
    MemberNotFound,

    /// 書籍が存在しない（部分的な効果なし）
    #[error("book {0} not found")]
    BookNotFound(BookId),

    /// 在庫不足（最初に満たせなかった書籍を特定する。
    /// 同一リクエスト内の先行予約はロールバック済み）
    #[error("insufficient stock for book {book_id}: requested {requested}, available {available}")]
    InsufficientStock {
        book_id: BookId,
        requested: u32,
        available: u32,
    },

    /// 貸出が見つからない
    #[error("loan not found")]
    LoanNotFound,

    /// 既に返却済み（在庫への影響なし）
    #[error("loan already returned")]
    AlreadyReturned,

    /// 貸出ストアのエラー
    #[error("loan store error")]
    StoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 書籍カタログのエラー
    #[error("book catalog error")]
    CatalogError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 会員ディレクトリのエラー
    #[error("member directory error")]
    DirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<InventoryError> for LoanApplicationError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound(book_id) => LoanApplicationError::BookNotFound(book_id),
            InventoryError::InsufficientStock {
                book_id,
                requested,
                available,
            } => LoanApplicationError::InsufficientStock {
                book_id,
                requested,
                available,
            },
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LoanApplicationError>;
