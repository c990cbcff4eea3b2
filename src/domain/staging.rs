use serde::{Deserialize, Serialize};

use super::{BookId, Quantity};

/// カタログスナップショット - 選択時点の1冊の書籍
///
/// Loan Builderが参照する読み取り専用のビュー。
/// `available`は取得時点の値であり、提出時には古くなっている
/// 可能性がある（権威ある検証はサービス側で行われる）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub year_published: Option<i32>,
    pub isbn: Option<String>,
    pub available: u32,
}

/// 貸出作成リクエストの1明細（book_id, quantity）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanItemRequest {
    pub book_id: BookId,
    pub quantity: Quantity,
}

/// ドラフト操作のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// スナップショットに存在しない書籍
    UnknownBook,
    /// 在庫0のため選択不可
    Unselectable,
    /// 候補集合に入っていない書籍への数量変更
    NotSelected,
}

/// 数量設定の結果
///
/// 範囲外の要求はエラーではなく、最寄りの境界に丸めたうえで
/// 警告として呼び出し元へ通知する（UXガードであり、権威ある
/// 検証は提出時にサービス側で行われる）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityOutcome {
    /// 要求どおり適用された
    Applied(Quantity),
    /// 境界に丸められた（警告）
    Clamped { requested: u32, applied: Quantity },
}

impl QuantityOutcome {
    /// 適用された数量
    pub fn applied(&self) -> Quantity {
        match self {
            QuantityOutcome::Applied(q) => *q,
            QuantityOutcome::Clamped { applied, .. } => *applied,
        }
    }
}

/// 貸出ドラフト - 提出前の候補集合（Loan Builder）
///
/// 操作者が選んだ（書籍, 数量）の組を、サーバーに影響を与える前に
/// 蓄積するステージング値オブジェクト。UIの可変状態ではなく、
/// シリアライズ可能な値として`create_loan`へ渡される。
///
/// 候補集合は書籍IDをキーとする一意な写像。選択順は保持されるが、
/// 意味上の順序はない。操作者ローカルの状態であり、並行書き込みの
/// 考慮は不要（1ユーザー・1セッション）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanDraft {
    snapshot: Vec<BookSnapshot>,
    selected: Vec<LoanItemRequest>,
}

impl LoanDraft {
    /// カタログスナップショットからドラフトを作成する
    pub fn new(snapshot: Vec<BookSnapshot>) -> Self {
        Self {
            snapshot,
            selected: Vec::new(),
        }
    }

    fn find_snapshot(&self, book_id: BookId) -> Option<&BookSnapshot> {
        self.snapshot.iter().find(|b| b.book_id == book_id)
    }

    fn find_selected_mut(&mut self, book_id: BookId) -> Option<&mut LoanItemRequest> {
        self.selected.iter_mut().find(|i| i.book_id == book_id)
    }

    /// 書籍を候補集合に追加する（数量は1冊）
    ///
    /// 既に選択済みの書籍の再選択は何もしない。
    ///
    /// # エラー
    /// - `UnknownBook`: スナップショットに存在しない書籍
    /// - `Unselectable`: 在庫0の書籍
    pub fn select(&mut self, book_id: BookId) -> Result<(), DraftError> {
        let snapshot = self.find_snapshot(book_id).ok_or(DraftError::UnknownBook)?;
        if snapshot.available == 0 {
            return Err(DraftError::Unselectable);
        }

        if self.find_selected_mut(book_id).is_none() {
            self.selected.push(LoanItemRequest {
                book_id,
                quantity: Quantity::one(),
            });
        }
        Ok(())
    }

    /// 選択済みの書籍の数量を変更する
    ///
    /// `1..=available`（スナップショット時点の在庫）の範囲に丸める。
    /// 丸めが発生した場合は`QuantityOutcome::Clamped`で通知する。
    ///
    /// # エラー
    /// `NotSelected`: 候補集合に入っていない書籍
    pub fn set_quantity(
        &mut self,
        book_id: BookId,
        requested: u32,
    ) -> Result<QuantityOutcome, DraftError> {
        let available = self
            .find_snapshot(book_id)
            .ok_or(DraftError::UnknownBook)?
            .available;

        let clamped = requested.clamp(1, available.max(1));
        let quantity = Quantity::new(clamped).expect("clamped quantity is at least 1");

        let item = self
            .find_selected_mut(book_id)
            .ok_or(DraftError::NotSelected)?;
        item.quantity = quantity;

        if clamped == requested {
            Ok(QuantityOutcome::Applied(quantity))
        } else {
            Ok(QuantityOutcome::Clamped {
                requested,
                applied: quantity,
            })
        }
    }

    /// 書籍を候補集合から外す
    pub fn deselect(&mut self, book_id: BookId) {
        self.selected.retain(|i| i.book_id != book_id);
    }

    /// 候補集合を空にする
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// 提出用の明細リスト
    pub fn items(&self) -> Vec<LoanItemRequest> {
        self.selected.clone()
    }
}
