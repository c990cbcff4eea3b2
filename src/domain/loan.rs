use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    BookId, CloseLoanError, LoanId, LoanItemId, LoanPeriod, MemberId, OpenLoanError, Quantity,
};

/// 保存される貸出ステータス
///
/// 延滞（Overdue）は保存される状態ではなく、読み取り時に
/// `resolve_status`で導出される表示用ラベルである点に注意。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// 貸出中
    Borrowed,
    /// 返却済み
    Returned,
}

impl LoanStatus {
    pub fn is_returned(&self) -> bool {
        matches!(self, LoanStatus::Returned)
    }
}

/// 表示用の貸出ステータス
///
/// 保存されるステータスに加えて、返却期限超過の貸出に
/// 付与される`Overdue`ラベルを持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    /// 貸出中
    Borrowed,
    /// 返却済み
    Returned,
    /// 延滞中（読み取り時の投影、保存されない）
    Overdue,
}

impl DisplayStatus {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::Borrowed => "borrowed",
            DisplayStatus::Returned => "returned",
            DisplayStatus::Overdue => "overdue",
        }
    }
}

/// 貸出明細 - 1冊の書籍と数量の組
///
/// タイトルと著者は予約時点のスナップショット。
/// カタログの書誌情報が後から変更されても、履歴上の明細は
/// 予約時点の内容を保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanItem {
    pub item_id: LoanItemId,
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub quantity: Quantity,
}

impl LoanItem {
    pub fn new(book_id: BookId, title: String, author: String, quantity: Quantity) -> Self {
        Self {
            item_id: LoanItemId::new(),
            book_id,
            title,
            author,
            quantity,
        }
    }
}

/// Loan集約 - 1人の会員への1回の貸出（複数明細）
///
/// 不変条件：
/// - `items`は空でない
/// - `status == Returned` ⇔ `returned_on`が設定されている
/// - 明細は作成時に一括で確定し、以後変更されない（貸出は時点の約束）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    // 識別子
    pub loan_id: LoanId,

    // 他の集約への参照（IDのみ）
    pub member_id: MemberId,

    // 貸出管理の責務
    pub period: LoanPeriod,
    pub returned_on: Option<NaiveDate>,
    pub status: LoanStatus,
    pub items: Vec<LoanItem>,

    // 監査情報
    pub created_at: DateTime<Utc>,
}

/// 純粋関数：貸出を開始する
///
/// ビジネスルール：
/// - 明細は1件以上
/// - 期間の妥当性は`LoanPeriod`の構築時点で保証済み
/// - 初期状態はBorrowed、返却日は未設定
///
/// 副作用なし。新しいLoanを返す。在庫の予約は
/// アプリケーション層の責務であり、この関数は関与しない。
pub fn open_loan(
    member_id: MemberId,
    period: LoanPeriod,
    items: Vec<LoanItem>,
    created_at: DateTime<Utc>,
) -> Result<Loan, OpenLoanError> {
    if items.is_empty() {
        return Err(OpenLoanError::NoItems);
    }

    Ok(Loan {
        loan_id: LoanId::new(),
        member_id,
        period,
        returned_on: None,
        status: LoanStatus::Borrowed,
        items,
        created_at,
    })
}

/// 純粋関数：貸出を返却する
///
/// ビジネスルール：
/// - 既に返却済みの貸出は返却不可（在庫の二重解放を防ぐ）
/// - 延滞していても返却は受け付ける
///
/// 副作用なし。新しいLoanを返す。在庫の解放は
/// アプリケーション層の責務。
pub fn close_loan(loan: &Loan, returned_on: NaiveDate) -> Result<Loan, CloseLoanError> {
    if loan.status.is_returned() {
        return Err(CloseLoanError::AlreadyReturned);
    }

    Ok(Loan {
        returned_on: Some(returned_on),
        status: LoanStatus::Returned,
        ..loan.clone()
    })
}

/// 純粋関数：表示用ステータスの導出
///
/// 状態機械：
/// - Borrowedが初期状態、Returnedは`close_loan`経由でのみ到達する終端状態
/// - Overdueは保存される状態遷移ではなく、期限超過のBorrowed貸出に
///   読み取りのたびに付与されるラベル（書き込むバッチジョブは存在しない）
pub fn resolve_status(loan: &Loan, today: NaiveDate) -> DisplayStatus {
    resolve(loan.status, loan.period.due_on(), loan.returned_on, today)
}

/// 純粋関数：(status, due_on, returned_on, current_date) からの導出
///
/// 集約全体を持たないサマリービューからも呼べるよう、
/// フィールド単位で受け取る。
pub fn resolve(
    status: LoanStatus,
    due_on: NaiveDate,
    returned_on: Option<NaiveDate>,
    today: NaiveDate,
) -> DisplayStatus {
    if status.is_returned() || returned_on.is_some() {
        DisplayStatus::Returned
    } else if today > due_on {
        DisplayStatus::Overdue
    } else {
        DisplayStatus::Borrowed
    }
}

/// 純粋関数：延滞判定
pub fn is_overdue(loan: &Loan, today: NaiveDate) -> bool {
    resolve_status(loan, today) == DisplayStatus::Overdue
}
