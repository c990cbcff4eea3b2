use crate::domain::loan::{Loan, LoanStatus};
use crate::domain::value_objects::{LoanId, LoanPeriod, MemberId};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出サマリー（明細なし）
///
/// 一覧表示に最適化されたビュー。明細はN件のペイロードを避けるため
/// 一覧には含めず、詳細取得時にのみ読み込む（明示的な設計判断）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanSummary {
    pub loan_id: LoanId,
    pub member_id: MemberId,
    pub period: LoanPeriod,
    pub returned_on: Option<NaiveDate>,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Loan> for LoanSummary {
    fn from(loan: &Loan) -> Self {
        Self {
            loan_id: loan.loan_id,
            member_id: loan.member_id,
            period: loan.period,
            returned_on: loan.returned_on,
            status: loan.status,
            created_at: loan.created_at,
        }
    }
}

/// 貸出ストアポート
///
/// 貸出レコードの永続化を抽象化する。Loanは履歴レコードであり、
/// 削除操作は存在しない。保存形式はこのコアの関心事ではない。
#[async_trait]
pub trait LoanStore: Send + Sync {
    /// 貸出を明細ごと保存する
    ///
    /// 新規の場合はINSERT、既存の場合はUPDATE（upsert）を実行する。
    /// LoanとLoanItemは常に1つの論理単位として保存される。
    async fn save(&self, loan: Loan) -> Result<()>;

    /// IDで貸出を取得する（明細を含む）
    async fn get_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>>;

    /// 全貸出のサマリーを取得する（明細なし）
    ///
    /// 作成日時の降順で返す。
    async fn list(&self) -> Result<Vec<LoanSummary>>;
}
