use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

use crate::domain::commands::{CreateLoan, ReturnLoan};
use crate::domain::loan::{self, DisplayStatus, Loan, LoanItem};
use crate::domain::staging::LoanItemRequest;
use crate::domain::value_objects::{LoanId, LoanPeriod, MemberId};
use crate::ports::*;

use super::errors::{LoanApplicationError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub inventory_ledger: Arc<dyn InventoryLedger>,
    pub loan_store: Arc<dyn LoanStore>,
    pub book_catalog: Arc<dyn BookCatalog>,
    pub member_directory: Arc<dyn MemberDirectory>,
}

/// 一覧表示用の貸出ビュー（明細なし、会員名と表示ステータスを解決済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanOverview {
    pub loan_id: LoanId,
    pub member_id: MemberId,
    pub member_name: String,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
    pub returned_on: Option<NaiveDate>,
    pub status: DisplayStatus,
    pub created_at: DateTime<Utc>,
}

/// 詳細表示用の貸出ビュー（明細を含む）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanDetail {
    pub loan: Loan,
    pub status: DisplayStatus,
}

/// 予約のロールバックヘルパー
///
/// 予約済みの明細を逆順に解放する。補償パスでの解放失敗は
/// 呼び出し元のエラーを覆い隠さないよう、ログに記録して続行する。
async fn release_reserved(ledger: &Arc<dyn InventoryLedger>, reserved: &[LoanItemRequest]) {
    for item in reserved.iter().rev() {
        if let Err(err) = ledger.release(item.book_id, item.quantity).await {
            tracing::error!(
                book_id = %item.book_id,
                quantity = item.quantity.value(),
                error = %err,
                "failed to release reservation during rollback"
            );
        }
    }
}

/// トランザクショナルヘルパー：全明細の予約
///
/// 指定された順に全明細を予約する。いずれかの予約が失敗した場合、
/// このリクエスト内で成功済みの予約をすべて解放してからエラーを返す。
/// 呼び出し元から見て全か無か。
async fn reserve_all(
    ledger: &Arc<dyn InventoryLedger>,
    items: &[LoanItemRequest],
) -> Result<()> {
    let mut reserved: Vec<LoanItemRequest> = Vec::with_capacity(items.len());

    for item in items {
        match ledger.reserve(item.book_id, item.quantity).await {
            Ok(()) => reserved.push(*item),
            Err(err) => {
                release_reserved(ledger, &reserved).await;
                return Err(err.into());
            }
        }
    }

    Ok(())
}

/// 貸出を作成する
///
/// ビジネスルール：
/// - 会員が存在すること
/// - 明細が1件以上、数量はすべて1以上
/// - `due_on >= borrowed_on`
/// - 全明細の予約が成功すること（1件でも失敗したら全ロールバック）
///
/// 提出時に生きた在庫に対して権威ある再検証を行う。クライアント側の
/// スナップショットに基づくドラフトの境界チェックは助言的なものにすぎない。
///
/// # 一貫性保証
///
/// 在庫台帳が、実際に永続化された内容と矛盾した状態のまま
/// 残ることはない。予約後のいかなる失敗も、エラーを返す前に
/// 補償解放を実行する。
///
/// # 戻り値
/// 成功時は明細を含む作成済みのLoan
pub async fn create_loan(deps: &ServiceDependencies, cmd: CreateLoan) -> Result<Loan> {
    // 1. 入力バリデーション（台帳には到達しない）
    if cmd.items.is_empty() {
        return Err(LoanApplicationError::Validation(
            "items must not be empty".to_string(),
        ));
    }

    let period = LoanPeriod::new(cmd.borrowed_on, cmd.due_on).map_err(|_| {
        LoanApplicationError::Validation("due_on must not precede borrowed_on".to_string())
    })?;

    // 2. 会員の存在確認
    let member = deps
        .member_directory
        .find_by_id(cmd.member_id)
        .await
        .map_err(LoanApplicationError::DirectoryError)?;

    if member.is_none() {
        return Err(LoanApplicationError::MemberNotFound);
    }

    // 3. 書誌情報のスナップショット取得（予約前。未知の書籍は
    //    部分的な効果なしで弾く）
    let mut items: Vec<LoanItem> = Vec::with_capacity(cmd.items.len());
    for req in &cmd.items {
        let snapshot = deps
            .book_catalog
            .get_snapshot(req.book_id)
            .await
            .map_err(LoanApplicationError::CatalogError)?
            .ok_or(LoanApplicationError::BookNotFound(req.book_id))?;

        items.push(LoanItem::new(
            req.book_id,
            snapshot.title,
            snapshot.author,
            req.quantity,
        ));
    }

    // 4. 全明細の予約（全か無か）
    reserve_all(&deps.inventory_ledger, &cmd.items).await?;

    // 5. ドメイン層の純粋関数で貸出を生成
    let loan = match loan::open_loan(cmd.member_id, period, items, Utc::now()) {
        Ok(loan) => loan,
        Err(err) => {
            release_reserved(&deps.inventory_ledger, &cmd.items).await;
            return Err(LoanApplicationError::Validation(format!("{:?}", err)));
        }
    };

    // 6. 永続化。失敗した場合は予約を補償解放してからエラーを返す
    if let Err(err) = deps.loan_store.save(loan.clone()).await {
        release_reserved(&deps.inventory_ledger, &cmd.items).await;
        return Err(LoanApplicationError::StoreError(err));
    }

    Ok(loan)
}

/// 貸出を返却する
///
/// ビジネスルール：
/// - 貸出が存在すること
/// - 既に返却済みでないこと（2回目の返却は`AlreadyReturned`で失敗し、
///   在庫を二重解放しない）
/// - 延滞していても返却は受け付ける
///
/// # 戻り値
/// 成功時は更新後のLoan
pub async fn return_loan(deps: &ServiceDependencies, cmd: ReturnLoan) -> Result<Loan> {
    // 1. 貸出の取得
    let loan = deps
        .loan_store
        .get_by_id(cmd.loan_id)
        .await
        .map_err(LoanApplicationError::StoreError)?
        .ok_or(LoanApplicationError::LoanNotFound)?;

    // 2. ドメイン層の純粋関数で返却を適用（終端状態の再返却はここで弾く）
    let returned = loan::close_loan(&loan, cmd.returned_on)
        .map_err(|_| LoanApplicationError::AlreadyReturned)?;

    // 3. 全明細の在庫を解放する。解放の失敗（カタログから消えた書籍など）は
    //    返却自体を妨げない：記録して続行する
    let mut released: Vec<LoanItemRequest> = Vec::with_capacity(returned.items.len());
    for item in &returned.items {
        match deps
            .inventory_ledger
            .release(item.book_id, item.quantity)
            .await
        {
            Ok(()) => released.push(LoanItemRequest {
                book_id: item.book_id,
                quantity: item.quantity,
            }),
            Err(err) => {
                tracing::warn!(
                    loan_id = %cmd.loan_id.value(),
                    book_id = %item.book_id,
                    error = %err,
                    "failed to release stock on return"
                );
            }
        }
    }

    // 4. 永続化。失敗した場合は解放した分を予約し直して台帳との整合を保つ
    if let Err(err) = deps.loan_store.save(returned.clone()).await {
        for item in released.iter().rev() {
            if let Err(err) = deps
                .inventory_ledger
                .reserve(item.book_id, item.quantity)
                .await
            {
                tracing::error!(
                    book_id = %item.book_id,
                    error = %err,
                    "failed to re-reserve stock while compensating a failed return"
                );
            }
        }
        return Err(LoanApplicationError::StoreError(err));
    }

    Ok(returned)
}

/// 貸出一覧を取得する（明細なし）
///
/// 会員名は会員ディレクトリから解決する。読み取り専用の一覧パスでは、
/// 個別の会員名解決の失敗は一覧全体を失敗させず、空の名前に縮退する。
/// 表示ステータスは読み取りのたびに現在日付で再計算される。
pub async fn list_loans(deps: &ServiceDependencies) -> Result<Vec<LoanOverview>> {
    let summaries = deps
        .loan_store
        .list()
        .await
        .map_err(LoanApplicationError::StoreError)?;

    let today = Utc::now().date_naive();
    let mut overviews = Vec::with_capacity(summaries.len());

    for summary in summaries {
        let member_name = match deps.member_directory.find_by_id(summary.member_id).await {
            Ok(Some(member)) => member.name,
            Ok(None) => String::new(),
            Err(err) => {
                tracing::warn!(
                    member_id = %summary.member_id.value(),
                    error = %err,
                    "failed to resolve member name for loan listing"
                );
                String::new()
            }
        };

        overviews.push(LoanOverview {
            loan_id: summary.loan_id,
            member_id: summary.member_id,
            member_name,
            borrowed_on: summary.period.borrowed_on(),
            due_on: summary.period.due_on(),
            returned_on: summary.returned_on,
            status: loan::resolve(
                summary.status,
                summary.period.due_on(),
                summary.returned_on,
                today,
            ),
            created_at: summary.created_at,
        });
    }

    Ok(overviews)
}

/// 貸出詳細を取得する（明細を含む）
pub async fn get_loan(deps: &ServiceDependencies, loan_id: LoanId) -> Result<LoanDetail> {
    let loan = deps
        .loan_store
        .get_by_id(loan_id)
        .await
        .map_err(LoanApplicationError::StoreError)?
        .ok_or(LoanApplicationError::LoanNotFound)?;

    let today = Utc::now().date_naive();
    let status = loan::resolve_status(&loan, today);

    Ok(LoanDetail { loan, status })
}
