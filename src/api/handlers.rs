use crate::application::loan::{
    LoanApplicationError, LoanDetail, ServiceDependencies, create_loan as execute_create_loan,
    get_loan as execute_get_loan, list_loans as execute_list_loans,
    return_loan as execute_return_loan,
};
use crate::domain::commands::ReturnLoan;
use crate::domain::loan::resolve_status;
use crate::domain::value_objects::LoanId;
use crate::ports::{BookCatalog, MemberDirectory};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    extractor::BearerToken,
    types::{
        BookResponse, CreateLoanRequest, LoanDetailResponse, LoanSummaryResponse, MemberResponse,
        ReturnLoanRequest,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers
// ============================================================================

/// POST /loans - 新しい貸出を作成
///
/// 会員への複数書籍の貸出を1つの論理単位として作成する。
///
/// 強制されるビジネスルール:
/// - 会員が存在すること
/// - 明細が1件以上、数量はすべて1以上
/// - `due_on >= borrowed_on`
/// - 全明細の予約が成功すること（1件でも在庫不足なら全ロールバック）
pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    _token: BearerToken,
    Json(req): Json<CreateLoanRequest>,
) -> Result<(StatusCode, Json<LoanDetailResponse>), ApiError> {
    let cmd = req
        .to_command()
        .map_err(|msg| ApiError::from(LoanApplicationError::Validation(msg)))?;

    let loan = execute_create_loan(&state.service_deps, cmd).await?;

    let status = resolve_status(&loan, Utc::now().date_naive());
    let response = LoanDetailResponse::from(LoanDetail { loan, status });

    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /loans/:id/return - 貸出を返却
///
/// 貸出中の全明細の在庫を解放し、返却日を記録する。
///
/// 強制されるビジネスルール:
/// - 貸出が存在すること
/// - 既に返却済みでないこと（2回目はALREADY_RETURNEDで失敗し、
///   在庫は二重解放されない）
/// - 延滞中の貸出も返却可能
pub async fn return_loan(
    State(state): State<Arc<AppState>>,
    _token: BearerToken,
    Path(loan_id): Path<Uuid>,
    Json(req): Json<ReturnLoanRequest>,
) -> Result<Json<LoanDetailResponse>, ApiError> {
    let cmd = ReturnLoan {
        loan_id: LoanId::from_uuid(loan_id),
        returned_on: req.returned_on,
    };

    let loan = execute_return_loan(&state.service_deps, cmd).await?;

    let status = resolve_status(&loan, Utc::now().date_naive());
    let response = LoanDetailResponse::from(LoanDetail { loan, status });

    Ok(Json(response))
}

// ============================================================================
// Query handlers
// ============================================================================

/// GET /loans - 貸出一覧を取得（明細なし）
///
/// 会員名と表示ステータス（borrowed / returned / overdue）を
/// 解決済みのサマリーを返す。明細は詳細取得で遅延読み込みされる。
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
    _token: BearerToken,
) -> Result<Json<Vec<LoanSummaryResponse>>, ApiError> {
    let overviews = execute_list_loans(&state.service_deps).await?;
    Ok(Json(
        overviews.into_iter().map(LoanSummaryResponse::from).collect(),
    ))
}

/// GET /loans/:id - 貸出詳細をIDで取得（明細を含む）
pub async fn get_loan_by_id(
    State(state): State<Arc<AppState>>,
    _token: BearerToken,
    Path(loan_id): Path<Uuid>,
) -> Result<Json<LoanDetailResponse>, ApiError> {
    let detail = execute_get_loan(&state.service_deps, LoanId::from_uuid(loan_id)).await?;
    Ok(Json(LoanDetailResponse::from(detail)))
}

/// GET /books - 貸出可能な書籍のスナップショットを取得
///
/// Loan Builder（貸出ドラフト）の入力。在庫0の書籍は含まれない。
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    _token: BearerToken,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let snapshots = state
        .service_deps
        .book_catalog
        .list_available()
        .await
        .map_err(|e| ApiError::from(LoanApplicationError::CatalogError(e)))?;

    Ok(Json(snapshots.into_iter().map(BookResponse::from).collect()))
}

/// GET /members - 会員一覧を取得
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    _token: BearerToken,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = state
        .service_deps
        .member_directory
        .list_members()
        .await
        .map_err(|e| ApiError::from(LoanApplicationError::DirectoryError(e)))?;

    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}
