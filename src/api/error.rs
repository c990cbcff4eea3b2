use crate::application::loan::LoanApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError(LoanApplicationError);

impl From<LoanApplicationError> for ApiError {
    fn from(err: LoanApplicationError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self.0 {
            // 400 Bad Request - 入力が不正
            LoanApplicationError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }

            // 404 Not Found - リクエストされたリソースが存在しない
            LoanApplicationError::LoanNotFound => (
                StatusCode::NOT_FOUND,
                "LOAN_NOT_FOUND",
                "Loan not found".to_string(),
            ),

            // 409 Conflict - 終端状態の貸出への再返却
            LoanApplicationError::AlreadyReturned => (
                StatusCode::CONFLICT,
                "ALREADY_RETURNED",
                "Loan has already been returned".to_string(),
            ),

            // 422 Unprocessable Entity - ビジネスルール違反
            LoanApplicationError::MemberNotFound => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MEMBER_NOT_FOUND",
                "Member not found".to_string(),
            ),
            ref err @ LoanApplicationError::BookNotFound(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "BOOK_NOT_FOUND",
                err.to_string(),
            ),
            // 問題の書籍と要求数/利用可能数をそのまま伝える
            ref err @ LoanApplicationError::InsufficientStock { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INSUFFICIENT_STOCK",
                err.to_string(),
            ),

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            LoanApplicationError::StoreError(ref e) => {
                tracing::error!("Loan store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LOAN_STORE_ERROR",
                    "Failed to access loan records".to_string(),
                )
            }
            LoanApplicationError::CatalogError(ref e) => {
                tracing::error!("Book catalog error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "BOOK_CATALOG_ERROR",
                    "Book catalog error".to_string(),
                )
            }
            LoanApplicationError::DirectoryError(ref e) => {
                tracing::error!("Member directory error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MEMBER_DIRECTORY_ERROR",
                    "Member directory error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(code, message));
        (status, body).into_response()
    }
}
