use axum::{
    Json, async_trait,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// Bearerトークン抽出器
///
/// すべての貸出APIに付与される資格情報。このコアはトークンを
/// 不透明な認可トークンとして扱い、検証はしない（本人確認は
/// 外部のアイデンティティ基盤の責務）。ヘッダーが無い・形式が
/// 不正な場合のみ401を返す。
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty());

        match token {
            Some(token) => Ok(BearerToken(token.to_string())),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(
                    "MISSING_BEARER_TOKEN",
                    "Authorization: Bearer <token> header is required",
                )),
            )
                .into_response()),
        }
    }
}
