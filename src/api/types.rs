use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::loan::{LoanDetail, LoanOverview};
use crate::domain::commands::CreateLoan;
use crate::domain::staging::{BookSnapshot, LoanItemRequest};
use crate::domain::value_objects::{BookId, MemberId, Quantity};
use crate::ports::Member;

/// 貸出作成リクエストの1明細
#[derive(Debug, Deserialize)]
pub struct LoanItemPayload {
    pub book_id: Uuid,
    pub quantity: u32,
}

/// 貸出作成リクエスト（POST /loans）
#[derive(Debug, Deserialize)]
pub struct CreateLoanRequest {
    pub member_id: Uuid,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
    pub items: Vec<LoanItemPayload>,
}

impl CreateLoanRequest {
    /// コマンドへ変換する
    ///
    /// 数量0はここで弾かれ、台帳には到達しない。
    pub fn to_command(&self) -> Result<CreateLoan, String> {
        let mut items = Vec::with_capacity(self.items.len());
        for payload in &self.items {
            let quantity = Quantity::new(payload.quantity)
                .map_err(|_| format!("quantity must be at least 1 for book {}", payload.book_id))?;
            items.push(LoanItemRequest {
                book_id: BookId::from_uuid(payload.book_id),
                quantity,
            });
        }

        Ok(CreateLoan {
            member_id: MemberId::from_uuid(self.member_id),
            borrowed_on: self.borrowed_on,
            due_on: self.due_on,
            items,
        })
    }
}

/// 返却リクエスト（PUT /loans/:id/return）
#[derive(Debug, Deserialize)]
pub struct ReturnLoanRequest {
    pub returned_on: NaiveDate,
}

/// 貸出明細レスポンス
#[derive(Debug, Serialize)]
pub struct LoanItemResponse {
    pub item_id: Uuid,
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    pub quantity: u32,
}

/// 貸出詳細レスポンス（明細を含む）
#[derive(Debug, Serialize)]
pub struct LoanDetailResponse {
    pub loan_id: Uuid,
    pub member_id: Uuid,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
    pub returned_on: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<LoanItemResponse>,
}

impl From<LoanDetail> for LoanDetailResponse {
    fn from(detail: LoanDetail) -> Self {
        let loan = detail.loan;
        Self {
            loan_id: loan.loan_id.value(),
            member_id: loan.member_id.value(),
            borrowed_on: loan.period.borrowed_on(),
            due_on: loan.period.due_on(),
            returned_on: loan.returned_on,
            status: detail.status.as_str().to_string(),
            created_at: loan.created_at,
            items: loan
                .items
                .into_iter()
                .map(|item| LoanItemResponse {
                    item_id: item.item_id.value(),
                    book_id: item.book_id.value(),
                    title: item.title,
                    author: item.author,
                    quantity: item.quantity.value(),
                })
                .collect(),
        }
    }
}

/// 貸出サマリーレスポンス（GET /loans、明細なし）
#[derive(Debug, Serialize)]
pub struct LoanSummaryResponse {
    pub loan_id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
    pub returned_on: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<LoanOverview> for LoanSummaryResponse {
    fn from(overview: LoanOverview) -> Self {
        Self {
            loan_id: overview.loan_id.value(),
            member_id: overview.member_id.value(),
            member_name: overview.member_name,
            borrowed_on: overview.borrowed_on,
            due_on: overview.due_on,
            returned_on: overview.returned_on,
            status: overview.status.as_str().to_string(),
            created_at: overview.created_at,
        }
    }
}

/// 書籍レスポンス（GET /books）
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub year_published: Option<i32>,
    pub isbn: Option<String>,
    pub available: u32,
}

impl From<BookSnapshot> for BookResponse {
    fn from(snapshot: BookSnapshot) -> Self {
        Self {
            book_id: snapshot.book_id.value(),
            title: snapshot.title,
            author: snapshot.author,
            publisher: snapshot.publisher,
            year_published: snapshot.year_published,
            isbn: snapshot.isbn,
            available: snapshot.available,
        }
    }
}

/// 会員レスポンス（GET /members）
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub member_id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            member_id: member.member_id.value(),
            name: member.name,
            email: member.email,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
