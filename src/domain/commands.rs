use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{LoanId, MemberId, staging::LoanItemRequest};

/// コマンド：貸出を作成する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLoan {
    pub member_id: MemberId,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
    pub items: Vec<LoanItemRequest>,
}

/// コマンド：貸出を返却する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnLoan {
    pub loan_id: LoanId,
    pub returned_on: NaiveDate,
}
