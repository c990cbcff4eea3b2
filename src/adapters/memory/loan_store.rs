use crate::domain::loan::Loan;
use crate::domain::value_objects::LoanId;
use crate::ports::loan_store::{LoanStore, LoanSummary, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// LoanStoreのインメモリ実装
///
/// 貸出は履歴レコードであり削除されないため、保存と上書きのみを提供する。
pub struct MemoryLoanStore {
    loans: Mutex<HashMap<LoanId, Loan>>,
}

impl MemoryLoanStore {
    pub fn new() -> Self {
        Self {
            loans: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryLoanStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoanStore for MemoryLoanStore {
    async fn save(&self, loan: Loan) -> Result<()> {
        let mut loans = self.loans.lock().unwrap();
        loans.insert(loan.loan_id, loan);
        Ok(())
    }

    async fn get_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let loans = self.loans.lock().unwrap();
        Ok(loans.get(&loan_id).cloned())
    }

    /// 作成日時の降順でサマリーを返す
    async fn list(&self) -> Result<Vec<LoanSummary>> {
        let loans = self.loans.lock().unwrap();
        let mut summaries: Vec<LoanSummary> = loans.values().map(LoanSummary::from).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}
