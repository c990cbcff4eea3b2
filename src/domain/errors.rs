use super::{PeriodError, QuantityError};

/// 貸出作成のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenLoanError {
    /// 明細が1件もない
    NoItems,
    /// 返却期限が貸出日より前
    InvalidPeriod,
    /// 数量が不正（0冊）
    InvalidQuantity,
}

impl From<PeriodError> for OpenLoanError {
    fn from(err: PeriodError) -> Self {
        match err {
            PeriodError::DueBeforeBorrowed => OpenLoanError::InvalidPeriod,
        }
    }
}

impl From<QuantityError> for OpenLoanError {
    fn from(err: QuantityError) -> Self {
        match err {
            QuantityError::Zero => OpenLoanError::InvalidQuantity,
        }
    }
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseLoanError {
    /// 既に返却済み
    AlreadyReturned,
}
