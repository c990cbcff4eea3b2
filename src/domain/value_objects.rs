use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 貸出ID - 貸出管理コンテキストの集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoanId(Uuid);

impl LoanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

/// 貸出明細ID - Loan集約内の明細行の識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoanItemId(Uuid);

impl LoanItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for LoanItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// 書籍ID - カタログ管理コンテキストへの参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 会員ID - 会員管理コンテキストへの参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

/// 数量エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// 数量は1以上でなければならない
    Zero,
}

/// 貸出数量
///
/// 不変条件：数量は1以上の正の整数。
/// 型システムでこの制約を強制し、0冊の明細行を作成できないようにする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    /// 新規作成
    ///
    /// # エラー
    /// `value`が0の場合は`QuantityError::Zero`を返す
    pub fn new(value: u32) -> Result<Self, QuantityError> {
        if value == 0 {
            return Err(QuantityError::Zero);
        }
        Ok(Self(value))
    }

    /// 選択直後のデフォルト数量（1冊）
    pub fn one() -> Self {
        Self(1)
    }

    /// 現在の数量
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// 貸出期間エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// 返却期限が貸出日より前
    DueBeforeBorrowed,
}

/// 貸出期間
///
/// 不変条件：`due_on >= borrowed_on`。
/// 不正な期間を持つ貸出を型システムで排除する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPeriod {
    borrowed_on: NaiveDate,
    due_on: NaiveDate,
}

impl LoanPeriod {
    /// 新規作成
    ///
    /// # エラー
    /// `due_on < borrowed_on`の場合は`PeriodError::DueBeforeBorrowed`を返す
    pub fn new(borrowed_on: NaiveDate, due_on: NaiveDate) -> Result<Self, PeriodError> {
        if due_on < borrowed_on {
            return Err(PeriodError::DueBeforeBorrowed);
        }
        Ok(Self { borrowed_on, due_on })
    }

    /// 貸出日
    pub fn borrowed_on(&self) -> NaiveDate {
        self.borrowed_on
    }

    /// 返却期限
    pub fn due_on(&self) -> NaiveDate {
        self.due_on
    }
}
