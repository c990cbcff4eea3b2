use crate::domain::staging::BookSnapshot;
use crate::domain::value_objects::{BookId, Quantity};
use crate::ports::book_catalog::{BookCatalog, Result as CatalogResult};
use crate::ports::inventory_ledger::{InventoryError, InventoryLedger};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// 在庫レコード - 台帳が所有する1冊の書籍
#[derive(Debug, Clone)]
struct BookRecord {
    title: String,
    author: String,
    publisher: Option<String>,
    year_published: Option<i32>,
    isbn: Option<String>,
    available: u32,
}

/// InventoryLedgerとBookCatalogのインメモリ実装
///
/// 1つのMutexで全レコードを保護する。reserveのcheck-then-decrementは
/// ロック保持中に一括で行われるため、同一書籍に対する並行予約は
/// 直列化される：最後の1冊に対する2つの同時予約が両方成功することはない。
///
/// カタログポートも同じレコードを読む。reserve/releaseが変更するのと
/// 同一の基礎レコードに対するスナップショットを返す。
pub struct MemoryInventory {
    books: Mutex<HashMap<BookId, BookRecord>>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self {
            books: Mutex::new(HashMap::new()),
        }
    }

    /// 書籍を台帳に登録する（カタログ側のCRUDの代替）
    pub fn add_book(&self, snapshot: BookSnapshot) {
        let mut books = self.books.lock().unwrap();
        books.insert(
            snapshot.book_id,
            BookRecord {
                title: snapshot.title,
                author: snapshot.author,
                publisher: snapshot.publisher,
                year_published: snapshot.year_published,
                isbn: snapshot.isbn,
                available: snapshot.available,
            },
        );
    }

    /// 現在の貸出可能数（検証用）
    pub fn available_of(&self, book_id: BookId) -> Option<u32> {
        self.books.lock().unwrap().get(&book_id).map(|b| b.available)
    }

    fn snapshot_of(book_id: BookId, record: &BookRecord) -> BookSnapshot {
        BookSnapshot {
            book_id,
            title: record.title.clone(),
            author: record.author.clone(),
            publisher: record.publisher.clone(),
            year_published: record.year_published,
            isbn: record.isbn.clone(),
            available: record.available,
        }
    }
}

impl Default for MemoryInventory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryLedger for MemoryInventory {
    async fn reserve(&self, book_id: BookId, quantity: Quantity) -> Result<(), InventoryError> {
        let mut books = self.books.lock().unwrap();
        let record = books
            .get_mut(&book_id)
            .ok_or(InventoryError::NotFound(book_id))?;

        let requested = quantity.value();
        if requested > record.available {
            return Err(InventoryError::InsufficientStock {
                book_id,
                requested,
                available: record.available,
            });
        }

        record.available -= requested;
        Ok(())
    }

    async fn release(&self, book_id: BookId, quantity: Quantity) -> Result<(), InventoryError> {
        let mut books = self.books.lock().unwrap();
        let record = books
            .get_mut(&book_id)
            .ok_or(InventoryError::NotFound(book_id))?;

        record.available += quantity.value();
        Ok(())
    }
}

#[async_trait]
impl BookCatalog for MemoryInventory {
    /// 在庫のある書籍だけを返す（Loan Builderの入力）
    async fn list_available(&self) -> CatalogResult<Vec<BookSnapshot>> {
        let books = self.books.lock().unwrap();
        let mut snapshots: Vec<BookSnapshot> = books
            .iter()
            .filter(|(_, record)| record.available > 0)
            .map(|(book_id, record)| Self::snapshot_of(*book_id, record))
            .collect();
        snapshots.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(snapshots)
    }

    /// 在庫0でも既知の書籍ならスナップショットを返す（書誌情報の凍結用）
    async fn get_snapshot(&self, book_id: BookId) -> CatalogResult<Option<BookSnapshot>> {
        let books = self.books.lock().unwrap();
        Ok(books
            .get(&book_id)
            .map(|record| Self::snapshot_of(book_id, record)))
    }
}
