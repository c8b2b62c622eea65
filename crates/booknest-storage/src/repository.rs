// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `ReservationRepository` trait.

use async_trait::async_trait;
use tracing::debug;

use booknest_config::model::StorageConfig;
use booknest_core::{
    Book, BookAvailability, BooknestError, CartEntry, FutureBooking, Loan, LoanStatusFilter,
    ReservationRepository, Review, WishlistEntry,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed reservation repository.
///
/// Wraps a [`Database`] handle and delegates every operation to the typed
/// query modules.
pub struct SqliteRepository {
    db: Database,
}

impl SqliteRepository {
    /// Wrap an already-open database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the database described by the storage config and run migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, BooknestError> {
        let db = Database::open_with_options(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite repository initialized");
        Ok(Self { db })
    }

    /// Checkpoint the WAL. Call before process exit.
    pub async fn close(&self) -> Result<(), BooknestError> {
        self.db.close().await
    }
}

#[async_trait]
impl ReservationRepository for SqliteRepository {
    // --- Catalog ---

    async fn upsert_book(&self, book: &Book) -> Result<(), BooknestError> {
        queries::catalog::upsert_book(&self.db, book).await
    }

    async fn replace_reviews(
        &self,
        book_id: i64,
        reviews: &[Review],
    ) -> Result<(), BooknestError> {
        queries::catalog::replace_reviews(&self.db, book_id, reviews).await
    }

    async fn get_book(&self, book_id: i64) -> Result<Option<Book>, BooknestError> {
        queries::catalog::get_book(&self.db, book_id).await
    }

    async fn list_books(&self) -> Result<Vec<BookAvailability>, BooknestError> {
        queries::catalog::list_books(&self.db).await
    }

    async fn get_availability(
        &self,
        book_id: i64,
    ) -> Result<Option<BookAvailability>, BooknestError> {
        queries::catalog::get_availability(&self.db, book_id).await
    }

    async fn reviews_for_book(&self, book_id: i64) -> Result<Vec<Review>, BooknestError> {
        queries::catalog::reviews_for_book(&self.db, book_id).await
    }

    // --- Cart ---

    async fn cart_entries(&self, user_id: &str) -> Result<Vec<CartEntry>, BooknestError> {
        queries::cart::entries_for_user(&self.db, user_id).await
    }

    async fn cart_count(&self, user_id: &str) -> Result<i64, BooknestError> {
        queries::cart::count_for_user(&self.db, user_id).await
    }

    async fn cart_contains(&self, user_id: &str, book_id: i64) -> Result<bool, BooknestError> {
        queries::cart::contains(&self.db, user_id, book_id).await
    }

    async fn add_cart_entry(&self, entry: &CartEntry) -> Result<(), BooknestError> {
        queries::cart::insert_entry(&self.db, entry).await
    }

    async fn remove_cart_entry(&self, user_id: &str, book_id: i64) -> Result<(), BooknestError> {
        queries::cart::remove_entry(&self.db, user_id, book_id).await
    }

    async fn clear_cart(&self, user_id: &str) -> Result<(), BooknestError> {
        queries::cart::clear(&self.db, user_id).await
    }

    // --- Loans ---

    async fn insert_loan(&self, loan: &Loan) -> Result<(), BooknestError> {
        queries::loans::insert_loan(&self.db, loan).await
    }

    async fn get_loan(&self, reservation_id: &str) -> Result<Option<Loan>, BooknestError> {
        queries::loans::get_loan(&self.db, reservation_id).await
    }

    async fn update_loan(&self, loan: &Loan) -> Result<(), BooknestError> {
        queries::loans::update_loan(&self.db, loan).await
    }

    async fn loans_for_user(
        &self,
        user_id: &str,
        filter: Option<LoanStatusFilter>,
    ) -> Result<Vec<Loan>, BooknestError> {
        queries::loans::loans_for_user(&self.db, user_id, filter).await
    }

    async fn active_loans_for_book(&self, book_id: i64) -> Result<Vec<Loan>, BooknestError> {
        queries::loans::active_loans_for_book(&self.db, book_id).await
    }

    async fn active_loan_count(&self, user_id: &str) -> Result<i64, BooknestError> {
        queries::loans::active_loan_count(&self.db, user_id).await
    }

    async fn clear_history(&self, user_id: &str) -> Result<u64, BooknestError> {
        queries::loans::clear_history(&self.db, user_id).await
    }

    // --- Future bookings ---

    async fn insert_booking(&self, booking: &FutureBooking) -> Result<(), BooknestError> {
        queries::bookings::insert_booking(&self.db, booking).await
    }

    async fn get_booking(
        &self,
        booking_id: &str,
    ) -> Result<Option<FutureBooking>, BooknestError> {
        queries::bookings::get_booking(&self.db, booking_id).await
    }

    async fn booking_for_user_book(
        &self,
        user_id: &str,
        book_id: i64,
    ) -> Result<Option<FutureBooking>, BooknestError> {
        queries::bookings::for_user_book(&self.db, user_id, book_id).await
    }

    async fn has_blocking_booking(
        &self,
        reservation_id: &str,
        book_id: i64,
        holder_user_id: &str,
    ) -> Result<bool, BooknestError> {
        queries::bookings::has_blocking_booking(&self.db, reservation_id, book_id, holder_user_id)
            .await
    }

    async fn bookings_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<FutureBooking>, BooknestError> {
        queries::bookings::list_for_user(&self.db, user_id).await
    }

    async fn delete_booking(&self, booking_id: &str) -> Result<bool, BooknestError> {
        queries::bookings::delete(&self.db, booking_id).await
    }

    // --- Wishlist ---

    async fn wishlist_add(&self, entry: &WishlistEntry) -> Result<(), BooknestError> {
        queries::wishlist::add(&self.db, entry).await
    }

    async fn wishlist_remove(&self, user_id: &str, book_id: i64) -> Result<(), BooknestError> {
        queries::wishlist::remove(&self.db, user_id, book_id).await
    }

    async fn wishlist_books(&self, user_id: &str) -> Result<Vec<Book>, BooknestError> {
        queries::wishlist::books_for_user(&self.db, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn open_creates_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("repo_test.db");
        let repo = SqliteRepository::open(&make_config(db_path.to_str().unwrap()))
            .await
            .unwrap();

        assert!(db_path.exists(), "database file should be created");
        assert!(repo.list_books().await.unwrap().is_empty());
        repo.close().await.unwrap();
    }

    #[tokio::test]
    async fn repository_is_usable_through_the_trait_object() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("dyn_test.db");
        let repo: std::sync::Arc<dyn ReservationRepository> = std::sync::Arc::new(
            SqliteRepository::open(&make_config(db_path.to_str().unwrap()))
                .await
                .unwrap(),
        );

        let book = Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            category: "Science Fiction".to_string(),
            cover_url: String::new(),
            rating: 4.5,
            base_copies: 1,
            isbn: String::new(),
            publisher: String::new(),
            publication_year: 1965,
            page_count: 412,
        };
        repo.upsert_book(&book).await.unwrap();
        assert_eq!(repo.get_book(1).await.unwrap().unwrap().title, "Dune");
    }
}
