// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the full BookNest pipeline: config, storage,
//! catalog import, and the reservation engine together.
//!
//! Each test creates an isolated temp database. Tests are independent and
//! order-insensitive.

use std::sync::Arc;

use tempfile::TempDir;

use booknest_core::{BookStatus, BooknestError, LoanStatusFilter};
use booknest_engine::ReservationEngine;
use booknest_storage::SqliteRepository;

const CATALOG_JSON: &str = r#"[
    {
        "id": 1,
        "title": "The Name of the Wind",
        "author": "Patrick Rothfuss",
        "category": "Fantasy",
        "coverUrl": "https://covers.example/notw.jpg",
        "rating": 4.5,
        "copiesAvailable": 2,
        "isbn": "978-0756404741",
        "publisher": "DAW Books",
        "publicationYear": 2007,
        "pageCount": 662,
        "reviews": [
            { "reviewer": "maya", "rating": 5.0, "comment": "Couldn't put it down." }
        ]
    },
    {
        "id": 2,
        "title": "A Brief History of Time",
        "author": "Stephen Hawking",
        "category": "Science",
        "copiesAvailable": 1
    },
    {
        "id": 3,
        "title": "The Pragmatic Programmer",
        "author": "Hunt & Thomas",
        "category": "Programming",
        "copiesAvailable": 3
    }
]"#;

/// Boot the full stack from a TOML config string, as the binary does.
async fn boot(dir: &TempDir) -> (ReservationEngine, Arc<SqliteRepository>) {
    let db_path = dir.path().join("e2e.db");
    let toml = format!(
        r#"
[storage]
database_path = "{}"

[lending]
cart_limit = 5
extension_days = 7
loan_durations = [7, 14, 21]
"#,
        db_path.display()
    );

    let config = booknest_config::load_and_validate_str(&toml).expect("config should validate");
    let repo = Arc::new(SqliteRepository::open(&config.storage).await.unwrap());
    let engine = ReservationEngine::new(repo.clone(), config.lending.clone());
    engine.import_catalog(CATALOG_JSON).await.unwrap();
    (engine, repo)
}

#[tokio::test]
async fn import_then_browse_the_catalog() {
    let dir = TempDir::new().unwrap();
    let (engine, _repo) = boot(&dir).await;

    let books = engine.list_books().await.unwrap();
    assert_eq!(books.len(), 3);
    // Listing is ordered by title.
    assert_eq!(books[0].book.title, "A Brief History of Time");
    assert!(books.iter().all(|b| b.status == BookStatus::Available));

    let reviews = engine.reviews(1).await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].reviewer, "maya");

    assert_eq!(
        engine.all_categories().await.unwrap(),
        vec!["Fantasy", "Programming", "Science"]
    );
    assert_eq!(engine.search_books("hawking").await.unwrap().len(), 1);
}

#[tokio::test]
async fn reimport_replaces_books_without_duplicating() {
    let dir = TempDir::new().unwrap();
    let (engine, _repo) = boot(&dir).await;

    engine.import_catalog(CATALOG_JSON).await.unwrap();
    assert_eq!(engine.list_books().await.unwrap().len(), 3);
    assert_eq!(engine.reviews(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn borrow_flow_from_cart_to_return() {
    let dir = TempDir::new().unwrap();
    let (engine, _repo) = boot(&dir).await;

    engine.add_to_cart("maya", 1).await.unwrap();
    engine.add_to_cart("maya", 2).await.unwrap();
    let loans = engine.checkout_cart("maya", 14).await.unwrap();
    assert_eq!(loans.len(), 2);

    // Book 2 had a single copy, now fully on loan.
    let scarce = engine.availability(2).await.unwrap();
    assert_eq!(scarce.copies_available, 0);
    assert_eq!(scarce.status, BookStatus::Borrowed);

    let borrowed = engine.currently_borrowed("maya").await.unwrap();
    assert_eq!(borrowed.len(), 2);

    let hawking = borrowed.iter().find(|l| l.book_id == 2).unwrap();
    engine.mark_returned(&hawking.reservation_id).await.unwrap();
    assert_eq!(engine.availability(2).await.unwrap().copies_available, 1);
    assert_eq!(engine.total_borrowed_count("maya").await.unwrap(), 1);

    let returned = engine
        .history("maya", Some(LoanStatusFilter::Returned))
        .await
        .unwrap();
    assert_eq!(returned.len(), 1);
    assert_eq!(returned[0].book_title, "A Brief History of Time");
}

#[tokio::test]
async fn booking_blocks_extension_until_cancelled() {
    let dir = TempDir::new().unwrap();
    let (engine, _repo) = boot(&dir).await;

    let loan = engine.checkout("maya", 2, 7).await.unwrap();
    let booking = engine.book_for_later("arun", 2).await.unwrap();
    assert_eq!(booking.expected_return_date, loan.due_date);

    let err = engine.extend_loan(&loan.reservation_id).await.unwrap_err();
    assert!(matches!(err, BooknestError::ExtensionBlocked { .. }));

    assert!(engine.cancel_booking(&booking.booking_id).await.unwrap());
    engine.extend_loan(&loan.reservation_id).await.unwrap();
}

#[tokio::test]
async fn pickup_then_cancel_is_rejected_end_to_end() {
    let dir = TempDir::new().unwrap();
    let (engine, _repo) = boot(&dir).await;

    let loan = engine.checkout("maya", 3, 7).await.unwrap();
    engine.mark_picked_up(&loan.reservation_id).await.unwrap();

    let err = engine
        .cancel_reservation(&loan.reservation_id)
        .await
        .unwrap_err();
    assert!(matches!(err, BooknestError::AlreadyPickedUp));
}

#[tokio::test]
async fn state_survives_process_restart() {
    let dir = TempDir::new().unwrap();
    let reservation_id;
    {
        let (engine, repo) = boot(&dir).await;
        engine.add_to_cart("maya", 3).await.unwrap();
        let loan = engine.checkout("maya", 1, 21).await.unwrap();
        engine.wishlist_add("maya", 2).await.unwrap();
        reservation_id = loan.reservation_id;
        repo.close().await.unwrap();
    }

    // Second boot reuses the same database file; the import is idempotent.
    let (engine, _repo) = boot(&dir).await;
    assert_eq!(engine.cart_entries("maya").await.unwrap().len(), 1);
    assert_eq!(engine.wishlist("maya").await.unwrap().len(), 1);
    let history = engine.history("maya", None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].reservation_id, reservation_id);
    assert_eq!(engine.availability(1).await.unwrap().copies_available, 1);
}
