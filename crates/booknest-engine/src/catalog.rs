// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog dataset import.
//!
//! The catalog ships as a static JSON array in the original camelCase
//! layout, with reviews embedded per book. Importing upserts every book and
//! replaces its review list; reservation operations never create or delete
//! catalog entries.

use serde::Deserialize;
use tracing::info;

use booknest_core::types::now_timestamp;
use booknest_core::{Book, BooknestError, ReservationRepository, Review};

/// One catalog entry as found in the JSON dataset.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetBook {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub cover_url: String,
    #[serde(default)]
    pub rating: f64,
    pub copies_available: i64,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub publication_year: i64,
    #[serde(default)]
    pub page_count: i64,
    #[serde(default)]
    pub reviews: Vec<DatasetReview>,
}

/// One embedded review record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetReview {
    pub reviewer: String,
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl DatasetBook {
    fn into_parts(self) -> (Book, Vec<Review>) {
        let book_id = self.id;
        let reviews = self
            .reviews
            .into_iter()
            .map(|r| Review {
                book_id,
                reviewer: r.reviewer,
                rating: r.rating,
                comment: r.comment,
                created_at: r.created_at.unwrap_or_else(now_timestamp),
            })
            .collect();
        let book = Book {
            id: self.id,
            title: self.title,
            author: self.author,
            category: self.category,
            cover_url: self.cover_url,
            rating: self.rating,
            base_copies: self.copies_available,
            isbn: self.isbn,
            publisher: self.publisher,
            publication_year: self.publication_year,
            page_count: self.page_count,
        };
        (book, reviews)
    }
}

/// Parse a JSON dataset and upsert every book and its reviews.
///
/// Returns the number of books imported. Re-importing is idempotent: books
/// are replaced by id and review lists are rewritten.
pub async fn import_catalog(
    repo: &dyn ReservationRepository,
    json: &str,
) -> Result<usize, BooknestError> {
    let dataset: Vec<DatasetBook> =
        serde_json::from_str(json).map_err(|e| BooknestError::Internal(e.to_string()))?;

    let count = dataset.len();
    for entry in dataset {
        let (book, reviews) = entry.into_parts();
        let book_id = book.id;
        repo.upsert_book(&book).await?;
        repo.replace_reviews(book_id, &reviews).await?;
    }
    info!(count, "catalog imported");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_book_parses_camel_case_fields() {
        let json = r#"{
            "id": 1,
            "title": "The Pragmatic Programmer",
            "author": "Hunt & Thomas",
            "category": "Programming",
            "coverUrl": "https://example.com/pragprog.jpg",
            "rating": 4.7,
            "copiesAvailable": 3,
            "isbn": "978-0201616224",
            "publisher": "Addison-Wesley",
            "publicationYear": 1999,
            "pageCount": 352,
            "reviews": [
                { "reviewer": "maya", "rating": 5.0, "comment": "A classic." }
            ]
        }"#;

        let entry: DatasetBook = serde_json::from_str(json).unwrap();
        let (book, reviews) = entry.into_parts();
        assert_eq!(book.id, 1);
        assert_eq!(book.base_copies, 3);
        assert_eq!(book.publication_year, 1999);
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].book_id, 1);
        assert_eq!(reviews[0].reviewer, "maya");
        assert!(!reviews[0].created_at.is_empty());
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let json = r#"{
            "id": 2,
            "title": "Untitled",
            "author": "Anon",
            "category": "Misc",
            "copiesAvailable": 1
        }"#;

        let entry: DatasetBook = serde_json::from_str(json).unwrap();
        let (book, reviews) = entry.into_parts();
        assert!(book.cover_url.is_empty());
        assert_eq!(book.rating, 0.0);
        assert_eq!(book.page_count, 0);
        assert!(reviews.is_empty());
    }
}
