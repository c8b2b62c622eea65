// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output rendering for the BookNest CLI.
//!
//! Every command renders either human-readable text (colored when stdout is
//! a TTY and `--plain` is not set) or structured JSON for scripting.

use std::io::IsTerminal;

use colored::Colorize;
use serde::Serialize;

use booknest_core::{Book, BookAvailability, BookStatus, FutureBooking, Loan, LoanState};

/// Structured result envelope for `--json` mode mutations.
#[derive(Debug, Serialize)]
pub struct CommandOutcome {
    pub success: bool,
    pub message: String,
}

pub fn use_color(plain: bool) -> bool {
    !plain && std::io::stdout().is_terminal()
}

/// Print a mutation outcome: JSON envelope or a plain message line.
pub fn print_outcome(message: &str, json: bool, plain: bool) {
    if json {
        let outcome = CommandOutcome {
            success: true,
            message: message.to_string(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).unwrap_or_else(|_| "{}".to_string())
        );
    } else if use_color(plain) {
        println!("{}", message.green());
    } else {
        println!("{message}");
    }
}

/// Serialize any value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
    );
}

fn status_line(availability: &BookAvailability, color: bool) -> String {
    let copies = format!(
        "{}/{} available",
        availability.copies_available, availability.book.base_copies
    );
    if color {
        match availability.status {
            BookStatus::Available => copies.green().to_string(),
            BookStatus::Borrowed => "all copies on loan".red().to_string(),
        }
    } else {
        match availability.status {
            BookStatus::Available => copies,
            BookStatus::Borrowed => "all copies on loan".to_string(),
        }
    }
}

pub fn print_books(books: &[BookAvailability], json: bool, plain: bool) {
    if json {
        print_json(&books);
        return;
    }
    if books.is_empty() {
        println!("no books found");
        return;
    }
    let color = use_color(plain);
    for b in books {
        let title = if color {
            b.book.title.bold().to_string()
        } else {
            b.book.title.clone()
        };
        println!(
            "{:>4}  {} — {} ({})  [{}]",
            b.book.id,
            title,
            b.book.author,
            b.book.category,
            status_line(b, color)
        );
    }
}

pub fn print_book_detail(availability: &BookAvailability, json: bool, plain: bool) {
    if json {
        print_json(availability);
        return;
    }
    let color = use_color(plain);
    let b = &availability.book;
    let title = if color {
        b.title.bold().to_string()
    } else {
        b.title.clone()
    };
    println!("{title}");
    println!("  author:     {}", b.author);
    println!("  category:   {}", b.category);
    println!("  rating:     {:.1}/5.0", b.rating);
    if !b.isbn.is_empty() {
        println!("  isbn:       {}", b.isbn);
    }
    if !b.publisher.is_empty() {
        println!("  publisher:  {} ({})", b.publisher, b.publication_year);
    }
    if b.page_count > 0 {
        println!("  pages:      {}", b.page_count);
    }
    println!("  status:     {}", status_line(availability, color));
}

fn loan_state_label(loan: &Loan, color: bool) -> String {
    match &loan.state {
        LoanState::Borrowed {
            extended,
            picked_up,
            ..
        } => {
            let mut label = String::from("borrowed");
            if *picked_up {
                label.push_str(", picked up");
            }
            if *extended {
                label.push_str(", extended");
            }
            if color {
                label.yellow().to_string()
            } else {
                label
            }
        }
        LoanState::Returned { .. } => {
            if color {
                "returned".green().to_string()
            } else {
                "returned".to_string()
            }
        }
        LoanState::Cancelled { .. } => {
            if color {
                "cancelled".red().to_string()
            } else {
                "cancelled".to_string()
            }
        }
    }
}

pub fn print_loans(loans: &[Loan], json: bool, plain: bool) {
    if json {
        print_json(&loans);
        return;
    }
    if loans.is_empty() {
        println!("no reservations");
        return;
    }
    let color = use_color(plain);
    for loan in loans {
        println!(
            "{}  {} — {}  due {}  [{}]",
            loan.reservation_id,
            loan.book_title,
            loan.book_author,
            &loan.due_date[..10.min(loan.due_date.len())],
            loan_state_label(loan, color)
        );
    }
}

pub fn print_bookings(bookings: &[FutureBooking], json: bool, plain: bool) {
    if json {
        print_json(&bookings);
        return;
    }
    if bookings.is_empty() {
        println!("no future bookings");
        return;
    }
    for b in bookings {
        println!(
            "{}  book {}  expected back {}",
            b.booking_id,
            b.book_id,
            &b.expected_return_date[..10.min(b.expected_return_date.len())]
        );
    }
}

pub fn print_wishlist(books: &[Book], json: bool, plain: bool) {
    if json {
        print_json(&books);
        return;
    }
    if books.is_empty() {
        println!("wishlist is empty");
        return;
    }
    let color = use_color(plain);
    for b in books {
        let title = if color {
            b.title.bold().to_string()
        } else {
            b.title.clone()
        };
        println!("{:>4}  {} — {}", b.id, title, b.author);
    }
}
