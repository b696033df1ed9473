use once_cell::sync::Lazy;

use super::models::Book;

/// Books every catalog starts with, in listing order.
pub static SEED_BOOKS: Lazy<Vec<Book>> = Lazy::new(|| {
    vec![
        Book::new("1111", "The Alchemist", "Paulo Coelho"),
        Book::new("2222", "The Prophet", "Kahlil Gibran"),
        Book::new("3333", "1984", "George Orwell"),
    ]
});
