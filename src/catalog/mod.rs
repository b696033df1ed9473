//! In-memory book catalog and user directory.
//!
//! `CatalogStore` owns both collections. Every operation takes the lock once,
//! validates, and only then mutates, so a failed request leaves no trace.

mod error;
pub mod models;
pub mod seed;

use std::collections::HashMap;

use tokio::sync::RwLock;

pub use error::CatalogError;
pub use models::{Book, Credentials, ReviewDraft, Reviews, User};

#[derive(Debug, Default)]
struct CatalogState {
    books: Vec<Book>,
    users: HashMap<String, User>,
}

impl CatalogState {
    fn book(&self, isbn: &str) -> Result<&Book, CatalogError> {
        self.books
            .iter()
            .find(|book| book.isbn == isbn)
            .ok_or_else(|| CatalogError::BookNotFound {
                isbn: isbn.to_string(),
            })
    }

    fn book_mut(&mut self, isbn: &str) -> Result<&mut Book, CatalogError> {
        self.books
            .iter_mut()
            .find(|book| book.isbn == isbn)
            .ok_or_else(|| CatalogError::BookNotFound {
                isbn: isbn.to_string(),
            })
    }

    fn matching(&self, needle: &str, field: impl Fn(&Book) -> &str) -> Vec<Book> {
        let needle = needle.to_lowercase();
        self.books
            .iter()
            .filter(|&book| field(book).to_lowercase() == needle)
            .cloned()
            .collect()
    }
}

/// Shared catalog of books, reviews, and registered users.
#[derive(Debug)]
pub struct CatalogStore {
    state: RwLock<CatalogState>,
}

impl CatalogStore {
    /// Catalog holding the fixed seed books and no users.
    pub fn seeded() -> Self {
        Self {
            state: RwLock::new(CatalogState {
                books: seed::SEED_BOOKS.clone(),
                users: HashMap::new(),
            }),
        }
    }

    /// Catalog over an arbitrary book list, rejecting duplicate ISBNs.
    pub fn with_books(books: Vec<Book>) -> Result<Self, CatalogError> {
        for (index, book) in books.iter().enumerate() {
            if books[..index].iter().any(|other| other.isbn == book.isbn) {
                return Err(CatalogError::DuplicateIsbn {
                    isbn: book.isbn.clone(),
                });
            }
        }

        Ok(Self {
            state: RwLock::new(CatalogState {
                books,
                users: HashMap::new(),
            }),
        })
    }

    /// Register a new user.
    pub async fn register(&self, credentials: Credentials) -> Result<(), CatalogError> {
        let (username, password) = require_credentials(credentials)?;

        let mut state = self.state.write().await;
        if state.users.contains_key(&username) {
            return Err(CatalogError::UserExists { username });
        }

        state
            .users
            .insert(username.clone(), User { username, password });
        Ok(())
    }

    /// Check a username/password pair against the registered users.
    ///
    /// Unknown users and wrong passwords fail the same way.
    pub async fn login(&self, credentials: Credentials) -> Result<(), CatalogError> {
        let (username, password) = require_credentials(credentials)?;

        let state = self.state.read().await;
        match state.users.get(&username) {
            Some(user) if user.password == password => Ok(()),
            _ => Err(CatalogError::InvalidCredentials),
        }
    }

    /// Add or replace `username`'s review of a book, returning all its reviews.
    pub async fn upsert_review(
        &self,
        isbn: &str,
        draft: ReviewDraft,
    ) -> Result<Reviews, CatalogError> {
        let mut state = self.state.write().await;
        let book = state.book_mut(isbn)?;

        let username = present(draft.username);
        let review = present(draft.review);
        let (username, review) = match (username, review) {
            (Some(username), Some(review)) => (username, review),
            (username, review) => {
                let mut missing = Vec::new();
                if username.is_none() {
                    missing.push("username");
                }
                if review.is_none() {
                    missing.push("review");
                }
                return Err(CatalogError::MissingReviewFields { missing });
            }
        };

        book.reviews.insert(username, review);
        Ok(book.reviews.clone())
    }

    /// Remove `username`'s review of a book, returning the remaining reviews.
    pub async fn delete_review(&self, isbn: &str, username: &str) -> Result<Reviews, CatalogError> {
        let mut state = self.state.write().await;
        let book = state.book_mut(isbn)?;

        if book.reviews.shift_remove(username).is_none() {
            return Err(CatalogError::ReviewNotFound {
                isbn: isbn.to_string(),
                username: username.to_string(),
            });
        }

        Ok(book.reviews.clone())
    }

    /// All books in catalog order.
    pub async fn list_books(&self) -> Vec<Book> {
        self.state.read().await.books.clone()
    }

    /// The book with exactly this ISBN.
    pub async fn book_by_isbn(&self, isbn: &str) -> Result<Book, CatalogError> {
        self.state.read().await.book(isbn).cloned()
    }

    /// Books whose author matches, ignoring case. Never empty on success.
    pub async fn books_by_author(&self, author: &str) -> Result<Vec<Book>, CatalogError> {
        let books = self
            .state
            .read()
            .await
            .matching(author, |book| book.author.as_str());
        if books.is_empty() {
            return Err(CatalogError::NoBooksByAuthor {
                author: author.to_string(),
            });
        }
        Ok(books)
    }

    /// Books whose title matches, ignoring case. Never empty on success.
    pub async fn books_by_title(&self, title: &str) -> Result<Vec<Book>, CatalogError> {
        let books = self
            .state
            .read()
            .await
            .matching(title, |book| book.title.as_str());
        if books.is_empty() {
            return Err(CatalogError::NoBooksWithTitle {
                title: title.to_string(),
            });
        }
        Ok(books)
    }

    /// Number of registered users.
    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::seeded()
    }
}

/// Empty strings count as missing.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn require_credentials(credentials: Credentials) -> Result<(String, String), CatalogError> {
    match (present(credentials.username), present(credentials.password)) {
        (Some(username), Some(password)) => Ok((username, password)),
        (username, password) => {
            let mut missing = Vec::new();
            if username.is_none() {
                missing.push("username");
            }
            if password.is_none() {
                missing.push("password");
            }
            Err(CatalogError::MissingCredentials { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn isbns(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.isbn.as_str()).collect()
    }

    #[tokio::test]
    async fn register_twice_conflicts() {
        let store = CatalogStore::seeded();
        store
            .register(Credentials::new("alice", "pw"))
            .await
            .unwrap();

        let err = store
            .register(Credentials::new("alice", "other"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CatalogError::UserExists {
                username: "alice".to_string()
            }
        );
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn register_requires_both_fields() {
        let store = CatalogStore::seeded();

        let err = store
            .register(Credentials {
                username: Some("bob".to_string()),
                password: Some(String::new()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.missing_fields(), ["password"]);

        let err = store.register(Credentials::default()).await.unwrap_err();
        assert_eq!(err.missing_fields(), ["username", "password"]);
        assert_eq!(err.to_string(), "Username and password are required");
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn login_needs_exact_pair() {
        let store = CatalogStore::seeded();
        store
            .register(Credentials::new("alice", "secret"))
            .await
            .unwrap();

        assert!(store.login(Credentials::new("alice", "secret")).await.is_ok());

        for (username, password) in [
            ("alice", "Secret"),
            ("alice", "secret "),
            ("Alice", "secret"),
            ("nobody", "secret"),
        ] {
            let err = store
                .login(Credentials::new(username, password))
                .await
                .unwrap_err();
            assert_eq!(err, CatalogError::InvalidCredentials);
        }
    }

    #[tokio::test]
    async fn login_validates_before_lookup() {
        let store = CatalogStore::seeded();
        let err = store
            .login(Credentials {
                username: None,
                password: Some("x".to_string()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.missing_fields(), ["username"]);
    }

    #[tokio::test]
    async fn upsert_overwrites_previous_review() {
        let store = CatalogStore::seeded();
        store
            .upsert_review("1111", ReviewDraft::new("alice", "Good"))
            .await
            .unwrap();
        let reviews = store
            .upsert_review("1111", ReviewDraft::new("alice", "Great read"))
            .await
            .unwrap();

        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews["alice"], "Great read");
    }

    #[tokio::test]
    async fn upsert_checks_book_before_fields() {
        let store = CatalogStore::seeded();

        let err = store
            .upsert_review("9999", ReviewDraft::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::BookNotFound {
                isbn: "9999".to_string()
            }
        );

        let err = store
            .upsert_review("1111", ReviewDraft::default())
            .await
            .unwrap_err();
        assert_eq!(err.missing_fields(), ["username", "review"]);
        assert!(store.book_by_isbn("1111").await.unwrap().reviews.is_empty());
    }

    #[tokio::test]
    async fn review_lifecycle() {
        let store = CatalogStore::seeded();

        let reviews = store
            .upsert_review("1111", ReviewDraft::new("alice", "Great read"))
            .await
            .unwrap();
        assert_eq!(
            reviews,
            Reviews::from([("alice".to_string(), "Great read".to_string())])
        );

        let reviews = store.delete_review("1111", "alice").await.unwrap();
        assert!(reviews.is_empty());

        let err = store.delete_review("1111", "alice").await.unwrap_err();
        assert_eq!(err.to_string(), "Review not found for this user");
    }

    #[tokio::test]
    async fn deleting_missing_review_leaves_others() {
        let store = CatalogStore::seeded();
        store
            .upsert_review("2222", ReviewDraft::new("bob", "Lyrical"))
            .await
            .unwrap();

        assert!(store.delete_review("2222", "carol").await.is_err());
        assert!(matches!(
            store.delete_review("0000", "bob").await,
            Err(CatalogError::BookNotFound { .. })
        ));

        let book = store.book_by_isbn("2222").await.unwrap();
        assert_eq!(book.reviews["bob"], "Lyrical");
    }

    #[tokio::test]
    async fn reviews_keep_write_order_across_deletes() {
        let store = CatalogStore::seeded();
        for username in ["zoe", "adam", "mia"] {
            store
                .upsert_review("1111", ReviewDraft::new(username, "ok"))
                .await
                .unwrap();
        }
        store
            .upsert_review("1111", ReviewDraft::new("zoe", "changed my mind"))
            .await
            .unwrap();

        let reviews = store.delete_review("1111", "adam").await.unwrap();
        let order: Vec<&str> = reviews.keys().map(String::as_str).collect();
        assert_eq!(order, ["zoe", "mia"]);
        assert_eq!(reviews["zoe"], "changed my mind");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_review_writes_are_not_lost() {
        let store = Arc::new(CatalogStore::seeded());

        // Existing reviews for the deleting tasks to remove
        for n in 0..50 {
            store
                .upsert_review("1111", ReviewDraft::new(format!("old-{n}"), "stale"))
                .await
                .unwrap();
        }

        let mut tasks = Vec::new();
        for n in 0..200 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store
                    .upsert_review("1111", ReviewDraft::new(format!("reader-{n}"), "nice"))
                    .await
                    .map(|_| ())
            }));
        }
        for n in 0..50 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store
                    .delete_review("1111", &format!("old-{n}"))
                    .await
                    .map(|_| ())
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let reviews = store.book_by_isbn("1111").await.unwrap().reviews;
        assert_eq!(reviews.len(), 200);
        assert!((0..200).all(|n| reviews.contains_key(&format!("reader-{n}"))));
        assert!(!reviews.keys().any(|username| username.starts_with("old-")));
    }

    #[tokio::test]
    async fn list_preserves_seed_order() {
        let store = CatalogStore::seeded();
        assert_eq!(isbns(&store.list_books().await), ["1111", "2222", "3333"]);
    }

    #[tokio::test]
    async fn isbn_lookup_is_exact() {
        let store = CatalogStore::with_books(vec![Book::new("abc", "T", "A")]).unwrap();
        assert!(store.book_by_isbn("abc").await.is_ok());
        assert!(store.book_by_isbn("ABC").await.is_err());
        assert!(store.book_by_isbn("abc ").await.is_err());
    }

    #[tokio::test]
    async fn author_and_title_lookups_ignore_case() {
        let store = CatalogStore::seeded();

        let upper = store.books_by_author("GEORGE ORWELL").await.unwrap();
        let lower = store.books_by_author("george orwell").await.unwrap();
        assert_eq!(upper, lower);
        assert_eq!(isbns(&upper), ["3333"]);

        let titled = store.books_by_title("the ALCHEMIST").await.unwrap();
        assert_eq!(isbns(&titled), ["1111"]);
    }

    #[tokio::test]
    async fn lookups_with_no_match_are_errors() {
        let store = CatalogStore::seeded();
        assert_eq!(
            store.books_by_title("nonexistent").await.unwrap_err(),
            CatalogError::NoBooksWithTitle {
                title: "nonexistent".to_string()
            }
        );
        assert!(store.books_by_author("Orwell").await.is_err());
    }

    #[tokio::test]
    async fn lookups_return_every_match_in_order() {
        let store = CatalogStore::with_books(vec![
            Book::new("1", "Dune", "Frank Herbert"),
            Book::new("2", "Emma", "Jane Austen"),
            Book::new("3", "Dune Messiah", "frank herbert"),
        ])
        .unwrap();

        let books = store.books_by_author("Frank Herbert").await.unwrap();
        assert_eq!(isbns(&books), ["1", "3"]);
    }

    #[test]
    fn duplicate_isbns_are_rejected() {
        let err = CatalogStore::with_books(vec![
            Book::new("1", "A", "X"),
            Book::new("1", "B", "Y"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateIsbn {
                isbn: "1".to_string()
            }
        );
    }
}
