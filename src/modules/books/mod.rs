pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, get, put},
    Json, Router,
};
use serde_json::json;
use shelf_http::error::AppError;
use shelf_kernel::{InitCtx, Module};

use crate::catalog::{Book, CatalogStore, ReviewDraft};
use crate::utils::payload_or_default;
use models::ReviewsResponse;

/// Books module: catalog lookups and per-user reviews
pub struct BooksModule {
    store: Arc<CatalogStore>,
}

impl BooksModule {
    pub const fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.store.list_books().await.len();
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/books", get(list_books))
            .route("/books/health", get(health_check))
            .route("/books/isbn/{isbn}", get(book_by_isbn))
            .route("/books/author/{author}", get(books_by_author))
            .route("/books/title/{title}", get(books_by_title))
            .route("/books/review/{isbn}", put(upsert_review))
            .route("/books/review/{isbn}/{username}", delete(delete_review))
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let book_list = json!({
            "description": "Matching books",
            "content": {
                "application/json": {
                    "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } }
                }
            }
        });
        let reviews = json!({
            "description": "Reviews of the book after the change",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ReviewsResponse" }
                }
            }
        });
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let path_param = |name: &str| {
            json!({ "name": name, "in": "path", "required": true, "schema": { "type": "string" } })
        };

        Some(json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": { "200": book_list }
                    }
                },
                "/books/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                },
                "/books/isbn/{isbn}": {
                    "get": {
                        "summary": "Get a book by ISBN",
                        "tags": ["Books"],
                        "parameters": [path_param("isbn")],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": error("Book not found")
                        }
                    }
                },
                "/books/author/{author}": {
                    "get": {
                        "summary": "Find books by author, ignoring case",
                        "tags": ["Books"],
                        "parameters": [path_param("author")],
                        "responses": { "200": book_list, "404": error("No books found by this author") }
                    }
                },
                "/books/title/{title}": {
                    "get": {
                        "summary": "Find books by title, ignoring case",
                        "tags": ["Books"],
                        "parameters": [path_param("title")],
                        "responses": { "200": book_list, "404": error("No books found with this title") }
                    }
                },
                "/books/review/{isbn}": {
                    "put": {
                        "summary": "Add or replace a user's review",
                        "tags": ["Reviews"],
                        "parameters": [path_param("isbn")],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/ReviewDraft" }
                                }
                            }
                        },
                        "responses": {
                            "200": reviews,
                            "400": error("Username and review are required"),
                            "404": error("Book not found")
                        }
                    }
                },
                "/books/review/{isbn}/{username}": {
                    "delete": {
                        "summary": "Delete a user's review",
                        "tags": ["Reviews"],
                        "parameters": [path_param("isbn"), path_param("username")],
                        "responses": {
                            "200": reviews,
                            "404": error("Book or review not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "isbn": { "type": "string", "description": "Unique identifier for the book" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "reviews": {
                                "type": "object",
                                "description": "Review text keyed by username",
                                "additionalProperties": { "type": "string" }
                            }
                        },
                        "required": ["isbn", "title", "author", "reviews"]
                    },
                    "ReviewDraft": {
                        "type": "object",
                        "properties": {
                            "username": { "type": "string" },
                            "review": { "type": "string" }
                        },
                        "required": ["username", "review"]
                    },
                    "ReviewsResponse": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" },
                            "reviews": {
                                "type": "object",
                                "additionalProperties": { "type": "string" }
                            }
                        },
                        "required": ["message", "reviews"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(State(store): State<Arc<CatalogStore>>) -> Json<Vec<Book>> {
    Json(store.list_books().await)
}

async fn book_by_isbn(
    State(store): State<Arc<CatalogStore>>,
    Path(isbn): Path<String>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(store.book_by_isbn(&isbn).await?))
}

async fn books_by_author(
    State(store): State<Arc<CatalogStore>>,
    Path(author): Path<String>,
) -> Result<Json<Vec<Book>>, AppError> {
    let books = store.books_by_author(&author).await?;
    tracing::debug!(%author, matches = books.len(), "author lookup");
    Ok(Json(books))
}

async fn books_by_title(
    State(store): State<Arc<CatalogStore>>,
    Path(title): Path<String>,
) -> Result<Json<Vec<Book>>, AppError> {
    let books = store.books_by_title(&title).await?;
    tracing::debug!(%title, matches = books.len(), "title lookup");
    Ok(Json(books))
}

/// Add or replace a review. The username is taken as given; it need not
/// belong to a registered user.
async fn upsert_review(
    State(store): State<Arc<CatalogStore>>,
    Path(isbn): Path<String>,
    payload: Result<Json<ReviewDraft>, JsonRejection>,
) -> Result<Json<ReviewsResponse>, AppError> {
    let draft = payload_or_default(payload);
    let username = draft.username.clone().unwrap_or_default();

    let reviews = store.upsert_review(&isbn, draft).await?;
    tracing::info!(module = "books", %isbn, %username, "review saved");

    Ok(Json(ReviewsResponse {
        message: "Review added/modified successfully".to_string(),
        reviews,
    }))
}

async fn delete_review(
    State(store): State<Arc<CatalogStore>>,
    Path((isbn, username)): Path<(String, String)>,
) -> Result<Json<ReviewsResponse>, AppError> {
    let reviews = store.delete_review(&isbn, &username).await?;
    tracing::info!(module = "books", %isbn, %username, "review deleted");

    Ok(Json(ReviewsResponse {
        message: "Review deleted successfully".to_string(),
        reviews,
    }))
}

/// Create a new instance of the books module
pub fn create_module(store: Arc<CatalogStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
