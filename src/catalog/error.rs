use thiserror::Error;

/// Failures of catalog operations. `Display` is the client-facing message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Username and password are required")]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("Username and review are required")]
    MissingReviewFields { missing: Vec<&'static str> },

    #[error("User already exists")]
    UserExists { username: String },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Book not found")]
    BookNotFound { isbn: String },

    #[error("Review not found for this user")]
    ReviewNotFound { isbn: String, username: String },

    #[error("No books found by this author")]
    NoBooksByAuthor { author: String },

    #[error("No books found with this title")]
    NoBooksWithTitle { title: String },

    #[error("duplicate isbn '{isbn}' in catalog")]
    DuplicateIsbn { isbn: String },
}

impl CatalogError {
    /// Names of the request fields that were missing, if any
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            CatalogError::MissingCredentials { missing }
            | CatalogError::MissingReviewFields { missing } => missing,
            _ => &[],
        }
    }
}

impl From<CatalogError> for shelf_http::error::AppError {
    fn from(err: CatalogError) -> Self {
        use shelf_http::error::AppError;

        match err {
            CatalogError::MissingCredentials { .. } | CatalogError::MissingReviewFields { .. } => {
                let details = err
                    .missing_fields()
                    .iter()
                    .map(|field| serde_json::json!({ "field": field, "error": "required" }))
                    .collect();
                AppError::validation(details, err.to_string())
            }
            CatalogError::UserExists { ref username } => AppError::conflict(
                vec![serde_json::json!({ "field": "username", "value": username })],
                err.to_string(),
            ),
            CatalogError::InvalidCredentials => AppError::unauthorized(err.to_string()),
            CatalogError::BookNotFound { .. }
            | CatalogError::ReviewNotFound { .. }
            | CatalogError::NoBooksByAuthor { .. }
            | CatalogError::NoBooksWithTitle { .. } => AppError::not_found(err.to_string()),
            CatalogError::DuplicateIsbn { .. } => AppError::Internal(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use shelf_http::error::AppError;

    #[test]
    fn maps_to_http_statuses() {
        let cases = [
            (
                CatalogError::MissingCredentials {
                    missing: vec!["username"],
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                CatalogError::UserExists {
                    username: "alice".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (CatalogError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                CatalogError::ReviewNotFound {
                    isbn: "1111".to_string(),
                    username: "alice".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                CatalogError::DuplicateIsbn {
                    isbn: "1111".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn validation_details_list_missing_fields() {
        let err = AppError::from(CatalogError::MissingReviewFields {
            missing: vec!["review"],
        });
        match err {
            AppError::Validation {
                details, message, ..
            } => {
                assert_eq!(message, "Username and review are required");
                assert_eq!(details[0]["field"], "review");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
