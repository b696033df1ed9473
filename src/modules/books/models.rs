use serde::Serialize;

use crate::catalog::Reviews;

/// Response for review mutations: confirmation plus the book's reviews.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewsResponse {
    pub message: String,
    pub reviews: Reviews,
}
