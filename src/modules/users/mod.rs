use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use shelf_http::error::AppError;
use shelf_kernel::{InitCtx, Module};

use crate::catalog::{CatalogStore, Credentials};
use crate::utils::{payload_or_default, MessageResponse};

/// Users module: registration and plaintext credential checks
pub struct UsersModule {
    store: Arc<CatalogStore>,
}

impl UsersModule {
    pub const fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "users"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "users module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/register", post(register))
            .route("/login", post(login))
            .route("/users/health", get(health_check))
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let credentials = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/Credentials" }
                }
            }
        });
        let message = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/MessageResponse" }
                    }
                }
            })
        };
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

        Some(json!({
            "paths": {
                "/register": {
                    "post": {
                        "summary": "Register a user",
                        "tags": ["Users"],
                        "requestBody": credentials,
                        "responses": {
                            "200": message("User registered successfully"),
                            "400": error("Missing fields or user already exists")
                        }
                    }
                },
                "/login": {
                    "post": {
                        "summary": "Check a username and password",
                        "tags": ["Users"],
                        "requestBody": credentials,
                        "responses": {
                            "200": message("Login successful"),
                            "400": error("Username and password are required"),
                            "401": error("Invalid username or password")
                        }
                    }
                },
                "/users/health": {
                    "get": {
                        "summary": "Users health check",
                        "tags": ["Users"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Credentials": {
                        "type": "object",
                        "properties": {
                            "username": { "type": "string" },
                            "password": { "type": "string" }
                        },
                        "required": ["username", "password"]
                    },
                    "MessageResponse": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" }
                        },
                        "required": ["message"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "users module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let registered = self.store.user_count().await;
        tracing::info!(
            module = self.name(),
            registered,
            "users module stopped"
        );
        Ok(())
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "users module is healthy"
}

async fn register(
    State(store): State<Arc<CatalogStore>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let credentials: Credentials = payload_or_default(payload);
    let username = credentials.username.clone().unwrap_or_default();

    store.register(credentials).await?;
    tracing::info!(module = "users", %username, "user registered");

    Ok(Json(MessageResponse::new("User registered successfully")))
}

async fn login(
    State(store): State<Arc<CatalogStore>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let credentials: Credentials = payload_or_default(payload);
    let username = credentials.username.clone().unwrap_or_default();

    if let Err(err) = store.login(credentials).await {
        tracing::warn!(module = "users", %username, error = %err, "login rejected");
        return Err(err.into());
    }
    tracing::info!(module = "users", %username, "user logged in");

    Ok(Json(MessageResponse::new("Login successful")))
}

/// Create a new instance of the users module
pub fn create_module(store: Arc<CatalogStore>) -> Arc<dyn Module> {
    Arc::new(UsersModule::new(store))
}
