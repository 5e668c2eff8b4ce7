// src/server/routes.rs

//! Request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::models::{ProgressRecord, UserRecord};
use crate::pipeline::run_update;
use crate::server::{auth, state::AppState};

/// Body of `POST /users`. Keys other than these two are ignored.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub leetcode_username: String,
    pub email: String,
}

impl From<NewUser> for UserRecord {
    fn from(user: NewUser) -> Self {
        UserRecord::new(user.leetcode_username, user.email)
    }
}

pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserRecord>>> {
    let doc = state.store.load().await?;
    Ok(Json(doc.users))
}

pub async fn add_user(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(user) = payload.map_err(|e| AppError::validation(e.body_text()))?;

    tracing::info!("Adding user {}", user.leetcode_username);
    state.store.add_user(user.into()).await?;

    Ok(Json(json!({ "message": "User added successfully" })))
}

pub async fn get_progress(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ProgressRecord>>> {
    let doc = state.store.load().await?;
    let progress = state.aggregator.get_progress(&doc.users).await?;
    Ok(Json(progress))
}

pub async fn trigger_update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>> {
    auth::verify(&headers, &state.auth)?;

    run_update(state.store.as_ref(), &state.aggregator, &state.dispatcher).await?;

    Ok(Json(json!({ "message": "Update triggered and emails sent" })))
}
