//! # Transaction Routes
//!
//! Builders return an unsigned, base64 encoded transaction with the caller's
//! wallet as fee payer. The wallet signs it and posts it back to `/submit`.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use solana_sdk::instruction::Instruction;

use super::{ApiJson, ApiQuery, ApiResponse, parse_pubkey};
use crate::{
    error::{Error, Result},
    explorer,
    programs::{
        anchor_movie_review::{self, ReviewView},
        movie_review::{self, MovieAccount, ReviewVariant},
        ping,
        student_intro::{self, IntroVariant},
    },
    server::AppState,
    submitter::{UnsignedTransaction, build_unsigned, submit_signed},
};

#[derive(Debug, Deserialize)]
pub struct PingRequest {
    pub fee_payer: String,
}

#[derive(Debug, Deserialize)]
pub struct MovieReviewRequest {
    pub fee_payer: String,
    pub title: String,
    pub rating: u8,
    pub description: String,
    #[serde(default)]
    pub update: bool,
}

#[derive(Debug, Deserialize)]
pub struct StudentIntroRequest {
    pub fee_payer: String,
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub update: bool,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Base64 encoded, wallet-signed transaction
    pub transaction: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub tx_signature: String,
    pub explorer_url: String,
}

#[derive(Debug, Deserialize)]
pub struct MovieReviewQuery {
    pub reviewer: String,
    pub title: String,
    /// Read from the Anchor program instead of the native one
    #[serde(default)]
    pub anchor: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StoredReview {
    Native(MovieAccount),
    Anchor(ReviewView),
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

async fn unsigned(state: &AppState, fee_payer: &str, instruction: Instruction) -> Result<Json<ApiResponse<UnsignedTransaction>>> {
    let fee_payer = parse_pubkey("fee_payer", fee_payer)?;
    let unsigned = build_unsigned(state.ledger.as_ref(), &fee_payer, &[instruction]).await?;
    tracing::debug!("Built unsigned transaction for {}", fee_payer);
    Ok(Json(ApiResponse::success(unsigned)))
}

/// `POST /api/v1/tx/ping`
pub async fn build_ping(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<PingRequest>,
) -> Result<Json<ApiResponse<UnsignedTransaction>>> {
    let programs = &state.config.programs;
    let instruction = Instruction::new_with_bytes(programs.ping, &ping::ping_payload(), ping::ping_accounts(&programs.ping_data));
    unsigned(&state, &body.fee_payer, instruction).await
}

/// `POST /api/v1/tx/movie-review`
pub async fn build_movie_review(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<MovieReviewRequest>,
) -> Result<Json<ApiResponse<UnsignedTransaction>>> {
    require_text("title", &body.title)?;
    let reviewer = parse_pubkey("fee_payer", &body.fee_payer)?;
    let variant = if body.update { ReviewVariant::Update } else { ReviewVariant::Add };

    let instruction = movie_review::review_instruction(
        &state.config.programs.movie_review,
        &reviewer,
        variant,
        &body.title,
        body.rating,
        &body.description,
    )?;
    unsigned(&state, &body.fee_payer, instruction).await
}

/// `POST /api/v1/tx/anchor-movie-review`
pub async fn build_anchor_movie_review(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<MovieReviewRequest>,
) -> Result<Json<ApiResponse<UnsignedTransaction>>> {
    require_text("title", &body.title)?;
    let initializer = parse_pubkey("fee_payer", &body.fee_payer)?;
    let program_id = &state.config.programs.anchor_movie_review;

    let instruction = if body.update {
        anchor_movie_review::update_review(program_id, &initializer, &body.title, &body.description, body.rating)?
    } else {
        anchor_movie_review::add_review(program_id, &initializer, &body.title, &body.description, body.rating)?
    };
    unsigned(&state, &body.fee_payer, instruction).await
}

/// `POST /api/v1/tx/student-intro`
pub async fn build_student_intro(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<StudentIntroRequest>,
) -> Result<Json<ApiResponse<UnsignedTransaction>>> {
    require_text("name", &body.name)?;
    let program_id = state.config.student_intro_program()?;
    let student = parse_pubkey("fee_payer", &body.fee_payer)?;
    let variant = if body.update { IntroVariant::Update } else { IntroVariant::Add };

    let instruction = student_intro::intro_instruction(&program_id, &student, variant, &body.name, &body.message)?;
    unsigned(&state, &body.fee_payer, instruction).await
}

/// `POST /api/v1/tx/submit`
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SubmitRequest>,
) -> Result<Json<ApiResponse<SubmitResponse>>> {
    let signature = submit_signed(state.ledger.as_ref(), &body.transaction).await?;

    Ok(Json(ApiResponse::success(SubmitResponse {
        explorer_url: explorer::transaction_url(&signature, &state.config.cluster),
        tx_signature: signature.to_string(),
    })))
}

/// `GET /api/v1/movie-review?reviewer=<base58>&title=<title>[&anchor=true]`
pub async fn get_movie_review(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MovieReviewQuery>,
) -> Result<Json<ApiResponse<StoredReview>>> {
    let reviewer = parse_pubkey("reviewer", &query.reviewer)?;
    let programs = &state.config.programs;

    let address = if query.anchor {
        anchor_movie_review::review_address(&programs.anchor_movie_review, &reviewer, &query.title)?
    } else {
        movie_review::review_address(&programs.movie_review, &reviewer, &query.title)?
    }
    .address;

    let account = state
        .ledger
        .account(&address)
        .await?
        .ok_or(Error::AccountNotFound(address))?;

    let review = if query.anchor {
        StoredReview::Anchor(anchor_movie_review::decode_review(&account.data)?.into())
    } else {
        StoredReview::Native(movie_review::decode_review(&account.data)?)
    };
    Ok(Json(ApiResponse::success(review)))
}
