use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use tokio::task::spawn_blocking;
use tracing::{debug, info};

use crate::{
    error::AppError,
    frame::{Frame, FrameState, apply_action, parse_action},
    render::{Illustration, card::Card, render_card},
    state::AppState,
};

pub const IMAGE_CACHE_CONTROL: &str = "max-age=10";

#[derive(Deserialize)]
pub struct FrameParams {
    state: Option<String>,
}

#[derive(Deserialize)]
pub struct ImageParams {
    query: Option<String>,
    response: Option<String>,
}

pub async fn frame_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FrameParams>,
    body: Bytes,
) -> Result<Html<String>, AppError> {
    let mut frame_state = FrameState::decode_state(params.state.as_deref())?;

    if let Some(action) = parse_action(&body)? {
        debug!("Action from fid {:?}", action.untrusted_data.fid);
        frame_state = apply_action(frame_state, &action);
    }

    let response = if frame_state.has_query() {
        info!("Asking agent: {}", frame_state.query);
        state.agent.get_response(&frame_state.query).await
    } else {
        String::new()
    };

    let frame = Frame::new(&state.config, &frame_state, &response)?;

    Ok(Html(frame.to_html()))
}

pub async fn image_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ImageParams>,
) -> Result<impl IntoResponse, AppError> {
    let card = Card::new(params.query, params.response);
    let illustration = Illustration::fetch(
        &state.client,
        &state.config.illustration_url,
        state.config.illustration_timeout,
    )
    .await?;

    let fonts = state.fonts.clone();
    let png = spawn_blocking(move || render_card(&fonts, &card, &illustration))
        .await
        .map_err(|e| AppError::InternalError(Box::new(e)))??;

    Ok((
        [(CONTENT_TYPE, "image/png"), (CACHE_CONTROL, IMAGE_CACHE_CONTROL)],
        png,
    ))
}
