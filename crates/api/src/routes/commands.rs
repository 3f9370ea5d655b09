//! Command queue endpoint handlers.
//!
//! Operators enqueue and inspect commands; controllers poll their pending
//! work and report outcomes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    AcknowledgeCommandRequest, Command, CommandListResponse, DeleteCommandResponse,
    EnqueueCommandRequest, ListCommandsQuery,
};
use domain::services::QueueError;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiKeyAuth;
use crate::middleware::metrics::{
    record_command_acknowledged, record_command_enqueued, record_command_rejected,
    record_command_removed,
};

/// Label for the rejected-commands counter.
fn rejection_reason(err: &QueueError) -> &'static str {
    match err {
        QueueError::CommandNotFound(_) => "command_not_found",
        QueueError::ControllerNotFound(_) => "controller_not_found",
        QueueError::InvalidTransition { .. } => "invalid_transition",
        QueueError::ConstraintViolation(_) => "constraint_violation",
        QueueError::Store(_) => "store_unavailable",
    }
}

fn rejected(operation: &'static str) -> impl FnOnce(QueueError) -> ApiError {
    move |err| {
        record_command_rejected(operation, rejection_reason(&err));
        err.into()
    }
}

/// Enqueue a command for a controller.
///
/// POST /api/v1/commands
pub async fn enqueue_command(
    State(state): State<AppState>,
    Json(request): Json<EnqueueCommandRequest>,
) -> Result<(StatusCode, Json<Command>), ApiError> {
    request.validate()?;

    let command = state
        .queue
        .enqueue(request.controller_id, &request.action, &request.parameter)
        .await
        .map_err(rejected("enqueue"))?;

    record_command_enqueued();
    Ok((StatusCode::CREATED, Json(command)))
}

/// List every command, in insertion order.
///
/// GET /api/v1/commands
pub async fn list_commands(
    State(state): State<AppState>,
    Query(query): Query<ListCommandsQuery>,
) -> Result<Json<CommandListResponse>, ApiError> {
    query.validate()?;

    let page = state.page_request(query.skip, query.limit);
    let result = state.queue.list_all(page).await?;

    Ok(Json(result.into()))
}

/// Fetch a single command.
///
/// GET /api/v1/commands/:id
pub async fn get_command(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Command>, ApiError> {
    let command = state.queue.get(id).await?;
    Ok(Json(command))
}

/// Pending commands for one controller; the polling endpoint.
///
/// GET /api/v1/commands/controller/:controller_id
pub async fn list_pending_for_controller(
    State(state): State<AppState>,
    Path(controller_id): Path<Uuid>,
    Query(query): Query<ListCommandsQuery>,
) -> Result<Json<CommandListResponse>, ApiError> {
    query.validate()?;

    let page = state.page_request(query.skip, query.limit);
    let result = state
        .queue
        .list_pending_for_controller(controller_id, page)
        .await?;

    Ok(Json(result.into()))
}

/// Report the outcome of a pending command.
///
/// PATCH /api/v1/commands/:id
pub async fn acknowledge_command(
    State(state): State<AppState>,
    auth: ApiKeyAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<AcknowledgeCommandRequest>,
) -> Result<Json<Command>, ApiError> {
    request.validate()?;

    let status = request
        .status
        .ok_or_else(|| ApiError::Validation("status is required".to_string()))?;

    let command = state
        .queue
        .acknowledge(id, status, request.executed_at)
        .await
        .map_err(rejected("acknowledge"))?;

    tracing::debug!(
        command_id = %id,
        key_prefix = %auth.key_prefix,
        status = %command.status,
        "Acknowledgment accepted"
    );
    record_command_acknowledged(command.status);
    Ok(Json(command))
}

/// Hard-delete a command regardless of status.
///
/// DELETE /api/v1/commands/:id
pub async fn delete_command(
    State(state): State<AppState>,
    auth: ApiKeyAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteCommandResponse>, ApiError> {
    state
        .queue
        .remove(id)
        .await
        .map_err(rejected("remove"))?;

    tracing::info!(command_id = %id, key_prefix = %auth.key_prefix, "Command deleted by operator");
    record_command_removed();
    Ok(Json(DeleteCommandResponse::deleted()))
}
