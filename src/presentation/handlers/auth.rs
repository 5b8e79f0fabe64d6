use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::Json,
};

use super::AppState;
use crate::application::{
    dto::{LoginRequest, TokenResponse},
    use_cases::LoginUseCase,
};
use crate::presentation::middleware::error::AppError;

/// Exchange form credentials for a bearer token
///
/// # Errors
/// Returns `Authentication` for bad credentials and `BadRequest` for a malformed form
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginRequest>, FormRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Form(request) = form?;

    let use_case = LoginUseCase::new(state.credentials.clone(), state.codec.clone(), state.token_ttl);
    let response = use_case.execute(&request.username, &request.password).await?;

    Ok(Json(response))
}
