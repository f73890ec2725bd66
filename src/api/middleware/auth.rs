use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{api::state::AppState, error::AppError};

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Admin gate for the management routes. The token itself comes from the
/// identity provider; this only checks the signature and the admin claim.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;

    let identity = state.identity.verify(token)?;

    if !identity.is_admin {
        return Err(AppError::Forbidden);
    }

    // Insert the verified identity into request extensions
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
