use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::{error::Result, state::AppState};

/// Look up a barcode in the UPC database
#[utoipa::path(
    get,
    path = "/proxy/{id}",
    params(
        ("id" = String, Path, description = "UPC / EAN barcode")
    ),
    responses(
        (status = 200, description = "Upstream product document, passed through"),
        (status = 500, description = "Upstream lookup failed")
    ),
    tag = "upc"
)]
pub async fn lookup_product(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse> {
    let body = state.upc_client.lookup(&code).await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}
