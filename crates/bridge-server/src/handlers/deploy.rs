//! Deploy HTTP handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use bridge_store::logic_file_name;
use tracing::{error, info, warn};

use crate::dto::DeployRequest;
use crate::error::AppError;
use crate::ServerState;

/// Acknowledgment body the editor waits for.
pub const SUCCESS_BODY: &str = "Success";

/// Saves a layout, its logic file and a timestamped backup.
///
/// The body is validated before any file is touched.
pub async fn deploy(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let req = DeployRequest::from_slice(&body).map_err(|e| {
        warn!("Rejected deploy: {}", e);
        AppError::from(e)
    })?;

    let code = req.code.clone();
    let logic_name = logic_file_name(&req.file_num);

    let receipt = state.store.deploy(req.into_deploy()).await.map_err(|e| {
        error!("Deploy of {} failed: {}", code, e);
        AppError::from(e)
    })?;

    info!("DEPLOYED: {} to {}", code, logic_name);
    info!("BACKUP:   {}", receipt.backup_path.display());

    Ok(SUCCESS_BODY)
}
