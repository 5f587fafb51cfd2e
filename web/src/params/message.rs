use serde::Deserialize;
use utoipa::ToSchema;

/// Body of a direct message send request.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct SendParams {
    /// Message text; must not be empty.
    pub(crate) body: String,
}
