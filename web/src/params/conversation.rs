use serde::Deserialize;
use utoipa::IntoParams;

/// Pagination window for conversation and message listings. Each endpoint
/// applies its own default page size when `limit` is omitted.
#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct ListParams {
    /// Maximum number of rows to return.
    pub(crate) limit: Option<u64>,
    /// Number of rows to skip before the first returned one.
    pub(crate) offset: Option<u64>,
}
