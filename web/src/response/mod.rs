//! Response DTOs that decouple the REST surface from in-memory state.

pub(crate) mod presence;
