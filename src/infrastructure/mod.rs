pub mod json_repo;
pub mod json_store;
