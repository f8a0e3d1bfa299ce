// Application layer - Use cases and the backend seam
pub mod datasource_service;
pub mod query_assembler;
pub mod query_backend;
pub mod response_normalizer;
