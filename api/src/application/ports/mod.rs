pub mod avatar_storage;
pub mod contact_repository;
pub mod email_sender;
pub mod user_cache;
