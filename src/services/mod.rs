pub mod chat_service;
pub mod version_service;
