pub mod chat;
pub mod events;
pub mod handler;
pub mod project;
pub mod whiteboard;
