pub mod chat;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod health;
pub mod user;
pub mod whiteboard;

pub use chat::*;
pub use diagnostics::*;
pub use document::*;
pub use error::*;
pub use health::*;
pub use user::*;
pub use whiteboard::*;
