pub mod broadcaster;
pub mod registry;
pub mod session;

pub use broadcaster::Broadcaster;
pub use registry::{ChannelKind, RegistryStats, RoomKey, RoomRegistry};
pub use session::SessionHandle;
