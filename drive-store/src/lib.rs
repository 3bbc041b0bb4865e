pub mod app_config;
pub mod memory;
pub mod notifier;

pub use memory::{MemoryBookingStore, MemoryCatalog};
pub use notifier::ChannelNotifier;
