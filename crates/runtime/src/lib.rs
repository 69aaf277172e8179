pub mod event_bus;
pub mod fetch;
pub mod memo;

pub use event_bus::*;
pub use fetch::*;
pub use memo::*;
