pub mod delivery;
pub mod list;
pub mod manage;
pub mod stats;
pub mod types;
pub mod view;

// Re-export all types
pub use types::*;

// Re-export all handlers
pub use delivery::*;
pub use list::*;
pub use manage::*;
pub use stats::*;
pub use view::*;
