//! Shared observable state.
//!
//! Process-wide values (navigation, version, user) live in named
//! [`StateCell`]s owned by a [`StateStore`]. Consumers subscribe to the
//! cells they care about and are notified synchronously on every write.

pub mod cell;
pub mod nav;
pub mod store;

pub use cell::{ObserverId, StateCell};
pub use nav::NavLocation;
pub use store::StateStore;
