//! Core traits decoupling driver logic from the synchronization primitive
//! available on the target.
//!
//! # Features
//!
//! - **`embassy`**: Enables `EmbassyState<T>`
//! - `MockState<T>` is always available

pub mod sync;

pub use sync::{MockState, SharedState};

#[cfg(feature = "embassy")]
pub use sync::EmbassyState;
