//! Turns a list of raw targets into a consistent, ordered, non-redundant
//! install/build plan spanning the sync repos and the forge.
//!
//! # Usage
//! 1. [`resolve()`] the raw target strings into a [`DepPool`].
//! 1. [`DepPool::check_missing()`] and inspect the report before going further.
//! 1. [`InstallOrder::from_pool()`] to get the dependency-first plan.
//! 1. Hand the plan's repo packages to the binary installer and fetch/build
//! the ordered source bases.
//!
//! Ambiguous provider choices are routed through a [`ProviderPicker`]; the
//! default [`TakeFirst`] keeps resolution non-interactive.

mod pool;
pub use pool::DepPool;
pub use pool::ProviderPicker;
pub use pool::TakeFirst;
pub use pool::resolve;

mod missing;
pub use missing::MissingReport;

mod order;
pub use order::InstallOrder;
