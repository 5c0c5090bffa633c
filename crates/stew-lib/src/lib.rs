//! stew resolves install/build plans for packages whose dependencies span
//! two sources: binary sync repos queried through a materialized [`LocalDb`]
//! and the forge, a remote source registry queried in batches.

pub mod error;
pub use error::Result;
pub use error::Error;

pub mod config;
pub use config::StewOptions;

pub mod version;
pub mod dependency;

pub mod localdb;
pub use localdb::LocalDb;

pub mod forge;
pub use forge::SourcePackage;
pub use forge::SourceRegistry;
pub use forge::HttpRegistry;

pub mod resolver;
pub mod snapshot;
