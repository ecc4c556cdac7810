//! Core tool-composition engine
//!
//! Everything in this crate revolves around one contract: a [`Tool`]
//! can be invoked to produce a [`Value`] and updated to refresh its
//! cached state. Combinators compose tools into trees and pipelines;
//! [`ToolSet`] groups them under names with a fixed aggregation
//! strategy; [`ProducerCache`] separates expensive derivation (during
//! `update`) from the hot read path (during `invoke`).
//!
//! # Lifecycle
//!
//! A graph is assembled once at startup. `update` runs top-down when
//! the external context changes (config reload, screen resize) and
//! recomputes derived state; `invoke` runs per request and flows purely
//! through cached state and fresh inputs. The engine is strictly
//! single-threaded and synchronous; if `update` and `invoke` can race,
//! the host must serialize them.

pub mod cache;
pub mod collection;
pub mod config;
pub mod error;
pub mod ops;
pub mod position;
pub mod tool;
pub mod value;

// Re-export commonly used types
pub use cache::{ProducerCache, SharedCache};
pub use collection::{Entry, Strategy, ToolSet};
pub use config::{Config, Settings, SharedConfig};
pub use error::{Result, ToolError};
pub use position::{Region, RegionDependent};
pub use tool::{Tool, ToolHandle};
pub use value::{Args, Map, Value};
