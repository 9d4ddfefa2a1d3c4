//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! bot config (TOML)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → BotConfig (validated, immutable)
//!
//! registry tables (services.json, alts.json)
//!     → loader.rs (ordered tables, degrade to empty on failure)
//!     → Registry::build + alias seeding
//!     → validation.rs (warnings only)
//!
//! On reload (file change or SIGHUP):
//!     watcher.rs / signals.rs
//!     → loader.rs builds a new Registry
//!     → EngineHandle swaps in a new Engine
//! ```
//!
//! # Design Decisions
//! - Bot config is loaded once; only the registry is hot-reloaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::BotConfig;
pub use schema::CacheConfig;
pub use schema::DetectionConfig;
pub use schema::RegistryConfig;
pub use schema::ReplyConfig;
pub use schema::ReplyPolicy;
