// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service discovery and liveness. Nothing here touches catalog data.

pub mod health;
pub mod root;

pub use health::{health, health_with_path};
pub use root::root;
