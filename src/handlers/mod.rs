// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Catalog (no auth, store-backed CRUD) → Protected (JWT auth)
pub mod public;    // `/`, `/health`
pub mod catalog;   // `/catalogs`, `/catalogs/:poi`
pub mod protected; // `/secure-catalog-ping`
