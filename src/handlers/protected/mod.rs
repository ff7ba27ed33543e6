// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Routes here sit behind `jwt_auth_middleware`, which puts the verified
// `Claims` into request extensions.

pub mod secure_ping;

pub use secure_ping::secure_ping;
