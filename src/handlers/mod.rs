// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (JWT auth). The protected tier receives the
// caller as an `AuthUser` extension from `middleware::jwt_auth_middleware`.

pub mod protected; // JWT authentication required
pub mod public; // No authentication required
