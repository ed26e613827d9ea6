// Two security tiers: public (no auth) and protected (bearer token
// required, enforced by the auth middleware layered onto the router).
pub mod protected;
pub mod public;
