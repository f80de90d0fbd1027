// Two security tiers: public token acquisition (/auth/*) and
// JWT-protected API operations (/api/*).
pub mod protected;
pub mod public;
