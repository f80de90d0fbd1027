pub mod applications;
pub mod auth;
pub mod company;
pub mod tenders;
