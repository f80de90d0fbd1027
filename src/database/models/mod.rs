pub mod application;
pub mod company;
pub mod service_tag;
pub mod tender;
pub mod user;

pub use application::{Application, ApplicationStatus};
pub use company::{Company, INDUSTRIES};
pub use service_tag::ServiceTag;
pub use tender::{Tender, TenderStatus, TenderSummary, CATEGORIES};
pub use user::User;
