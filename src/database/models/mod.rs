pub mod application;
pub mod user;

pub use application::{Application, ApplicationDraft, Project};
pub use user::{PublicUser, User};
