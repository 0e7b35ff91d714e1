pub mod error;
pub mod form;
pub mod user;
pub mod validation;

pub use error::Error;
pub use user::UserView;
