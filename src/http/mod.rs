pub mod caller;
pub mod controllers;
pub mod error;
pub mod util;

pub use caller::Caller;
pub use error::Error;
