mod current;
mod manage;
mod open;

pub use self::current::{me, update_me};
pub use self::manage::{create, get, list, search, update};
pub use self::open::register_open;
