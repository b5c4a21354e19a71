pub mod market;
pub mod user;

pub use market::{Market, MarketStatus};
pub use user::{Role, User};
