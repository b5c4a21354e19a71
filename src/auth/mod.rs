pub mod init_data;
pub mod token;

pub use init_data::{verify_init_data, InitDataError, TelegramUser};
pub use token::{Claims, TokenError};
