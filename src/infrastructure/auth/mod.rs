pub mod password;
pub mod token_codec;

pub use password::{PasswordError, hash_password, verify_password};
pub use token_codec::{IssuedToken, TokenCodec, TokenIssueError};
