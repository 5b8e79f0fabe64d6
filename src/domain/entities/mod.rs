pub mod identity;
pub mod movie;
pub mod rating;
pub mod user;

pub use identity::*;
pub use movie::*;
pub use rating::*;
pub use user::*;
