pub mod connection;
pub mod credential_repository;
pub mod rating_repository;

pub use connection::Database;
pub use credential_repository::PostgresCredentialRepository;
pub use rating_repository::PostgresRatingRepository;
