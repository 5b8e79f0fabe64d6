pub mod rating_score;

pub use rating_score::*;
