pub mod documents;
pub mod generate;
pub mod health;
