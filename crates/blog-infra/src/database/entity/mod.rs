//! SeaORM entities for the record store tables.

pub mod group;
pub mod post;
pub mod user;
