//! Business records exchanged with the data store and over the wire.

pub mod product;
pub mod user;

pub use product::Product;
pub use user::User;
