pub mod clock;
pub mod links;
pub mod mail;
pub mod store;
