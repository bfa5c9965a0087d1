pub mod handlers;
pub mod seed;
pub mod store;
