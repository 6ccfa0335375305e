pub mod backend;
pub mod events;
pub mod models;
pub mod request;
pub mod view;
