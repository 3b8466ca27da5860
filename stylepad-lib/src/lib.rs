pub mod classify;
pub mod dom;
pub mod editor;
pub mod error;
pub mod inspect;
pub mod layout;
pub mod page;
pub mod parser;
pub mod server;
pub mod store;
pub mod style;
