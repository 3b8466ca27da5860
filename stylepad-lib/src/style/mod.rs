pub mod cascade;
pub mod color;
pub mod owned_css;
pub mod property;
pub mod selector;
