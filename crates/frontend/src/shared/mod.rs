pub mod components;
pub mod filters;
