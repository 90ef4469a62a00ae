pub mod api;
pub mod config;
pub mod display;
pub mod model;
pub mod notify;
pub mod panel;
pub mod points;
pub mod signup;
pub mod term;
pub mod validate;
