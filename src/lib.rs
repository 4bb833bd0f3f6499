pub mod arguments;
pub mod config;
pub mod devices;
pub mod errors;
pub mod logger;
pub mod paths;
pub mod webserver;
