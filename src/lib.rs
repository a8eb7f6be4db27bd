pub mod env {
    pub mod runtime {
        pub mod config;
        pub mod errors;
        pub mod preprocessor;
        pub mod utils;
    }
}

pub use crate::env::runtime::config::{Config, ColorScheme};
pub use crate::env::runtime::errors::{Error, Location};
pub use crate::env::runtime::preprocessor::{Define, Preprocessor};

pub const VERSION: &str = env!("VERSION");
