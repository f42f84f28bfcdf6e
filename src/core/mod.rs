pub mod config;

pub use config::EdgarConfig;
