pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;

pub use auth::{Authenticator, Token, TokenProvider};
pub use client::PrismaClient;
pub use config::Config;
pub use error::{Error, Result};
pub use model::{Cve, Package, VulnerabilityRecord};
