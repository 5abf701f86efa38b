pub mod config;
pub mod determinism;
pub mod error;
pub mod traits;
pub mod types;

pub use config::*;
pub use determinism::*;
pub use error::*;
pub use traits::*;
pub use types::*;
