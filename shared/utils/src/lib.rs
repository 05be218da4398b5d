pub mod config;
pub mod logging;
pub mod error;
pub mod validation;
pub mod extract;
pub mod backup;
pub mod sink;

pub use self::config::*;
pub use logging::*;
pub use error::*;
pub use validation::*;
pub use extract::*;
pub use backup::*;
pub use sink::*;
