pub mod common;
pub mod generate;
pub mod runtime;
pub mod schema;
pub mod transform;
pub mod watch;
