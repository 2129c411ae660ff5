pub mod logging;
pub mod shutdown;
