//! Port traits at the boundary between the core and the outside world.

pub mod config_port;
pub mod data_port;
pub mod report_port;
