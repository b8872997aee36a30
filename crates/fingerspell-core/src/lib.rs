// Re-export types from the protocol crate so they are accessible via fingerspell_core::*
pub use fingerspell_protocol::config;
pub use fingerspell_protocol::landmarks;
pub use fingerspell_protocol::messages;

// Internal Modules
pub mod channel;
pub mod classifier;
pub mod consts;
pub mod dataset;
pub mod error;
pub mod features;
pub mod model;
pub mod replay;
pub mod rules;
pub mod session;
pub mod smoother;
pub mod status;
