//! Database models split into domain-specific modules.

pub mod booking;
pub mod common;
pub mod hotel;
pub mod room;
pub mod user;

pub use booking::*;
pub use common::*;
pub use hotel::*;
pub use room::*;
pub use user::*;
