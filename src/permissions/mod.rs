//! Permission system for checking user roles.
//!
//! A user counts as an admin when their chat membership status is
//! administrator or creator. Lookups go through the gateway and are cached.

mod checker;

pub use checker::Permissions;
