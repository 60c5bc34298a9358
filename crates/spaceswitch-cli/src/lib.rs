//! Spaceswitch CLI library.
//!
//! Input loading, session context and command implementations behind the
//! `spaceswitch` binary. Commands operate on JSON snapshots of a
//! [`spaceswitch_bake::MemoryScene`].

pub mod commands;
pub mod input;
pub mod session;
