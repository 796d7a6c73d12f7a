//! Command implementations for the corvid CLI.

#![allow(unreachable_pub)]

pub mod build;
pub mod check;
