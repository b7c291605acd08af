//! Helmsman server library
//!
//! Wires configuration, logging and the database into the cluster and
//! deployment services behind the command line subcommands.

pub mod command;
pub mod model;
pub mod startup;
