//! `SeaORM` Entity definitions

pub mod prelude;

pub mod chart;
pub mod chart_ref;
pub mod cluster;
pub mod deployment_config;
pub mod ephemeral_container;
pub mod ephemeral_container_action;
