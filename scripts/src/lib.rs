//! Scripts for deploying the ConditionalTokens and Treasury smart contracts.

pub mod accounts;
pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod errors;
pub mod network;

/// Our deploy utils
pub mod deploy;

/// Our deployment records
pub mod output_writer;

pub mod tx;
