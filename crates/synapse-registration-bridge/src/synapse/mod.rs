//! Client for the Synapse registration endpoints.

mod client;

pub use client::{SynapseClient, DEFAULT_TIMEOUT};
