//! Shared utilities for the Vitrine services.

pub mod logging;
