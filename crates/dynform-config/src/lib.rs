//! Configuration management for the dynform system.
//!
//! Settings live in `.dynform/config.yaml`, found by walking up from the
//! working directory, and can be overridden with `DYNFORM_`-prefixed
//! environment variables. See [`config::load_config`].

pub mod config;
pub mod project_dir;
