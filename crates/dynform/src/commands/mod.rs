//! Command handlers, one module per subcommand.

pub mod fields;
pub mod fill;
