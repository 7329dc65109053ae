pub use crate::base::{
    config::Config,
    types::{Context, Err, MessageEvent, Res, Void},
};
pub use anyhow::anyhow;
pub use tracing::{debug, error, info, instrument, warn};
