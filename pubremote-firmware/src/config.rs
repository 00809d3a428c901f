//! Tuning constants generated from remote.toml by build.rs

use pubremote_core::config::LinkConfig;
use pubremote_core::stick::AxisCalibration;

include!(concat!(env!("OUT_DIR"), "/remote_config.rs"));
