//! Commit and date baked in by `build.rs`, printed by `--version`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));
