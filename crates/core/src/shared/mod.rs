pub mod constants;
pub mod frame;
pub mod motion_config;
pub mod motion_error;
pub mod region;
pub mod video_metadata;
