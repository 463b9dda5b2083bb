pub mod annotation;
pub mod detection;
pub mod event_log;
pub mod pipeline;
pub mod playback;
pub mod preprocessing;
pub mod shared;
pub mod video;
