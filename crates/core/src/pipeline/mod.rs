pub mod analysis_session;
pub mod detect_motion_use_case;
pub mod motion_video_encoder;
pub mod pipeline_logger;
