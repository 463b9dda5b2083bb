pub mod frame_preprocessor;
pub mod preprocessed_frame;
