pub mod video_display;
