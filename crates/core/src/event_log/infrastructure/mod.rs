pub mod file_event_logger;
