use std::path::PathBuf;
use std::time::Instant;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::detection::domain::motion_detector::{MotionAnalysis, MotionDetector};
use crate::event_log::domain::event_logger::{EventLogger, MotionEvent};
use crate::preprocessing::domain::frame_preprocessor::FramePreprocessor;
use crate::preprocessing::infrastructure::parallel_preprocessor::ParallelPreprocessor;
use crate::shared::motion_error::MotionError;
use crate::video::domain::frame_decoder::FrameDecoder;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

use super::analysis_session::AnalysisSession;
use super::motion_video_encoder::MotionVideoEncoder;
use super::pipeline_logger::PipelineLogger;

/// Outcome of one analysis run.
#[derive(Debug)]
pub struct AnalysisReport {
    pub source: PathBuf,
    pub total_frames: usize,
    pub motion_frames: usize,
    pub motion_detected: bool,
    /// Set only when a motion video was written.
    pub output_path: Option<PathBuf>,
    pub analysis: MotionAnalysis,
}

/// Runs decode → preprocess → detect → log → encode for one source video.
///
/// Single-use: `execute` moves the components out, so a second call fails
/// with [`MotionError::AlreadyExecuted`].
pub struct DetectMotionUseCase {
    reader: Option<Box<dyn VideoReader>>,
    writer: Option<Box<dyn VideoWriter>>,
    preprocessor: Option<Box<dyn FramePreprocessor>>,
    annotator: Option<Box<dyn FrameAnnotator>>,
    event_logger: Option<Box<dyn EventLogger>>,
    logger: Box<dyn PipelineLogger>,
}

impl DetectMotionUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        writer: Box<dyn VideoWriter>,
        preprocessor: Box<dyn FramePreprocessor>,
        annotator: Box<dyn FrameAnnotator>,
        event_logger: Box<dyn EventLogger>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader: Some(reader),
            writer: Some(writer),
            preprocessor: Some(preprocessor),
            annotator: Some(annotator),
            event_logger: Some(event_logger),
            logger,
        }
    }

    /// An unreadable source fails with [`MotionError::Open`] before any event
    /// is appended, so it is never recorded as "No Motion Detected".
    pub fn execute(&mut self, session: &AnalysisSession) -> Result<AnalysisReport, MotionError> {
        let (
            Some(reader),
            Some(writer),
            Some(preprocessor),
            Some(annotator),
            Some(mut event_logger),
        ) = (
            self.reader.take(),
            self.writer.take(),
            self.preprocessor.take(),
            self.annotator.take(),
            self.event_logger.take(),
        )
        else {
            return Err(MotionError::AlreadyExecuted);
        };

        let start = Instant::now();
        let decoded = FrameDecoder::new(reader).decode(session.source())?;
        self.logger
            .timing("decode", start.elapsed().as_secs_f64() * 1000.0);
        let total_frames = decoded.frames.len();
        self.logger.info(&format!(
            "Decoded {total_frames} frame(s) from {}",
            session.source().display()
        ));

        let start = Instant::now();
        let pool = ParallelPreprocessor::new(session.preprocess_workers());
        let preprocessed = pool.run(preprocessor.as_ref(), decoded.frames)?;
        self.logger
            .timing("preprocess", start.elapsed().as_secs_f64() * 1000.0);

        let analysis = MotionDetector::new(session.detector_settings(), annotator)
            .detect_with_logger(preprocessed, self.logger.as_mut())?;
        let motion_frames = analysis.motion_frame_count();
        let motion_detected = analysis.motion_detected();

        event_logger.append(&MotionEvent::new(session.source(), motion_detected))?;
        let log_path = session.event_log_path();
        let log_path = log_path
            .canonicalize()
            .unwrap_or_else(|_| log_path.to_path_buf());
        self.logger
            .info(&format!("Motion event logged to {}", log_path.display()));

        let output_path = if motion_detected {
            let start = Instant::now();
            let path = MotionVideoEncoder::new(writer).encode(
                &analysis.annotated_frames,
                session.fps(),
                session.output_path(),
            )?;
            self.logger
                .timing("encode", start.elapsed().as_secs_f64() * 1000.0);
            self.logger.info(&format!(
                "Motion video with {motion_frames} frame(s) saved to {}",
                path.display()
            ));
            Some(path)
        } else {
            self.logger.info("No significant motion detected.");
            None
        };

        self.logger.summary();

        Ok(AnalysisReport {
            source: session.source().to_path_buf(),
            total_frames,
            motion_frames,
            motion_detected,
            output_path,
            analysis,
        })
    }
}
