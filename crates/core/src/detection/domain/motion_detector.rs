use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::detection::domain::contours::extract_regions;
use crate::detection::domain::difference_map::DifferenceMap;
use crate::pipeline::pipeline_logger::{NullPipelineLogger, PipelineLogger};
use crate::preprocessing::domain::preprocessed_frame::PreprocessedFrame;
use crate::shared::frame::{ChannelOrder, Frame};
use crate::shared::motion_config::{CoordinateMapping, MotionConfig};
use crate::shared::motion_error::MotionError;
use crate::shared::region::MotionRegion;

/// Threshold and geometry knobs the detector reads from a [`MotionConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorSettings {
    pub activity_threshold: f64,
    pub pixel_threshold: f32,
    pub min_region_area: f64,
    pub canonical_size: (u32, u32),
    pub coordinate_mapping: CoordinateMapping,
}

impl From<&MotionConfig> for DetectorSettings {
    fn from(config: &MotionConfig) -> Self {
        Self {
            activity_threshold: config.activity_threshold,
            pixel_threshold: config.pixel_threshold,
            min_region_area: config.min_region_area,
            canonical_size: config.canonical_size(),
            coordinate_mapping: config.coordinate_mapping,
        }
    }
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self::from(&MotionConfig::default())
    }
}

/// What the detector found for one motion-positive frame.
///
/// `regions` are in canonical coordinates regardless of how they were drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameDetection {
    pub index: usize,
    pub activity: f64,
    pub regions: Vec<MotionRegion>,
}

/// Result of a full detection pass.
///
/// The three sequences are parallel: one entry per frame that passed the
/// activity gate, in source order.
#[derive(Debug, Default)]
pub struct MotionAnalysis {
    pub difference_maps: Vec<DifferenceMap>,
    pub annotated_frames: Vec<Frame>,
    pub detections: Vec<FrameDetection>,
}

impl MotionAnalysis {
    pub fn motion_frame_count(&self) -> usize {
        self.annotated_frames.len()
    }

    pub fn motion_detected(&self) -> bool {
        !self.annotated_frames.is_empty()
    }

    /// Source indices of the motion-positive frames.
    pub fn motion_indices(&self) -> Vec<usize> {
        self.detections.iter().map(|d| d.index).collect()
    }
}

/// Outcome of feeding one frame to [`MotionDetector::push`].
#[derive(Debug)]
pub enum FrameOutcome {
    /// First frame of the sequence; nothing to compare against yet.
    Baseline { index: usize },
    /// Compared, but activity did not exceed the gate.
    Still { index: usize, activity: f64 },
    Motion {
        detection: FrameDetection,
        annotated: Frame,
        difference: DifferenceMap,
    },
}

/// Frame-differencing motion detector.
///
/// Compares each processed frame with the one immediately before it. The
/// comparison baseline advances on every frame, including frames that fail
/// the gate, so slow drift never accumulates into a detection.
pub struct MotionDetector {
    settings: DetectorSettings,
    annotator: Box<dyn FrameAnnotator>,
    previous: Option<Frame>,
}

impl MotionDetector {
    pub fn new(settings: DetectorSettings, annotator: Box<dyn FrameAnnotator>) -> Self {
        Self {
            settings,
            annotator,
            previous: None,
        }
    }

    pub fn settings(&self) -> &DetectorSettings {
        &self.settings
    }

    /// Index of the frame the next push will be compared against.
    pub fn baseline_index(&self) -> Option<usize> {
        self.previous.as_ref().map(Frame::index)
    }

    /// Processes the next frame of the sequence.
    pub fn push(&mut self, frame: PreprocessedFrame) -> Result<FrameOutcome, MotionError> {
        let PreprocessedFrame {
            mut original,
            processed,
        } = frame;
        self.check_processed(&processed)?;
        let index = processed.index();

        let Some(previous) = self.previous.take() else {
            self.previous = Some(processed);
            return Ok(FrameOutcome::Baseline { index });
        };
        let difference = DifferenceMap::between(&previous, &processed);
        self.previous = Some(processed);
        let difference = difference?;

        let activity = difference.activity();
        if activity <= self.settings.activity_threshold {
            log::trace!("Frame {index}: activity {activity:.2} below gate");
            return Ok(FrameOutcome::Still { index, activity });
        }

        let mask = difference.binarize(self.settings.pixel_threshold);
        let regions =
            MotionRegion::retain_significant(extract_regions(&mask), self.settings.min_region_area);

        let drawn: Vec<MotionRegion> = match self.settings.coordinate_mapping {
            CoordinateMapping::Canonical => regions.clone(),
            CoordinateMapping::Scaled => regions
                .iter()
                .map(|r| r.scaled(self.settings.canonical_size, original.dimensions()))
                .collect(),
        };
        self.annotator
            .annotate(&mut original, &drawn)
            .map_err(|source| MotionError::Annotate { index, source })?;

        log::debug!(
            "Frame {index}: activity {activity:.2}, {} region(s)",
            regions.len()
        );

        Ok(FrameOutcome::Motion {
            detection: FrameDetection {
                index,
                activity,
                regions,
            },
            annotated: original,
            difference,
        })
    }

    /// Runs the detector over a whole sequence.
    pub fn detect(self, frames: Vec<PreprocessedFrame>) -> Result<MotionAnalysis, MotionError> {
        self.detect_with_logger(frames, &mut NullPipelineLogger)
    }

    pub fn detect_with_logger(
        mut self,
        frames: Vec<PreprocessedFrame>,
        logger: &mut dyn PipelineLogger,
    ) -> Result<MotionAnalysis, MotionError> {
        let total = frames.len();
        let mut analysis = MotionAnalysis::default();

        for (i, frame) in frames.into_iter().enumerate() {
            let start = std::time::Instant::now();
            let outcome = self.push(frame)?;
            logger.timing("detect", start.elapsed().as_secs_f64() * 1000.0);

            match outcome {
                FrameOutcome::Baseline { .. } => {}
                FrameOutcome::Still { activity, .. } => {
                    logger.metric("activity", activity);
                }
                FrameOutcome::Motion {
                    detection,
                    annotated,
                    difference,
                } => {
                    logger.metric("activity", detection.activity);
                    logger.metric("regions", detection.regions.len() as f64);
                    analysis.difference_maps.push(difference);
                    analysis.annotated_frames.push(annotated);
                    analysis.detections.push(detection);
                }
            }
            logger.progress(i + 1, total);
        }

        Ok(analysis)
    }

    fn check_processed(&self, frame: &Frame) -> Result<(), MotionError> {
        let (w, h) = self.settings.canonical_size;
        if frame.dimensions() != (w, h)
            || frame.channels() != 3
            || frame.order() != ChannelOrder::Rgb
        {
            return Err(MotionError::FrameMismatch {
                index: frame.index(),
                expected: format!("{w}x{h}x3 Rgb"),
                actual: format!(
                    "{}x{}x{} {:?}",
                    frame.width(),
                    frame.height(),
                    frame.channels(),
                    frame.order()
                ),
            });
        }
        Ok(())
    }
}
