use std::sync::atomic::{AtomicBool, Ordering};

use crate::preprocessing::domain::frame_preprocessor::{FramePreprocessor, PreprocessError};
use crate::preprocessing::domain::preprocessed_frame::PreprocessedFrame;
use crate::shared::frame::Frame;

/// Runs a [`FramePreprocessor`] over a whole decoded video.
///
/// Frames are independent, so work is spread across scoped worker threads
/// fed from a shared queue. Output order always matches input order. The
/// first failing frame stops every worker before it takes another job.
pub struct ParallelPreprocessor {
    workers: usize,
}

impl ParallelPreprocessor {
    /// `workers == 0` uses the available parallelism.
    pub fn new(workers: usize) -> Self {
        let workers = if workers == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            workers
        };
        Self { workers }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn run(
        &self,
        preprocessor: &dyn FramePreprocessor,
        frames: Vec<Frame>,
    ) -> Result<Vec<PreprocessedFrame>, PreprocessError> {
        let workers = self.workers.min(frames.len()).max(1);
        let processed = if workers == 1 {
            frames
                .iter()
                .map(|f| preprocessor.preprocess(f))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            run_parallel(preprocessor, &frames, workers)?
        };

        Ok(frames
            .into_iter()
            .zip(processed)
            .map(|(original, processed)| PreprocessedFrame {
                original,
                processed,
            })
            .collect())
    }
}

impl Default for ParallelPreprocessor {
    fn default() -> Self {
        Self::new(0)
    }
}

fn run_parallel(
    preprocessor: &dyn FramePreprocessor,
    frames: &[Frame],
    workers: usize,
) -> Result<Vec<Frame>, PreprocessError> {
    let (job_tx, job_rx) = crossbeam_channel::unbounded::<usize>();
    for i in 0..frames.len() {
        // The receiver is alive, so sending on an unbounded channel cannot fail.
        let _ = job_tx.send(i);
    }
    drop(job_tx);

    let (done_tx, done_rx) = crossbeam_channel::unbounded();
    let failed = AtomicBool::new(false);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            let failed = &failed;
            scope.spawn(move || {
                for i in job_rx {
                    if failed.load(Ordering::Relaxed) {
                        break;
                    }
                    let result = preprocessor.preprocess(&frames[i]);
                    if result.is_err() {
                        failed.store(true, Ordering::Relaxed);
                    }
                    if done_tx.send((i, result)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(done_tx);

    let mut processed = done_rx
        .into_iter()
        .map(|(i, result)| result.map(|frame| (i, frame)))
        .collect::<Result<Vec<_>, _>>()?;
    processed.sort_by_key(|(i, _)| *i);
    Ok(processed.into_iter().map(|(_, frame)| frame).collect())
}
