//! Capture-and-share pipeline.
//!
//! Composes the snapshot off-screen, waits for the render-settle barrier,
//! rasterizes, encodes a PNG into an ephemeral artifact and hands it to the
//! share target. The artifact is released on every exit path, including
//! errors, via an RAII guard.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::capture::canvas;
use crate::config::{CaptureConfig, EngineConfig};
use crate::engine::{CalendarWeek, ProgressMetrics};

pub const IMAGE_MIME: &str = "image/png";

#[derive(Debug, Error)]
pub enum CaptureError {
    /// Detected before any capture work starts; the pipeline is not invoked.
    #[error("no share target is available on this system")]
    ShareUnavailable,
    /// The rasterizer returned no image for the off-screen composition.
    #[error("snapshot rasterization produced no image")]
    CaptureFailed,
    #[error("writing snapshot artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding snapshot: {0}")]
    Encode(#[from] image::ImageError),
}

/// How a delivery attempt ended. Cancellation at the share target is a
/// normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Delivered(PathBuf),
    Cancelled,
}

/// Seam to the platform share mechanism.
pub trait ShareTarget {
    /// Probed before capture; an unavailable target short-circuits the
    /// whole pipeline with a distinct error.
    fn is_available(&self) -> bool;

    /// Hand over the ephemeral artifact. Implementations must copy or
    /// persist it; the artifact itself is released when the pipeline exits.
    fn deliver(&self, artifact: &Path, mime: &str, title: &str)
        -> Result<ShareOutcome, CaptureError>;
}

/// Default share target: persists the snapshot to a user-visible file.
pub struct FileSink {
    output: Option<PathBuf>,
}

impl FileSink {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }

    fn destination(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => {
                let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
                PathBuf::from(format!("stride-progress-{stamp}.png"))
            }
        }
    }
}

impl ShareTarget for FileSink {
    fn is_available(&self) -> bool {
        let destination = self.destination();
        match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.is_dir(),
            _ => true, // bare filename lands in the working directory
        }
    }

    fn deliver(
        &self,
        artifact: &Path,
        _mime: &str,
        title: &str,
    ) -> Result<ShareOutcome, CaptureError> {
        let destination = self.destination();
        std::fs::copy(artifact, &destination)?;
        log::info!("{title}: saved snapshot to {}", destination.display());
        Ok(ShareOutcome::Delivered(destination))
    }
}

/// Ephemeral snapshot artifact, removed when dropped.
struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    fn new() -> Self {
        let stamp = chrono::Local::now().format("%Y%m%d%H%M%S%3f");
        let name = format!("stride-snapshot-{}-{stamp}.png", std::process::id());
        Self {
            path: std::env::temp_dir().join(name),
        }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        // Best-effort removal; a leftover temp file is not worth failing over.
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Force the capture canvas to portrait orientation.
///
/// Best-effort analog of the mobile orientation lock: a landscape
/// configuration is silently rotated, never rejected.
fn portrait(config: &CaptureConfig) -> CaptureConfig {
    let mut config = config.clone();
    if config.canvas_width > config.canvas_height {
        log::debug!(
            "rotating capture canvas {}x{} to portrait",
            config.canvas_width,
            config.canvas_height
        );
        std::mem::swap(&mut config.canvas_width, &mut config.canvas_height);
    }
    config
}

/// Render-settle barrier: cooperative yields plus a short fixed delay, so
/// the composition is complete before the rasterizer runs.
///
/// The yield count and delay are empirical; if the host ever exposes a real
/// paint-complete signal this should await that instead.
fn settle(config: &CaptureConfig) {
    for _ in 0..config.settle_yields {
        std::thread::yield_now();
    }
    std::thread::sleep(Duration::from_millis(config.settle_delay_ms));
}

/// Run the full capture-and-share sequence.
///
/// Ordering guarantee: delivery never starts before the off-screen
/// composition has been rasterized behind the settle barrier.
pub fn share_snapshot(
    metrics: &ProgressMetrics,
    weeks: &[CalendarWeek],
    period_label: &str,
    engine: &EngineConfig,
    capture: &CaptureConfig,
    target: &dyn ShareTarget,
) -> Result<ShareOutcome, CaptureError> {
    if !target.is_available() {
        return Err(CaptureError::ShareUnavailable);
    }

    let capture = portrait(capture);
    let composition = canvas::compose(metrics, weeks, period_label, engine, &capture);

    settle(&capture);

    let (width, height) = (composition.width(), composition.height());
    let pixels = composition.rasterize().ok_or(CaptureError::CaptureFailed)?;

    let artifact = TempArtifact::new();
    image::save_buffer(
        &artifact.path,
        &pixels,
        width,
        height,
        image::ExtendedColorType::Rgb8,
    )?;

    // `artifact` is dropped (and the file removed) on every path from here.
    target.deliver(&artifact.path, IMAGE_MIME, &capture.share_title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{bucketize, metrics};
    use crate::models::DayRecord;
    use crate::models::DayStatus::Success;
    use std::cell::RefCell;

    fn fixtures() -> (ProgressMetrics, Vec<CalendarWeek>, EngineConfig, CaptureConfig) {
        let engine = EngineConfig::default();
        let records = vec![DayRecord::new(1, 95, Success), DayRecord::new(2, 85, Success)];
        let m = metrics::compute(&records, &engine);
        let weeks = bucketize(&records, 31, &engine);
        let mut capture = CaptureConfig::default();
        // Keep test rasters small and the settle barrier fast.
        capture.canvas_width = 120;
        capture.canvas_height = 160;
        capture.cell_size = 8;
        capture.cell_gap = 2;
        capture.settle_delay_ms = 0;
        (m, weeks, engine, capture)
    }

    /// Scripted target that records the artifact path it was handed.
    struct Scripted {
        available: bool,
        cancel: bool,
        seen: RefCell<Option<(PathBuf, String, String)>>,
    }

    impl Scripted {
        fn new(available: bool, cancel: bool) -> Self {
            Self {
                available,
                cancel,
                seen: RefCell::new(None),
            }
        }
    }

    impl ShareTarget for Scripted {
        fn is_available(&self) -> bool {
            self.available
        }

        fn deliver(
            &self,
            artifact: &Path,
            mime: &str,
            title: &str,
        ) -> Result<ShareOutcome, CaptureError> {
            assert!(artifact.exists(), "artifact must exist during delivery");
            *self.seen.borrow_mut() =
                Some((artifact.to_path_buf(), mime.to_string(), title.to_string()));
            if self.cancel {
                Ok(ShareOutcome::Cancelled)
            } else {
                Ok(ShareOutcome::Delivered(artifact.to_path_buf()))
            }
        }
    }

    #[test]
    fn unavailable_target_short_circuits_before_capture() {
        let (m, weeks, engine, capture) = fixtures();
        let target = Scripted::new(false, false);
        let result = share_snapshot(&m, &weeks, "test", &engine, &capture, &target);
        assert!(matches!(result, Err(CaptureError::ShareUnavailable)));
        assert!(target.seen.borrow().is_none());
    }

    #[test]
    fn artifact_is_released_after_delivery() {
        let (m, weeks, engine, capture) = fixtures();
        let target = Scripted::new(true, false);
        let result = share_snapshot(&m, &weeks, "test", &engine, &capture, &target).unwrap();
        assert!(matches!(result, ShareOutcome::Delivered(_)));

        let (path, mime, title) = target.seen.borrow().clone().unwrap();
        assert_eq!(mime, IMAGE_MIME);
        assert_eq!(title, capture.share_title);
        assert!(!path.exists(), "ephemeral artifact must be removed");
    }

    #[test]
    fn cancellation_is_a_normal_outcome_and_still_cleans_up() {
        let (m, weeks, engine, capture) = fixtures();
        let target = Scripted::new(true, true);
        let result = share_snapshot(&m, &weeks, "test", &engine, &capture, &target).unwrap();
        assert_eq!(result, ShareOutcome::Cancelled);

        let (path, _, _) = target.seen.borrow().clone().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn degenerate_canvas_is_a_capture_failure() {
        let (m, weeks, engine, mut capture) = fixtures();
        capture.canvas_width = 0;
        capture.canvas_height = 0;
        let target = Scripted::new(true, false);
        let result = share_snapshot(&m, &weeks, "test", &engine, &capture, &target);
        assert!(matches!(result, Err(CaptureError::CaptureFailed)));
        assert!(target.seen.borrow().is_none());
    }

    #[test]
    fn landscape_canvas_is_rotated_to_portrait() {
        let mut config = CaptureConfig::default();
        config.canvas_width = 1920;
        config.canvas_height = 1080;
        let rotated = portrait(&config);
        assert_eq!(rotated.canvas_width, 1080);
        assert_eq!(rotated.canvas_height, 1920);

        // Already-portrait canvases are untouched.
        let unchanged = portrait(&rotated);
        assert_eq!(unchanged.canvas_width, 1080);
    }

    #[test]
    fn file_sink_persists_the_snapshot() {
        let (m, weeks, engine, capture) = fixtures();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("snapshot.png");
        let sink = FileSink::new(Some(output.clone()));

        let result = share_snapshot(&m, &weeks, "test", &engine, &capture, &sink).unwrap();
        assert_eq!(result, ShareOutcome::Delivered(output.clone()));
        assert!(output.exists());

        let decoded = image::open(&output).unwrap();
        assert_eq!(decoded.width(), capture.canvas_width);
        assert_eq!(decoded.height(), capture.canvas_height);
    }

    #[test]
    fn file_sink_with_missing_directory_is_unavailable() {
        let sink = FileSink::new(Some(PathBuf::from("/definitely/not/here/out.png")));
        assert!(!sink.is_available());
    }
}
