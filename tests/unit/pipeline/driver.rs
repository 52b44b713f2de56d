use super::*;
use crate::assets::media::VideoInfo;
use crate::decode::source::InMemorySource;
use crate::encode::sink::InMemorySink;
use crate::geometry::quad::Quad;

const A: [u8; 4] = [200, 40, 40, 255];

fn info(w: u32, h: u32) -> VideoInfo {
    VideoInfo {
        width: w,
        height: h,
        fps: Fps::new(25, 1).unwrap(),
        frame_count: None,
        pix_fmt: None,
    }
}

fn source(n: usize) -> InMemorySource {
    InMemorySource::new(info(8, 6), vec![FrameRGBA::solid(8, 6, A); n]).unwrap()
}

fn region(t: f64) -> Region {
    Region {
        quad: Quad::from_rect(0.0, 0.0, 7.0, 5.0).unwrap(),
        start_time_sec: t,
    }
}

fn overlay() -> OverlayImage {
    OverlayImage::solid(4, 4, [0, 0, 255]).unwrap()
}

#[derive(Default)]
struct FailingSink {
    pushed: u64,
    fail_at: u64,
    aborted: bool,
    ended: bool,
}

impl FrameSink for FailingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> QuadwarpResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &FrameRGBA) -> QuadwarpResult<()> {
        if self.pushed == self.fail_at {
            return Err(QuadwarpError::write_failure("disk full"));
        }
        self.pushed += 1;
        Ok(())
    }

    fn end(&mut self) -> QuadwarpResult<()> {
        self.ended = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

#[test]
fn default_opts_are_sequential() {
    let opts = PipelineOpts::default();
    assert!(!opts.parallel);
    assert_eq!(opts.chunk_size, 64);
    assert_eq!(opts.threads, None);
    assert_eq!(opts.progress_every, 50);
}

#[test]
fn zero_threads_rejected() {
    assert!(matches!(
        build_thread_pool(Some(0)).unwrap_err(),
        QuadwarpError::Validation(_)
    ));
    assert!(build_thread_pool(Some(2)).is_ok());
}

#[test]
fn chunk_size_zero_means_one() {
    assert_eq!(normalized_chunk_size(0), 1);
    assert_eq!(normalized_chunk_size(16), 16);
}

#[test]
fn write_failure_aborts_sink() {
    let mut src = source(6);
    let mut sink = FailingSink {
        fail_at: 3,
        ..Default::default()
    };
    let err = run_pipeline(
        &mut src,
        &overlay(),
        &region(0.0),
        &mut sink,
        &PipelineOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, QuadwarpError::WriteFailure(_)));
    assert!(sink.aborted);
    assert!(!sink.ended);
    assert_eq!(src.remaining(), 0);
}

#[test]
fn empty_source_is_unreadable_video() {
    let mut src = source(0);
    let mut sink = InMemorySink::new();
    let err = run_pipeline(
        &mut src,
        &overlay(),
        &region(0.0),
        &mut sink,
        &PipelineOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, QuadwarpError::UnreadableVideo(_)));
    assert!(sink.config().is_none());
}

#[test]
fn wrong_sized_frame_is_unreadable_video() {
    let mut src = InMemorySource::new(info(8, 6), vec![FrameRGBA::solid(8, 6, A)]).unwrap();
    let plan = OverlayPlan::prepare(&overlay(), &region(0.0), info(8, 6).canvas(), info(8, 6).fps)
        .unwrap();
    let bad = FrameRGBA::solid(4, 4, A);
    assert!(matches!(
        check_frame_dims(&plan, &bad, 0).unwrap_err(),
        QuadwarpError::UnreadableVideo(_)
    ));
    assert!(preview_from_source(&mut src, &plan, FrameIndex(0)).is_ok());
}

#[test]
fn preview_past_end_is_rejected() {
    let mut src = source(3);
    let plan = OverlayPlan::prepare(&overlay(), &region(0.0), info(8, 6).canvas(), info(8, 6).fps)
        .unwrap();
    let err = preview_from_source(&mut src, &plan, FrameIndex(3)).unwrap_err();
    assert!(matches!(err, QuadwarpError::Validation(_)));
}

#[test]
fn preview_honors_start_time() {
    let plan = OverlayPlan::prepare(&overlay(), &region(0.08), info(8, 6).canvas(), info(8, 6).fps)
        .unwrap();
    assert_eq!(plan.start_frame, FrameIndex(2));
    let before = preview_from_source(&mut source(5), &plan, FrameIndex(1)).unwrap();
    assert_eq!(before, FrameRGBA::solid(8, 6, A));
    let after = preview_from_source(&mut source(5), &plan, FrameIndex(2)).unwrap();
    assert_eq!(after.pixel(3, 3), [0, 0, 255, 255]);
}

#[test]
fn progress_counts_frames() {
    let mut p = Progress {
        every: 2,
        total: Some(5),
        done: 0,
    };
    for _ in 0..5 {
        p.advance();
    }
    assert_eq!(p.done, 5);
}
