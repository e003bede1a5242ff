//! Headless host: drives a trail engine from a synthetic pointer.
//!
//! The live runner samples the pointer on its own thread and hands samples
//! to the render loop over a channel; only the render loop touches the
//! engine. The simulated runner does the same work on one thread against a
//! hand-advanced clock so results are reproducible.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{select, Receiver, Sender};
use cursor_trail_core::{TrailEngine, TrailMesh, TrailSettings};
use cursor_trail_platform::{
    Clock, ManualClock, MonotonicClock, PointerSample, PointerSource, Result, TrailSurface, ViewportRect,
};
use rand::Rng;
use tracing::{info, trace, warn};

use crate::pointer::LissajousPointer;
use crate::surface::LogSurface;

const SAMPLE_QUEUE_DEPTH: usize = 256;

enum LoopEvent {
    Sample(PointerSample),
    Frame,
    SamplerGone,
}

#[derive(Debug, Clone)]
pub struct HostOptions {
    pub settings: TrailSettings,
    pub seed: Option<u64>,
    /// Number of redraw frames to run.
    pub frames: u64,
    pub tick: Duration,
    pub viewport: ViewportRect,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Timer frames completed.
    pub frames: u64,
    /// Redraws submitted, one per frame plus one per sample in live runs.
    pub draw_calls: u64,
    pub non_empty_draws: u64,
    pub uploaded_bytes: usize,
    pub final_mesh: TrailMesh,
}

impl RunSummary {
    fn from_surface(frames: u64, surface: &LogSurface) -> Self {
        Self {
            frames,
            draw_calls: surface.draw_calls(),
            non_empty_draws: surface.non_empty_draws(),
            uploaded_bytes: surface.uploaded_bytes(),
            final_mesh: surface.last_mesh().clone(),
        }
    }
}

/// Runs in real time with the pointer sampled on a background thread.
pub fn run_live(options: &HostOptions) -> Result<RunSummary> {
    let mut surface = LogSurface::new(options.viewport);
    let viewport = surface.viewport();
    let clock = Arc::new(MonotonicClock::new());
    let (sample_sender, sample_receiver) = crossbeam_channel::bounded(SAMPLE_QUEUE_DEPTH);
    let (stop_sender, stop_receiver) = crossbeam_channel::bounded::<()>(1);
    let sampler = spawn_sampler(
        LissajousPointer::new(viewport),
        Arc::clone(&clock),
        options.tick,
        sample_sender,
        stop_receiver,
    );

    let mut engine = TrailEngine::from_settings(&options.settings, options.seed);
    if !engine.is_enabled() {
        warn!("trail is disabled in settings; frames will be empty");
    }
    let frame_ticker = crossbeam_channel::tick(options.tick);
    let mut frames = 0;

    let mut loop_result: Result<()> = Ok(());
    while frames < options.frames {
        let event = select! {
            recv(sample_receiver) -> sample => sample.ok().map_or(LoopEvent::SamplerGone, LoopEvent::Sample),
            recv(frame_ticker) -> _ => LoopEvent::Frame,
        };
        match event {
            LoopEvent::Sample(sample) => feed_sample(&mut engine, &viewport, sample),
            LoopEvent::Frame => frames += 1,
            LoopEvent::SamplerGone => {
                warn!("pointer sampler exited early");
                break;
            }
        }
        // One redraw per sample plus one per frame.
        if let Err(err) = redraw(&engine, &mut surface, clock.now()) {
            loop_result = Err(err);
            break;
        }
    }

    let sampler_result = stop_sampler(sampler, stop_sender, sample_receiver);
    engine.disable();
    loop_result?;
    sampler_result?;

    Ok(RunSummary::from_surface(frames, &surface))
}

/// Runs `options.frames` ticks against a manual clock without threads.
pub fn run_simulated(options: &HostOptions) -> Result<RunSummary> {
    let mut surface = LogSurface::new(options.viewport);
    let viewport = surface.viewport();
    let clock = ManualClock::new(0.0);
    let mut pointer = LissajousPointer::new(viewport);
    pointer.start()?;

    let mut engine = TrailEngine::from_settings(&options.settings, options.seed);
    let tick = options.tick.as_secs_f64();

    for _ in 0..options.frames {
        clock.advance(tick);
        let now = clock.now();
        if let Some(sample) = pointer.sample(now) {
            feed_sample(&mut engine, &viewport, sample);
        }
        redraw(&engine, &mut surface, now)?;
    }

    pointer.stop()?;
    engine.disable();
    Ok(RunSummary::from_surface(options.frames, &surface))
}

fn spawn_sampler<P, C>(
    mut pointer: P,
    clock: Arc<C>,
    tick: Duration,
    samples: Sender<PointerSample>,
    stop: Receiver<()>,
) -> JoinHandle<Result<()>>
where
    P: PointerSource + 'static,
    C: Clock + 'static,
{
    thread::spawn(move || {
        pointer.start()?;
        let ticker = crossbeam_channel::tick(tick);
        loop {
            let tick_now = select! {
                recv(stop) -> _ => None,
                recv(ticker) -> _ => Some(clock.now()),
            };
            let Some(now) = tick_now else { break };
            if let Some(sample) = pointer.sample(now) {
                if samples.send(sample).is_err() {
                    break;
                }
            }
        }
        pointer.stop()
    })
}

/// Signals the sampler and waits for it. The sample receiver is dropped
/// first so a sampler blocked on a full queue wakes with a send error.
fn stop_sampler(
    sampler: JoinHandle<Result<()>>,
    stop: Sender<()>,
    samples: Receiver<PointerSample>,
) -> Result<()> {
    drop(samples);
    let _ = stop.send(());
    sampler
        .join()
        .map_err(|_| "pointer sampler thread panicked")?
}

/// Converts a screen sample to viewport-local coordinates and feeds it.
fn feed_sample<R: Rng>(engine: &mut TrailEngine<R>, viewport: &ViewportRect, sample: PointerSample) {
    if !viewport.contains(sample.position) {
        trace!(position = ?sample.position, "sample outside viewport");
        return;
    }
    engine.on_sample(viewport.to_local(sample.position), sample.timestamp);
}

fn redraw<R: Rng, S: TrailSurface>(engine: &TrailEngine<R>, surface: &mut S, now: f64) -> Result<()> {
    let mesh = engine.on_redraw(now);
    surface.draw_line_strip(&mesh, engine.line_width())
}

pub fn log_summary(summary: &RunSummary) {
    info!(
        frames = summary.frames,
        draw_calls = summary.draw_calls,
        non_empty = summary.non_empty_draws,
        bytes = summary.uploaded_bytes,
        final_vertices = summary.final_mesh.len(),
        "trail run finished"
    );
}
