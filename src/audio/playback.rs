use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Monotonic clock for the output audio timeline, in seconds
pub trait OutputClock: Send {
    fn now(&self) -> f64;
}

/// Wall-clock output timeline anchored at creation time
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputClock for SystemClock {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// A decoded audio segment scheduled on the output timeline
///
/// Owned exclusively by the scheduler from creation until its end-of-playback
/// event fires or it is cancelled by an interrupt.
#[derive(Debug, Clone)]
pub struct PlaybackUnit {
    pub id: u64,
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Scheduled start, in seconds on the output clock
    pub start_at: f64,
}

impl PlaybackUnit {
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Destination for scheduled playback units
///
/// `stop` must tolerate units that already finished or were never scheduled;
/// the scheduler relies on it being safe to call during an interrupt sweep.
pub trait AudioSink: Send {
    fn play(&mut self, unit: &PlaybackUnit) -> Result<()>;
    fn stop(&mut self, unit_id: u64) -> Result<()>;
}

/// Signals whether the model is audibly speaking, for UI indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakingEvent {
    Started,
    Finished,
}

/// Schedules decoded audio segments back-to-back on the output clock
///
/// Segments enqueued faster than real time play gaplessly; segments arriving
/// after the cursor fell behind the clock start immediately. An interrupt
/// cancels every live unit atomically and rewinds the cursor.
pub struct PlaybackScheduler {
    clock: Box<dyn OutputClock>,
    sink: Box<dyn AudioSink>,
    /// Earliest start time for the next unit, in seconds on the output clock
    next_start: f64,
    /// Units currently scheduled or playing
    live: HashSet<u64>,
    next_unit_id: u64,
    speaking: bool,
    events: mpsc::UnboundedSender<SpeakingEvent>,
}

impl PlaybackScheduler {
    pub fn new(
        clock: Box<dyn OutputClock>,
        sink: Box<dyn AudioSink>,
    ) -> (Self, mpsc::UnboundedReceiver<SpeakingEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();

        let scheduler = Self {
            clock,
            sink,
            next_start: 0.0,
            live: HashSet::new(),
            next_unit_id: 0,
            speaking: false,
            events,
        };

        (scheduler, events_rx)
    }

    /// Schedule a decoded segment directly after everything already enqueued
    ///
    /// Returns the id of the new unit.
    pub fn enqueue(&mut self, samples: Vec<f32>, sample_rate: u32) -> u64 {
        let start_at = self.next_start.max(self.clock.now());

        let unit = PlaybackUnit {
            id: self.next_unit_id,
            samples,
            sample_rate,
            start_at,
        };
        self.next_unit_id += 1;

        if let Err(e) = self.sink.play(&unit) {
            warn!("Audio sink rejected unit {}: {}", unit.id, e);
        }

        self.next_start = start_at + unit.duration();
        self.live.insert(unit.id);

        if !self.speaking {
            self.speaking = true;
            let _ = self.events.send(SpeakingEvent::Started);
        }

        debug!(
            "Scheduled unit {} at {:.3}s ({:.3}s long, {} live)",
            unit.id,
            start_at,
            unit.duration(),
            self.live.len()
        );

        unit.id
    }

    /// Record that a unit finished playing naturally
    ///
    /// Late events for units already cancelled by an interrupt are ignored,
    /// so "finished speaking" is never signalled twice for one burst.
    pub fn unit_ended(&mut self, unit_id: u64) {
        if !self.live.remove(&unit_id) {
            return;
        }

        if self.live.is_empty() && self.speaking {
            self.speaking = false;
            let _ = self.events.send(SpeakingEvent::Finished);
        }
    }

    /// Hard-stop every live unit and rewind the schedule cursor
    ///
    /// Idempotent; safe when nothing is playing.
    pub fn interrupt_all(&mut self) {
        for id in self.live.drain() {
            // Stopping an already-finished unit is not an error.
            if let Err(e) = self.sink.stop(id) {
                debug!("Ignoring stop failure for unit {}: {}", id, e);
            }
        }

        self.next_start = 0.0;

        if self.speaking {
            self.speaking = false;
            let _ = self.events.send(SpeakingEvent::Finished);
        }
    }

    /// Stop all playback and release the output clock and sink
    pub fn teardown(mut self) {
        self.interrupt_all();
        debug!("Playback scheduler torn down");
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn next_start(&self) -> f64 {
        self.next_start
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }
}

/// Sink that models playback with timers instead of a hardware device
///
/// Each scheduled unit fires its id on the ended channel once its scheduled
/// end time passes. Stopping a unit cancels the pending timer.
pub struct TimerSink {
    clock: SystemClock,
    ended: mpsc::UnboundedSender<u64>,
    timers: HashMap<u64, JoinHandle<()>>,
}

impl TimerSink {
    pub fn new(clock: SystemClock, ended: mpsc::UnboundedSender<u64>) -> Self {
        Self {
            clock,
            ended,
            timers: HashMap::new(),
        }
    }
}

impl AudioSink for TimerSink {
    fn play(&mut self, unit: &PlaybackUnit) -> Result<()> {
        self.timers.retain(|_, timer| !timer.is_finished());

        let delay = (unit.start_at + unit.duration() - self.clock.now()).max(0.0);
        let ended = self.ended.clone();
        let unit_id = unit.id;

        let timer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs_f64(delay)).await;
            let _ = ended.send(unit_id);
        });

        self.timers.insert(unit_id, timer);
        Ok(())
    }

    fn stop(&mut self, unit_id: u64) -> Result<()> {
        if let Some(timer) = self.timers.remove(&unit_id) {
            timer.abort();
        }
        Ok(())
    }
}

impl Drop for TimerSink {
    fn drop(&mut self) {
        for timer in self.timers.values() {
            timer.abort();
        }
    }
}
