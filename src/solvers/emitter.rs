use std::{
    ops::ControlFlow,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{SyncSender, TrySendError},
    },
    time::Duration,
};

use super::{Phase, SolveOutcome, StepEvent};
use crate::config::{Config, Speed};

/// Receives search progress one step at a time.
///
/// Returning `ControlFlow::Break` stops the search; the solve then finishes
/// with a cancelled status.
pub trait StepSink {
    fn emit(&mut self, event: StepEvent) -> ControlFlow<()>;
}

impl StepSink for Vec<StepEvent> {
    fn emit(&mut self, event: StepEvent) -> ControlFlow<()> {
        self.push(event);
        ControlFlow::Continue(())
    }
}

impl<S: StepSink + ?Sized> StepSink for &mut S {
    fn emit(&mut self, event: StepEvent) -> ControlFlow<()> {
        (**self).emit(event)
    }
}

/// Messages sent from the solver thread to whoever is drawing the maze.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveEvent {
    Step(StepEvent),
    /// Always the last message of a solve that was not cancelled.
    Finished(SolveOutcome),
}

/// Pause after each step, derived from a speed setting.
///
/// Exploration steps wait `explore_delay_units / speed` time units and
/// reconstruction steps `reconstruct_delay_units / speed`, using integer
/// division. Purely cosmetic: results never depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub explore: Duration,
    pub reconstruct: Duration,
}

impl Pacing {
    pub const NONE: Pacing = Pacing {
        explore: Duration::ZERO,
        reconstruct: Duration::ZERO,
    };

    pub fn new(speed: Speed, config: &Config) -> Self {
        let speed = speed.get() as u32;
        Pacing {
            explore: config.time_unit * (config.explore_delay_units / speed),
            reconstruct: config.time_unit * (config.reconstruct_delay_units / speed),
        }
    }

    pub fn delay_for(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Exploring => self.explore,
            Phase::Reconstructing => self.reconstruct,
        }
    }
}

/// Forwards steps over a bounded channel, pausing between them.
///
/// The cancel flag is checked before every hand-off and while waiting on a
/// full channel, so the owning thread can always be joined promptly.
pub struct ChannelEmitter {
    tx: SyncSender<SolveEvent>,
    cancel: Arc<AtomicBool>,
    pacing: Pacing,
    send_poll: Duration,
}

impl ChannelEmitter {
    pub fn new(
        tx: SyncSender<SolveEvent>,
        cancel: Arc<AtomicBool>,
        pacing: Pacing,
        send_poll: Duration,
    ) -> Self {
        Self {
            tx,
            cancel,
            pacing,
            send_poll,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// Hands `event` to the consumer.
    /// Breaks if cancelled or if the receiver has been dropped.
    fn hand_off(&self, event: SolveEvent) -> ControlFlow<()> {
        let mut pending = event;
        loop {
            if self.is_cancelled() {
                return ControlFlow::Break(());
            }
            match self.tx.try_send(pending) {
                Ok(()) => return ControlFlow::Continue(()),
                Err(TrySendError::Full(event)) => {
                    // Consumer is behind, wait and check the cancel flag again
                    pending = event;
                    std::thread::sleep(self.send_poll);
                }
                Err(TrySendError::Disconnected(_)) => {
                    tracing::debug!("Step receiver dropped, stopping solve");
                    return ControlFlow::Break(());
                }
            }
        }
    }

    /// Sends the final outcome. Nothing is sent once the solve has been cancelled.
    pub fn finish(&self, outcome: SolveOutcome) {
        // Error only happens if the consumer has gone away, nothing left to tell it
        let _ = self.hand_off(SolveEvent::Finished(outcome));
    }
}

impl StepSink for ChannelEmitter {
    fn emit(&mut self, event: StepEvent) -> ControlFlow<()> {
        if self.hand_off(SolveEvent::Step(event)).is_break() {
            return ControlFlow::Break(());
        }
        let delay = self.pacing.delay_for(event.phase);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        ControlFlow::Continue(())
    }
}
