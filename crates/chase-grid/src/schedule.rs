//! Bake scheduling: deferred first bake, debounced re-bakes, and a single in-flight bake.

use chase_core::{ensure_non_negative, ConfigError, Debouncer};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{BakeReport, GridBaker, LayoutChange, NavGrid, RayCaster};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BakeTiming {
    /// Delay before the first bake so the physics host can finish populating colliders.
    pub initial_delay: f32,
    /// Quiet period a burst of layout changes must respect before a re-bake.
    pub quiet_period: f32,
}

impl Default for BakeTiming {
    fn default() -> Self {
        Self {
            initial_delay: 1.0,
            quiet_period: 0.1,
        }
    }
}

impl BakeTiming {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("initial_delay", self.initial_delay)?;
        ensure_non_negative("quiet_period", self.quiet_period)?;
        Ok(())
    }
}

/// Proof that a bake was started; hand it back through [`BakeScheduler::finish`] or
/// [`BakeScheduler::abandon`].
#[derive(Debug)]
#[must_use = "an outstanding ticket blocks every later bake"]
pub struct BakeTicket {
    _private: (),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// A re-bake is (re)scheduled one quiet period out.
    Scheduled,
    /// The first bake has not run yet and will observe this change anyway.
    Deferred,
    /// A bake is in flight; the trigger is dropped, not queued.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BakeOutcome {
    /// Nothing due this step.
    Idle,
    Baked(BakeReport),
    /// A bake was due but the physics collaborator was missing; it is retried after a quiet
    /// period.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct BakeScheduler {
    timing: BakeTiming,
    debounce: Debouncer,
    initial_pending: bool,
    in_flight: bool,
    bakes_started: u64,
}

impl BakeScheduler {
    /// New scheduler with the first bake armed `initial_delay` seconds out.
    pub fn new(timing: BakeTiming) -> Self {
        let mut debounce = Debouncer::new(timing.quiet_period);
        debounce.trigger_after(timing.initial_delay);
        Self {
            timing,
            debounce,
            initial_pending: true,
            in_flight: false,
            bakes_started: 0,
        }
    }

    pub fn timing(&self) -> BakeTiming {
        self.timing
    }

    pub fn is_baking(&self) -> bool {
        self.in_flight
    }

    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn bakes_started(&self) -> u64 {
        self.bakes_started
    }

    /// Record that the obstacle layout changed.
    pub fn notify_changed(&mut self) -> NotifyOutcome {
        if self.in_flight {
            tracing::debug!("Layout change during bake ignored");
            return NotifyOutcome::Ignored;
        }
        if self.initial_pending {
            return NotifyOutcome::Deferred;
        }
        self.debounce.trigger();
        NotifyOutcome::Scheduled
    }

    /// Feed a batch of layout notifications (e.g. drained from a subscription channel).
    ///
    /// Returns how many notifications were seen.
    pub fn absorb<I>(&mut self, changes: I) -> usize
    where
        I: IntoIterator<Item = LayoutChange>,
    {
        let mut seen = 0;
        for change in changes {
            tracing::debug!(?change, "Obstacle layout changed");
            self.notify_changed();
            seen += 1;
        }
        seen
    }

    /// Advance by `dt` seconds; returns a ticket when a bake should start now.
    pub fn tick(&mut self, dt: f32) -> Option<BakeTicket> {
        if self.in_flight {
            return None;
        }
        if !self.debounce.tick(dt) {
            return None;
        }
        Some(self.start())
    }

    /// Request an immediate bake, bypassing the debounce. Dropped while a bake is in flight.
    pub fn request_now(&mut self) -> Option<BakeTicket> {
        if self.in_flight {
            tracing::debug!("Re-entrant bake request dropped");
            return None;
        }
        self.debounce.cancel();
        Some(self.start())
    }

    pub fn finish(&mut self, ticket: BakeTicket) {
        let BakeTicket { _private: () } = ticket;
        self.in_flight = false;
        self.initial_pending = false;
    }

    /// Give a ticket back without baking; the bake is retried after one quiet period.
    pub fn abandon(&mut self, ticket: BakeTicket) {
        let BakeTicket { _private: () } = ticket;
        self.in_flight = false;
        self.debounce.trigger();
    }

    /// One scheduling step: bake `grid` if a bake is due and `caster` is available.
    pub fn run(
        &mut self,
        dt: f32,
        grid: &mut NavGrid,
        baker: &GridBaker,
        caster: Option<&dyn RayCaster>,
    ) -> BakeOutcome {
        let Some(ticket) = self.tick(dt) else {
            return BakeOutcome::Idle;
        };
        let Some(caster) = caster else {
            tracing::warn!("Bake due but no ray-cast service is available; retrying later");
            self.abandon(ticket);
            return BakeOutcome::Skipped;
        };
        let report = baker.bake(grid, caster);
        self.finish(ticket);
        BakeOutcome::Baked(report)
    }

    fn start(&mut self) -> BakeTicket {
        self.in_flight = true;
        self.bakes_started += 1;
        BakeTicket { _private: () }
    }
}

impl Default for BakeScheduler {
    fn default() -> Self {
        Self::new(BakeTiming::default())
    }
}
