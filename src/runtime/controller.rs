//! The controller: command dispatch, reload sequencing, and the tick loop.

use std::fmt;
use std::sync::Arc;

use crate::config::{ConfigPipeline, ParseReport};
use crate::core::{LogBuffer, LogSink, ResourcePool, RunOutcome, Scheduler, StepBudget};
use crate::discovery::DiscoveryOp;
use crate::infra::ConfigSource;
use crate::policy::{DoorPolicyEngine, LockdownFlag, ManageDoorsOp};
use crate::runtime::{
    Command, ControllerContext, MaintenanceOp, MaintenanceTargets, NamedPool, PoolMaintenance,
    UpdateDirective,
};
use crate::util::Clock;

/// Logged when the host passes an unknown command.
pub const INVALID_ARGUMENT: &str = "Invalid argument";

/// A door controller instance driven by host invocations.
pub struct Controller {
    cx: ControllerContext,
    scheduler: Scheduler<ControllerContext>,
    config_source: Box<dyn ConfigSource>,
    clock: Box<dyn Clock>,
    steps_per_tick: u32,
    discovery_pool: ResourcePool<DiscoveryOp>,
    manage_pool: ResourcePool<ManageDoorsOp>,
    maintenance: MaintenanceTargets,
    last_pending: usize,
    backlog_ticks: u32,
}

impl Controller {
    /// Assemble a controller and run the initial reload. Use
    /// [`crate::builders::ControllerBuilder`] rather than calling this
    /// directly.
    pub(crate) fn new(
        cx: ControllerContext,
        config_source: Box<dyn ConfigSource>,
        clock: Box<dyn Clock>,
        steps_per_tick: u32,
    ) -> Self {
        let discovery_pool = ResourcePool::new(DiscoveryOp::default);
        let manage_pool = ResourcePool::new(ManageDoorsOp::default);
        let maintenance: MaintenanceTargets = Arc::from(vec![
            Arc::new(NamedPool::new("discovery", discovery_pool.clone())) as Arc<dyn PoolMaintenance>,
            Arc::new(NamedPool::new("manage-doors", manage_pool.clone())) as Arc<dyn PoolMaintenance>,
        ]);
        let mut controller = Self {
            cx,
            scheduler: Scheduler::new(),
            config_source,
            clock,
            steps_per_tick,
            discovery_pool,
            manage_pool,
            maintenance,
            last_pending: 0,
            backlog_ticks: 0,
        };
        controller.cx.now_ms = controller.clock.now_ms();
        controller.reload();
        controller
    }

    /// Host entry point, called once per invocation.
    ///
    /// Unknown commands are logged and otherwise ignored. Every command but
    /// `stop` is followed by one scheduler tick within the step budget.
    pub fn main(&mut self, argument: &str) -> UpdateDirective {
        self.cx.now_ms = self.clock.now_ms();
        match argument.parse::<Command>() {
            Ok(Command::Stop) => {
                tracing::info!(tag = %self.cx.tag, "controller stopping");
                return UpdateDirective::Stop;
            }
            Ok(command) => self.dispatch(command),
            Err(err) => {
                tracing::warn!(error = %err, "command rejected");
                self.cx.log.record(self.cx.now_ms, INVALID_ARGUMENT.to_string());
            }
        }
        let mut budget = StepBudget::new(self.steps_per_tick);
        let outcome = self.scheduler.tick(self.cx.now_ms, &mut self.cx, &mut budget);
        self.track_backlog(outcome);
        UpdateDirective::EveryTick
    }

    fn dispatch(&mut self, command: Command) {
        tracing::debug!(%command, "dispatching command");
        let now_ms = self.cx.now_ms;
        match command {
            Command::Run | Command::Stop => {}
            Command::Reload => {
                self.reload();
            }
            Command::Lockdown => {
                self.cx.lockdown.set(true, &mut self.cx.log, now_ms);
            }
            Command::Release => {
                self.cx.lockdown.set(false, &mut self.cx.log, now_ms);
            }
            Command::Stats => self.log_stats(),
        }
    }

    /// Re-read the controller-wide configuration, forget managed doors,
    /// queue a discovery pass, and replace every recurring registration.
    ///
    /// Operations already queued run to completion.
    pub fn reload(&mut self) -> ParseReport {
        let now_ms = self.cx.now_ms;
        self.scheduler.clear_recurring();

        let text = self.config_source.controller_text();
        let scopes = [self.cx.tag.as_str()];
        let report = ConfigPipeline::new(&scopes).run(
            &text,
            &mut [&mut self.cx.door_defaults, &mut self.cx.schedule],
            &mut self.cx.log,
            now_ms,
        );
        let schedule = self.cx.schedule.settings();

        self.cx.doors.clear();
        self.scheduler.schedule(self.discovery_pool.acquire());

        let manage_pool = self.manage_pool.clone();
        self.scheduler
            .register_recurring("manage-doors", schedule.manage_interval, move || manage_pool.acquire());
        let targets = Arc::clone(&self.maintenance);
        self.scheduler.register_recurring("maintenance", schedule.maintenance_interval, move || {
            MaintenanceOp::new(Arc::clone(&targets))
        });

        tracing::info!(
            tag = %self.cx.tag,
            accepted = report.accepted,
            errors = report.errors,
            unrecognized = report.unrecognized,
            "controller reloaded"
        );
        report
    }

    /// Count consecutive ticks that ended with the budget spent and more work
    /// queued than the tick before.
    fn track_backlog(&mut self, outcome: RunOutcome) {
        let pending = self.scheduler.pending_len();
        tracing::trace!(?outcome, pending, "tick finished");
        if outcome == RunOutcome::Yielded && pending > self.last_pending {
            self.backlog_ticks += 1;
            tracing::warn!(
                pending,
                ticks = self.backlog_ticks,
                steps_per_tick = self.steps_per_tick,
                "pending work is growing faster than the step budget drains it"
            );
        } else if outcome == RunOutcome::Drained {
            self.backlog_ticks = 0;
        }
        self.last_pending = pending;
    }

    fn log_stats(&mut self) {
        let now_ms = self.cx.now_ms;
        let doors = self.cx.doors.len();
        self.cx.log.record(now_ms, format!("Managing {doors} doors"));
        let lockdown = if self.cx.lockdown.is_engaged() { "on" } else { "off" };
        self.cx.log.record(
            now_ms,
            format!(
                "Pending {}, recurring {}, lockdown {lockdown}",
                self.scheduler.pending_len(),
                self.scheduler.recurring_len()
            ),
        );
        if self.backlog_ticks > 0 {
            self.cx
                .log
                .record(now_ms, format!("Backlog growing for {} ticks", self.backlog_ticks));
        }
        for target in self.maintenance.iter() {
            let stats = target.stats();
            tracing::debug!(pool = target.label(), ?stats, "pool utilization");
            if stats.leased > 1 {
                self.cx.log.record(
                    now_ms,
                    format!("Pool {} has {} leases outstanding", target.label(), stats.leased),
                );
            }
        }
    }

    /// Controller log.
    #[must_use]
    pub const fn log(&self) -> &LogBuffer {
        self.cx.log()
    }

    /// Managed doors.
    #[must_use]
    pub const fn doors(&self) -> &DoorPolicyEngine {
        self.cx.doors()
    }

    /// Lockdown state.
    #[must_use]
    pub const fn lockdown(&self) -> LockdownFlag {
        self.cx.lockdown()
    }

    /// The scheduler and its queues.
    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler<ControllerContext> {
        &self.scheduler
    }

    /// Shared context.
    #[must_use]
    pub const fn context(&self) -> &ControllerContext {
        &self.cx
    }

    /// Consecutive ticks in which queued work grew while the budget ran out.
    /// Reset by a tick that drains the queue.
    #[must_use]
    pub const fn backlog_ticks(&self) -> u32 {
        self.backlog_ticks
    }

    /// Pool maintenance targets, for utilization reporting.
    #[must_use]
    pub fn pools(&self) -> &[Arc<dyn PoolMaintenance>] {
        &self.maintenance
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("cx", &self.cx)
            .field("scheduler", &self.scheduler)
            .field("steps_per_tick", &self.steps_per_tick)
            .finish_non_exhaustive()
    }
}
