//! Door policy engine and the recurring operation that drives it.
//!
//! Each step handles exactly one managed door:
//!
//! - Under lockdown, an opening or open door is told to close and kept
//!   enabled so the close can proceed; a closing door stays enabled until it
//!   finishes; a closed door is disabled so nobody can reopen it by hand.
//! - Otherwise the door is enabled. A transition out of `Closed` arms the
//!   auto-close deadline, and an opening or open door past its deadline is
//!   told to close.
//!
//! The observed status is recorded after every step so the next step can
//! detect fresh open events.

use crate::core::{LogSink, Operation, Poolable, Spawner, StepStatus};
use crate::infra::{same_device, DeviceHandle, DoorStatus};
use crate::policy::DoorSettings;

/// A door under management.
#[derive(Debug, Clone)]
pub struct ManagedDoor {
    device: DeviceHandle,
    settings: DoorSettings,
    last_status: DoorStatus,
    close_deadline_ms: u128,
}

impl ManagedDoor {
    /// Device name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.device.name()
    }

    /// Underlying device.
    #[must_use]
    pub const fn device(&self) -> &DeviceHandle {
        &self.device
    }

    /// Effective settings.
    #[must_use]
    pub const fn settings(&self) -> DoorSettings {
        self.settings
    }

    /// Status seen by the previous step.
    #[must_use]
    pub const fn last_status(&self) -> DoorStatus {
        self.last_status
    }

    /// Host time after which an open door is closed.
    #[must_use]
    pub const fn close_deadline_ms(&self) -> u128 {
        self.close_deadline_ms
    }
}

/// Owns the managed doors and applies the open/close/lockdown policy.
#[derive(Debug, Default)]
pub struct DoorPolicyEngine {
    doors: Vec<ManagedDoor>,
}

impl DoorPolicyEngine {
    /// Engine with no doors.
    #[must_use]
    pub const fn new() -> Self {
        Self { doors: Vec::new() }
    }

    /// Start managing `device`.
    ///
    /// The current status becomes the last observed status and the close
    /// deadline is armed from `now_ms`, so a door found open is closed once
    /// its interval elapses. Returns false for non-doors and for devices
    /// already managed.
    pub fn register(&mut self, device: DeviceHandle, settings: DoorSettings, now_ms: u128) -> bool {
        let Some(status) = device.door().map(|door| door.status()) else {
            return false;
        };
        if self.doors.iter().any(|d| same_device(&d.device, &device)) {
            return false;
        }
        tracing::debug!(door = device.name(), %status, "door registered");
        self.doors.push(ManagedDoor {
            device,
            settings,
            last_status: status,
            close_deadline_ms: now_ms + settings.auto_close.as_millis(),
        });
        true
    }

    /// Forget every managed door.
    pub fn clear(&mut self) {
        self.doors.clear();
    }

    /// Number of managed doors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.doors.len()
    }

    /// True when no door is managed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }

    /// Managed doors in registration order.
    #[must_use]
    pub fn doors(&self) -> &[ManagedDoor] {
        &self.doors
    }

    /// Find a managed door by device name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ManagedDoor> {
        self.doors.iter().find(|d| d.name() == name)
    }

    /// Apply the policy to the door at `index`. Returns false when `index`
    /// is out of range.
    pub fn step_door(
        &mut self,
        index: usize,
        now_ms: u128,
        lockdown: bool,
        log: &mut dyn LogSink,
    ) -> bool {
        let Some(managed) = self.doors.get_mut(index) else {
            return false;
        };
        let Some(door) = managed.device.door() else {
            return true;
        };
        let status = door.status();

        if lockdown {
            match status {
                DoorStatus::Opening | DoorStatus::Open => {
                    door.close();
                    door.set_enabled(true);
                    log.record(now_ms, format!("Closing {}", managed.device.name()));
                }
                DoorStatus::Closing => door.set_enabled(true),
                DoorStatus::Closed => door.set_enabled(false),
            }
        } else {
            door.set_enabled(true);
            if managed.last_status == DoorStatus::Closed && status != DoorStatus::Closed {
                managed.close_deadline_ms = now_ms + managed.settings.auto_close.as_millis();
            }
            if now_ms > managed.close_deadline_ms && status.is_opening_or_open() {
                door.close();
                log.record(now_ms, format!("Closing {}", managed.device.name()));
            }
        }

        managed.last_status = status;
        true
    }
}

/// What a policy step needs from its context.
pub struct PolicyEnv<'a> {
    /// The engine to step.
    pub doors: &'a mut DoorPolicyEngine,
    /// Controller log.
    pub log: &'a mut dyn LogSink,
    /// Host time for this tick.
    pub now_ms: u128,
    /// Lockdown state for this step.
    pub lockdown: bool,
}

/// Contexts able to drive [`ManageDoorsOp`].
pub trait PolicyContext {
    /// Borrow the policy collaborators.
    fn policy_env(&mut self) -> PolicyEnv<'_>;
}

/// One pass over every managed door, one door per step.
#[derive(Debug, Default)]
pub struct ManageDoorsOp {
    cursor: usize,
    done: bool,
}

impl ManageDoorsOp {
    /// Index of the next door to step.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Poolable for ManageDoorsOp {
    fn reset(&mut self) {
        self.cursor = 0;
        self.done = false;
    }
}

impl<C: PolicyContext> Operation<C> for ManageDoorsOp {
    fn step(&mut self, cx: &mut C, _spawn: &mut Spawner<C>) -> StepStatus {
        if self.done {
            return StepStatus::Complete;
        }
        let PolicyEnv {
            doors,
            log,
            now_ms,
            lockdown,
        } = cx.policy_env();
        if self.cursor < doors.len() {
            doors.step_door(self.cursor, now_ms, lockdown, log);
            self.cursor += 1;
        }
        if self.cursor < doors.len() {
            return StepStatus::Pending;
        }
        self.cursor = 0;
        self.done = true;
        StepStatus::Complete
    }

    fn name(&self) -> &'static str {
        "manage-doors"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::core::LogBuffer;
    use crate::infra::{DoorControl, SimDevice, SimDoor};

    fn settings(ms: u64) -> DoorSettings {
        DoorSettings {
            auto_close: Duration::from_millis(ms),
        }
    }

    struct Env {
        doors: DoorPolicyEngine,
        log: LogBuffer,
        now_ms: u128,
        lockdown: bool,
    }

    impl PolicyContext for Env {
        fn policy_env(&mut self) -> PolicyEnv<'_> {
            PolicyEnv {
                doors: &mut self.doors,
                log: &mut self.log,
                now_ms: self.now_ms,
                lockdown: self.lockdown,
            }
        }
    }

    #[test]
    fn register_rejects_non_doors_and_duplicates() {
        let mut engine = DoorPolicyEngine::new();
        let door: DeviceHandle = Arc::new(SimDoor::new("A"));
        assert!(engine.register(Arc::clone(&door), settings(10), 0));
        assert!(!engine.register(Arc::clone(&door), settings(10), 0));
        assert!(!engine.register(Arc::new(SimDevice::new("Light")), settings(10), 0));
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn door_found_open_closes_after_interval() {
        let door = Arc::new(SimDoor::new("A"));
        door.set_status(DoorStatus::Open);
        let mut engine = DoorPolicyEngine::new();
        engine.register(door.clone(), settings(1_000), 0);
        let mut log = LogBuffer::new(8);

        engine.step_door(0, 1_000, false, &mut log);
        assert_eq!(door.status(), DoorStatus::Open);
        engine.step_door(0, 1_001, false, &mut log);
        assert_eq!(door.status(), DoorStatus::Closing);
        assert_eq!(log.count("Closing A"), 1);
    }

    #[test]
    fn manage_op_visits_each_door_once_per_pass() {
        let a = Arc::new(SimDoor::new("A"));
        let b = Arc::new(SimDoor::new("B"));
        let mut env = Env {
            doors: DoorPolicyEngine::new(),
            log: LogBuffer::new(8),
            now_ms: 0,
            lockdown: true,
        };
        env.doors.register(a.clone(), settings(10), 0);
        env.doors.register(b.clone(), settings(10), 0);

        let mut op = ManageDoorsOp::default();
        let mut spawner = Spawner::new();
        assert_eq!(op.step(&mut env, &mut spawner), StepStatus::Pending);
        assert!(!a.is_enabled());
        assert!(b.is_enabled());
        assert_eq!(op.step(&mut env, &mut spawner), StepStatus::Complete);
        assert!(!b.is_enabled());
        assert_eq!(op.cursor(), 0);

        a.set_enabled(true);
        assert_eq!(op.step(&mut env, &mut spawner), StepStatus::Complete);
        assert!(a.is_enabled());
    }

    #[test]
    fn manage_op_with_no_doors_completes_immediately() {
        let mut env = Env {
            doors: DoorPolicyEngine::new(),
            log: LogBuffer::new(8),
            now_ms: 0,
            lockdown: false,
        };
        let mut op = ManageDoorsOp::default();
        assert_eq!(op.step(&mut env, &mut Spawner::new()), StepStatus::Complete);
    }
}
