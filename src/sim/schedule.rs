//! Distance-triggered events, the giant-missile barrage, and wall-clock
//! deferred tasks.

/// Distance (m) at which the first wave spawns
pub const WAVE1_DISTANCE: f32 = 600.0;
pub const WAVE2_DISTANCE: f32 = 1700.0;
pub const OBSTACLE_DISTANCE: f32 = 3700.0;
/// Barrage arms once the obstacle exists and this distance is reached
pub const BARRAGE_DISTANCE: f32 = 3500.0;
/// Enemies per wave
pub const WAVE_SIZE: usize = 10;
/// Reference frames between consecutive enemies of a wave
pub const WAVE_SPACING_FRAMES: f32 = 40.0;
/// Giant missiles per barrage
pub const BARRAGE_COUNT: u32 = 10;
/// Barrage timer gain per simulated second
const BARRAGE_RATE: f32 = 50.0;
const BARRAGE_THRESHOLD: f32 = 50.0;

/// One-shot distance event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveTrigger {
    Wave1,
    Wave2,
    SpawnObstacle,
}

/// One-shot flags compared against cumulative distance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaveSchedule {
    pub wave1_spawned: bool,
    pub wave2_spawned: bool,
    pub obstacle_spawned: bool,
}

impl WaveSchedule {
    /// Events whose threshold has been reached and that have not fired yet,
    /// in threshold order. Each flag flips exactly once.
    pub fn check(&mut self, distance: f32) -> Vec<WaveTrigger> {
        let mut out = Vec::new();
        if distance >= WAVE1_DISTANCE && !self.wave1_spawned {
            self.wave1_spawned = true;
            out.push(WaveTrigger::Wave1);
        }
        if distance >= WAVE2_DISTANCE && !self.wave2_spawned {
            self.wave2_spawned = true;
            out.push(WaveTrigger::Wave2);
        }
        if distance >= OBSTACLE_DISTANCE && !self.obstacle_spawned {
            self.obstacle_spawned = true;
            out.push(WaveTrigger::SpawnObstacle);
        }
        out
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Bounded burst of giant missiles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Barrage {
    pub active: bool,
    pub count: u32,
    pub timer: f32,
    pub complete: bool,
}

impl Barrage {
    /// Arm if allowed, then advance. Returns true when a missile should spawn.
    pub fn update(&mut self, armed: bool, dt: f32) -> bool {
        if armed && !self.active && !self.complete {
            self.active = true;
            self.timer = 0.0;
            self.count = 0;
            log::info!("Giant missile barrage started");
        }
        if !self.active {
            return false;
        }

        self.timer += dt * BARRAGE_RATE;
        if self.timer <= BARRAGE_THRESHOLD {
            return false;
        }
        self.timer = 0.0;
        self.count += 1;
        if self.count >= BARRAGE_COUNT {
            self.active = false;
            self.complete = true;
            log::info!("Giant missile barrage complete");
        }
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Work scheduled against the wall clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Second explosion sound after player death
    ExplosionSound,
    /// Show the game-over UI for the run identified by `generation`
    RevealGameOver { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Deferred {
    due: f64,
    task: DeferredTask,
}

/// Delay queue polled once per frame. Tasks are never cancelled; consumers
/// guard against staleness themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeferredQueue {
    items: Vec<Deferred>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: f64, delay_secs: f64, task: DeferredTask) {
        self.items.push(Deferred {
            due: now + delay_secs.max(0.0),
            task,
        });
    }

    /// Remove and return every task due at `now`, earliest first
    pub fn drain_due(&mut self, now: f64) -> Vec<DeferredTask> {
        let mut due: Vec<Deferred> = Vec::new();
        self.items.retain(|d| {
            if d.due <= now {
                due.push(*d);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|d| d.task).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triggers_fire_once_in_order() {
        let mut sched = WaveSchedule::default();
        let mut fired = Vec::new();
        let mut distance = 0.0;
        while distance <= OBSTACLE_DISTANCE + 10.0 {
            for t in sched.check(distance) {
                fired.push((t, distance));
            }
            distance += 2.4;
        }
        let kinds: Vec<WaveTrigger> = fired.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            kinds,
            vec![WaveTrigger::Wave1, WaveTrigger::Wave2, WaveTrigger::SpawnObstacle]
        );
        assert!(fired.windows(2).all(|w| w[0].1 <= w[1].1));
        assert!(fired[0].1 >= WAVE1_DISTANCE);
    }

    #[test]
    fn test_big_jump_fires_everything() {
        let mut sched = WaveSchedule::default();
        assert_eq!(sched.check(5000.0).len(), 3);
        assert!(sched.check(6000.0).is_empty());
    }

    #[test]
    fn test_barrage_spawns_ten_then_completes() {
        let mut b = Barrage::default();
        assert!(!b.update(false, 0.1));
        let mut spawned = 0;
        for _ in 0..1000 {
            if b.update(true, 1.0 / 40.0) {
                spawned += 1;
            }
        }
        assert_eq!(spawned, BARRAGE_COUNT);
        assert!(b.complete);
        assert!(!b.active);
    }

    #[test]
    fn test_deferred_queue_orders_by_due() {
        let mut q = DeferredQueue::new();
        q.schedule(10.0, 1.0, DeferredTask::RevealGameOver { generation: 3 });
        q.schedule(10.0, 0.3, DeferredTask::ExplosionSound);
        assert!(q.drain_due(10.1).is_empty());
        assert_eq!(q.drain_due(12.0), vec![
            DeferredTask::ExplosionSound,
            DeferredTask::RevealGameOver { generation: 3 },
        ]);
        assert!(q.is_empty());
    }
}
