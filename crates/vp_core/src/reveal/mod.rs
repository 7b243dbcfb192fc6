//! Reveal sequencer.
//!
//! Drives one squad draw through a shuffle phase, a staggered per-slot reveal
//! and completion. Time is injected: callers pass `now` (any monotonic
//! offset) to [`RevealSequencer::advance`] and sleep until
//! [`RevealSequencer::next_deadline`]. Every pending timer is owned by the
//! sequencer, so `reset()` or dropping the sequencer cancels all of them.
//!
//! ## Run lifecycle
//! ```text
//! Idle --start--> Shuffling --shuffle_duration--> Revealing --last commit--> Idle
//!                    |                               |
//!                    +----------- reset -------------+--> Idle
//! ```

mod slot;
pub mod timer;
pub mod timing;

pub use slot::{all_distinct, ResultSlot};
pub use timer::Timer;
pub use timing::{RevealTiming, TIMING_CONFIG_PATH_ENV};

use crate::error::{CoreError, SelectionError, SlotError};
use crate::filter::ExclusionSet;
use crate::models::{Agent, AgentId, Roster};
use crate::selection::{
    fill_slots, pick_one, reroll_candidates, validate_request, SelectionMode, SelectionRequest,
    MAX_PLAYERS, MIN_PLAYERS,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    Shuffling,
    Revealing,
}

/// Terminal squad of a finished run, handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedRun {
    pub mode: SelectionMode,
    pub agents: Vec<Agent>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RevealEvent {
    /// Animating slots were repainted.
    ShuffleFrame,
    RevealStarted,
    SlotCommitted { index: usize, agent: Option<Agent> },
    /// Emitted exactly once per started run, in the same `advance` as the
    /// last commit (no trailing delay).
    Completed(CompletedRun),
    RerollFrame { index: usize },
    SlotRerolled { index: usize, agent: Agent },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// A run or reroll was already in flight.
    Ignored,
}

#[derive(Debug)]
struct RunProgress {
    phase: RunState,
    targets: Vec<Option<Agent>>,
    cursor: usize,
    shuffle_tick: Timer,
    reveal_next: Option<Timer>,
    frame_pool: Vec<Agent>,
}

#[derive(Debug)]
struct RerollState {
    index: usize,
    target: Agent,
    frames_left: u32,
    flicker: Timer,
    candidates: Vec<Agent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Due {
    RevealNext,
    ShuffleTick,
    RerollFlicker,
}

pub struct RevealSequencer<R: Rng> {
    roster: Roster,
    timing: RevealTiming,
    mode: SelectionMode,
    player_count: usize,
    slots: Vec<ResultSlot>,
    finalized_count: usize,
    run: Option<RunProgress>,
    reroll: Option<RerollState>,
    rng: R,
}

impl<R: Rng> RevealSequencer<R> {
    pub fn new(roster: Roster, timing: RevealTiming, rng: R) -> Self {
        Self {
            roster,
            timing,
            mode: SelectionMode::default(),
            player_count: MAX_PLAYERS,
            slots: vec![ResultSlot::empty(); MAX_PLAYERS],
            finalized_count: 0,
            run: None,
            reroll: None,
            rng,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn timing(&self) -> &RevealTiming {
        &self.timing
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn slots(&self) -> &[ResultSlot] {
        &self.slots
    }

    pub fn finalized_count(&self) -> usize {
        self.finalized_count
    }

    pub fn state(&self) -> RunState {
        self.run.as_ref().map(|r| r.phase).unwrap_or(RunState::Idle)
    }

    /// A run or a single-slot reroll is in flight.
    pub fn is_busy(&self) -> bool {
        self.run.is_some() || self.reroll.is_some()
    }

    pub fn is_rerolling(&self) -> bool {
        self.reroll.is_some()
    }

    /// Changing the squad size cancels everything and clears the slots.
    pub fn set_player_count(&mut self, count: usize) -> Result<(), SelectionError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(SelectionError::InvalidCount(count));
        }
        self.player_count = count;
        self.reset();
        Ok(())
    }

    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        self.reset();
    }

    /// Cancel pending timers and clear every slot, locks included.
    /// Returns `true` if something was in flight.
    pub fn reset(&mut self) -> bool {
        let had_run = self.run.take().is_some();
        let had_reroll = self.reroll.take().is_some();
        if had_run || had_reroll {
            log::debug!("Reveal cancelled (run={}, reroll={})", had_run, had_reroll);
        }
        self.slots = vec![ResultSlot::empty(); self.player_count];
        self.finalized_count = 0;
        had_run || had_reroll
    }

    /// Begin a run. Locked slots keep their agents; the rest are drawn now
    /// and revealed over time.
    pub fn start(&mut self, now: Duration, excluded: &ExclusionSet) -> Result<StartOutcome, SelectionError> {
        if self.is_busy() {
            log::debug!("Start ignored: reveal already in flight");
            return Ok(StartOutcome::Ignored);
        }

        let locked: BTreeMap<usize, Agent> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.locked)
            .filter_map(|(i, s)| s.agent.clone().map(|a| (i, a)))
            .collect();
        let request =
            SelectionRequest { mode: self.mode, count: self.player_count, excluded, locked: &locked };
        validate_request(self.roster.agents(), &request)?;

        let targets = fill_slots(self.roster.agents(), &request, &mut self.rng);

        let locked_ids: HashSet<&AgentId> = locked.values().map(|a| &a.uuid).collect();
        let mut frame_pool: Vec<Agent> = excluded
            .pool(&self.roster)
            .into_iter()
            .filter(|a| !locked_ids.contains(&a.uuid))
            .cloned()
            .collect();
        if frame_pool.is_empty() {
            frame_pool =
                self.roster.agents().iter().filter(|a| !locked_ids.contains(&a.uuid)).cloned().collect();
        }

        for slot in &mut self.slots {
            slot.rerolling = false;
            if slot.locked {
                slot.finalized = true;
            } else {
                slot.agent = None;
                slot.finalized = false;
            }
        }
        self.finalized_count = locked.len();

        log::info!(
            "Run started: mode={}, players={}, locked={}, banned={}",
            self.mode,
            self.player_count,
            locked.len(),
            excluded.len()
        );

        self.run = Some(RunProgress {
            phase: RunState::Shuffling,
            targets,
            cursor: 0,
            shuffle_tick: Timer::every(now, self.timing.shuffle_tick()),
            reveal_next: Some(Timer::once(now, self.timing.shuffle_duration())),
            frame_pool,
        });
        Ok(StartOutcome::Started)
    }

    /// Earliest pending timer, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending().map(|(_, at)| at).min()
    }

    /// Fire every timer due at or before `now`, in deadline order.
    pub fn advance(&mut self, now: Duration) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        while let Some(due) = self.next_due(now) {
            match due {
                Due::RevealNext => self.fire_reveal(&mut events),
                Due::ShuffleTick => self.fire_shuffle_tick(&mut events),
                Due::RerollFlicker => self.fire_reroll(&mut events),
            }
        }
        events
    }

    /// Ties resolve in declaration order, so a commit lands before a
    /// same-instant shuffle frame.
    fn pending(&self) -> impl Iterator<Item = (Due, Duration)> + '_ {
        let run = self.run.as_ref();
        let reveal = run.and_then(|r| r.reveal_next).map(|t| (Due::RevealNext, t.due()));
        let shuffle = run.map(|r| (Due::ShuffleTick, r.shuffle_tick.due()));
        let reroll = self.reroll.as_ref().map(|r| (Due::RerollFlicker, r.flicker.due()));
        reveal.into_iter().chain(shuffle).chain(reroll)
    }

    fn next_due(&self, now: Duration) -> Option<Due> {
        self.pending().filter(|(_, at)| *at <= now).min_by_key(|(_, at)| *at).map(|(due, _)| due)
    }

    fn fire_shuffle_tick(&mut self, events: &mut Vec<RevealEvent>) {
        let Some(run) = self.run.as_mut() else { return };
        run.shuffle_tick.rearm();
        for slot in self.slots.iter_mut().filter(|s| s.is_animating()) {
            slot.agent = pick_one(&run.frame_pool, &mut self.rng).cloned();
        }
        events.push(RevealEvent::ShuffleFrame);
    }

    fn fire_reveal(&mut self, events: &mut Vec<RevealEvent>) {
        let Some(run) = self.run.as_mut() else { return };
        let Some(fired) = run.reveal_next.take() else { return };

        if run.phase == RunState::Shuffling {
            run.phase = RunState::Revealing;
            events.push(RevealEvent::RevealStarted);
        }

        // locked slots are already final
        while run.cursor < self.slots.len() && self.slots[run.cursor].locked {
            run.cursor += 1;
        }

        if run.cursor < self.slots.len() {
            let index = run.cursor;
            run.cursor += 1;
            let agent = run.targets.get(index).cloned().flatten();
            if agent.is_none() {
                log::warn!("No agent drawn for slot {}, leaving it empty", index);
            }

            let slot = &mut self.slots[index];
            slot.agent = agent.clone();
            slot.finalized = true;
            self.finalized_count += 1;
            events.push(RevealEvent::SlotCommitted { index, agent });
        }

        if self.finalized_count >= self.slots.len() {
            self.complete(events);
        } else if let Some(run) = self.run.as_mut() {
            run.reveal_next = Some(Timer::once(fired.due(), self.timing.reveal_interval()));
        }
    }

    fn complete(&mut self, events: &mut Vec<RevealEvent>) {
        self.run = None;
        let agents: Vec<Agent> = self.slots.iter().filter_map(|s| s.agent.clone()).collect();
        log::info!(
            "Run complete: mode={}, squad=[{}]",
            self.mode,
            agents.iter().map(|a| a.display_name.as_str()).collect::<Vec<_>>().join(", ")
        );
        events.push(RevealEvent::Completed(CompletedRun { mode: self.mode, agents }));
    }

    /// Reroll one unlocked slot. Returns `false` when refused (busy, locked,
    /// out of range, or nobody left to draw).
    pub fn reroll(&mut self, index: usize, now: Duration, excluded: &ExclusionSet) -> bool {
        if self.is_busy() {
            return false;
        }
        match self.slots.get(index) {
            Some(slot) if !slot.locked => {}
            _ => return false,
        }

        let occupied: HashSet<AgentId> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .filter_map(|(_, s)| s.agent_id().cloned())
            .collect();
        let candidates: Vec<Agent> =
            reroll_candidates(self.roster.agents(), excluded, &occupied).into_iter().cloned().collect();
        let Some(target) = pick_one(&candidates, &mut self.rng).cloned() else {
            log::debug!("Reroll of slot {} skipped: no candidates", index);
            return false;
        };

        let slot = &mut self.slots[index];
        if slot.finalized {
            slot.finalized = false;
            self.finalized_count -= 1;
        }
        slot.rerolling = true;

        self.reroll = Some(RerollState {
            index,
            target,
            frames_left: self.timing.reroll_flicker_ticks,
            flicker: Timer::every(now, self.timing.reroll_tick()),
            candidates,
        });
        true
    }

    fn fire_reroll(&mut self, events: &mut Vec<RevealEvent>) {
        let Some(reroll) = self.reroll.as_mut() else { return };

        if reroll.frames_left > 0 {
            reroll.frames_left -= 1;
            reroll.flicker.rearm();
            let index = reroll.index;
            self.slots[index].agent = pick_one(&reroll.candidates, &mut self.rng).cloned();
            events.push(RevealEvent::RerollFrame { index });
            return;
        }

        if let Some(done) = self.reroll.take() {
            let slot = &mut self.slots[done.index];
            slot.agent = Some(done.target.clone());
            slot.rerolling = false;
            slot.finalized = true;
            self.finalized_count += 1;
            log::info!("Slot {} rerolled to {}", done.index, done.target.display_name);
            events.push(RevealEvent::SlotRerolled { index: done.index, agent: done.target });
        }
    }

    /// Pin or unpin a slot. Only slots holding an agent can be locked.
    /// Returns the new lock state.
    pub fn toggle_lock(&mut self, index: usize) -> Result<bool, SlotError> {
        if self.is_busy() {
            return Err(SlotError::Busy);
        }
        let len = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or(SlotError::OutOfRange { index, len })?;
        if slot.is_empty() {
            return Err(SlotError::EmptySlot(index));
        }
        slot.locked = !slot.locked;
        Ok(slot.locked)
    }

    /// Put `agent` into slot `index`. If another unlocked slot already holds
    /// the agent, that slot is cleared so the squad stays distinct.
    pub fn substitute(&mut self, index: usize, agent: Agent) -> Result<(), SlotError> {
        if self.is_busy() {
            return Err(SlotError::Busy);
        }
        let len = self.slots.len();
        if index >= len {
            return Err(SlotError::OutOfRange { index, len });
        }
        if self.slots[index].locked {
            return Err(SlotError::SlotLocked(index));
        }

        if let Some(other) = self.slots.iter().position(|s| s.holds(&agent.uuid)) {
            if other == index {
                return Ok(());
            }
            if self.slots[other].locked {
                return Err(SlotError::AgentLocked { agent: agent.uuid.clone(), slot: other });
            }
            let moved = &mut self.slots[other];
            moved.agent = None;
            if moved.finalized {
                moved.finalized = false;
                self.finalized_count -= 1;
            }
        }

        log::info!("Slot {} set to {}", index, agent.display_name);
        let slot = &mut self.slots[index];
        if !slot.finalized {
            slot.finalized = true;
            self.finalized_count += 1;
        }
        slot.agent = Some(agent);
        Ok(())
    }

    /// [`substitute`](Self::substitute) by display name (case-insensitive).
    pub fn substitute_by_name(&mut self, index: usize, name: &str) -> Result<(), CoreError> {
        let agent = self
            .roster
            .find_by_name(name)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("agent '{}'", name)))?;
        self.substitute(index, agent)?;
        Ok(())
    }

    /// Non-empty slot agents in order.
    pub fn squad(&self) -> Vec<&Agent> {
        self.slots.iter().filter_map(|s| s.agent.as_ref()).collect()
    }
}

impl RevealSequencer<ChaCha8Rng> {
    /// Same seed, same sequence of draws.
    pub fn seeded(roster: Roster, timing: RevealTiming, seed: u64) -> Self {
        Self::new(roster, timing, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy(roster: Roster, timing: RevealTiming) -> Self {
        Self::new(roster, timing, ChaCha8Rng::from_entropy())
    }
}
