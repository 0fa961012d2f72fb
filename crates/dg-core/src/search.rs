//! Backtracking room placement
//!
//! Starting from the start room, each step takes an open door, places a
//! template presenting the opposite door on the cell beyond it, and moves on
//! with one room fewer to place. A branch that cannot reach the room budget
//! is undone (room destroyed, layout and frontier restored) and the next
//! candidate or open door is tried.
//!
//! The depth-first walk keeps its own stack of frames instead of recursing,
//! so large room budgets cannot overflow the call stack.

use std::borrow::Cow;

use crate::config::{CandidatePolicy, GenConfig};
use crate::door::Door;
use crate::error::GenError;
use crate::frontier::{Frontier, FrontierDelta};
use crate::grid::GridPos;
use crate::index::{CandidateOrder, DoorIndex};
use crate::instantiate::RoomInstantiator;
use crate::layout::{FinalLayout, Layout, PlacedRoom};
use crate::rng::GenRng;
use crate::template::Catalog;

/// Why a search ended without a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Every open door and candidate was tried at some depth
    Exhausted,
    /// `max_steps` candidates were instantiated without finishing
    StepBudget,
}

/// Outcome of a search that did not hit a configuration error
#[derive(Debug, Clone, PartialEq)]
pub enum Generation<H> {
    Complete(FinalLayout<H>),
    Failed { reason: Failure, seed: u64, steps: u64 },
}

impl<H> Generation<H> {
    pub fn is_complete(&self) -> bool {
        matches!(self, Generation::Complete(_))
    }

    pub fn layout(&self) -> Option<&FinalLayout<H>> {
        match self {
            Generation::Complete(layout) => Some(layout),
            Generation::Failed { .. } => None,
        }
    }

    pub fn into_layout(self) -> Option<FinalLayout<H>> {
        match self {
            Generation::Complete(layout) => Some(layout),
            Generation::Failed { .. } => None,
        }
    }

    pub fn seed(&self) -> u64 {
        match self {
            Generation::Complete(layout) => layout.seed,
            Generation::Failed { seed, .. } => *seed,
        }
    }
}

/// Reasons to stop walking the search tree early
enum Halt {
    Budget,
    Fatal(GenError),
}

impl From<GenError> for Halt {
    fn from(err: GenError) -> Self {
        Halt::Fatal(err)
    }
}

/// The open door a frame is currently working on
struct Slot {
    index: usize,
    door: Door,
    target: GridPos,
    order: CandidateOrder,
}

/// One depth level of the search
#[derive(Default)]
struct Frame {
    /// Next frontier index to open
    next: usize,
    slot: Option<Slot>,
    /// Placement made at this depth whose subtree is being explored
    trial: Option<FrontierDelta>,
}

/// A single randomized backtracking search
pub struct PlacementSearch<'a, I: RoomInstantiator> {
    catalog: &'a Catalog,
    index: Cow<'a, DoorIndex>,
    instantiator: I,
    rng: GenRng,
    policy: CandidatePolicy,
    max_steps: Option<u64>,
    origin: GridPos,
    total_rooms: u32,
    layout: Layout<I::Handle>,
    frontier: Frontier,
    remaining: u32,
    steps: u64,
}

impl<'a, I: RoomInstantiator> PlacementSearch<'a, I> {
    /// Prepare a search; probes the catalog here when configured to
    pub fn new(
        catalog: &'a Catalog,
        config: &GenConfig,
        mut instantiator: I,
        rng: GenRng,
    ) -> Result<Self, GenError> {
        config.validate()?;
        let index = DoorIndex::build(catalog, config.discovery, &mut instantiator);
        Self::with_index(catalog, config, Cow::Owned(index), instantiator, rng)
    }

    /// Prepare a search over an index built earlier, so repeated searches
    /// on one catalog probe it only once
    pub fn with_index(
        catalog: &'a Catalog,
        config: &GenConfig,
        index: Cow<'a, DoorIndex>,
        instantiator: I,
        rng: GenRng,
    ) -> Result<Self, GenError> {
        config.validate()?;
        Ok(Self {
            catalog,
            index,
            instantiator,
            rng,
            policy: config.candidates,
            max_steps: config.max_steps,
            origin: config.origin,
            total_rooms: config.total_rooms,
            layout: Layout::new(),
            frontier: Frontier::default(),
            remaining: 0,
            steps: 0,
        })
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Run to completion.
    ///
    /// Anything but `Ok(Generation::Complete)` leaves no room alive: every
    /// placement, the start room included, is destroyed before returning.
    pub fn run(mut self) -> Result<Generation<I::Handle>, GenError> {
        self.place_start()?;

        let mut stack = vec![Frame::default()];
        let reason = match self.search(&mut stack) {
            Ok(true) => return Ok(Generation::Complete(self.finish())),
            Ok(false) => Failure::Exhausted,
            Err(Halt::Budget) => Failure::StepBudget,
            Err(Halt::Fatal(err)) => {
                self.unwind(stack);
                return Err(err);
            }
        };

        self.unwind(stack);
        log::debug!(
            "search failed ({:?}) after {} steps, seed {}",
            reason,
            self.steps,
            self.seed()
        );
        Ok(Generation::Failed {
            reason,
            seed: self.seed(),
            steps: self.steps,
        })
    }

    fn place_start(&mut self) -> Result<(), GenError> {
        let template = self.catalog.start();
        let instance = self.instantiator.instantiate(template, self.origin);
        let room = PlacedRoom {
            handle: instance.handle,
            template: template.id,
            cell: self.origin,
            doors: instance.doors.clone(),
        };
        self.layout.insert(room)?;
        self.frontier = Frontier::new(instance.doors);
        self.remaining = self.total_rooms - 1;
        log::trace!("start room {} at {}", template.name, self.origin);
        Ok(())
    }

    /// Depth-first walk. `Ok(true)` once the room budget is spent,
    /// `Ok(false)` when the root frame runs out of options.
    fn search(&mut self, stack: &mut Vec<Frame>) -> Result<bool, Halt> {
        loop {
            if self.remaining == 0 {
                return Ok(true);
            }
            let Some(frame) = stack.last_mut() else {
                return Ok(false);
            };
            // Revisiting a frame with a trial means its subtree failed.
            if let Some(delta) = frame.trial.take() {
                self.rollback(delta);
            }
            match self.advance(frame)? {
                Some(delta) => {
                    frame.trial = Some(delta);
                    stack.push(Frame::default());
                }
                None => {
                    stack.pop();
                }
            }
        }
    }

    /// Commit the next viable placement for this frame, if any is left
    fn advance(&mut self, frame: &mut Frame) -> Result<Option<FrontierDelta>, Halt> {
        loop {
            let Some(slot) = frame.slot.as_mut() else {
                if frame.next >= self.frontier.len() {
                    return Ok(None);
                }
                let index = frame.next;
                frame.next += 1;
                frame.slot = self.open(index)?;
                continue;
            };
            let Some(candidate) = slot.order.draw(&mut self.rng) else {
                frame.slot = None;
                continue;
            };
            let (index, door, target) = (slot.index, slot.door, slot.target);
            if let Some(delta) = self.place(index, door, target, candidate)? {
                return Ok(Some(delta));
            }
        }
    }

    /// Check the open door at `index` and line up its candidates
    fn open(&mut self, index: usize) -> Result<Option<Slot>, GenError> {
        let Some(&door) = self.frontier.get(index) else {
            return Ok(None);
        };
        let owner = self
            .layout
            .owner_of(&door)
            .ok_or(GenError::OrphanDoor(door))?;
        let Some(target) = owner.cell.step(door.direction) else {
            log::debug!("{} leads off the grid, skipping", door);
            return Ok(None);
        };

        if self.layout.is_occupied(target) {
            log::debug!("placement at {} would overlap, skipping {}", target, door);
            return Ok(None);
        }

        let order = self.index.order(door.matching_direction(), self.policy);
        if order.remaining() == 0 {
            log::debug!("no template faces {}, skipping {}", door.matching_direction(), door);
            return Ok(None);
        }

        Ok(Some(Slot {
            index,
            door,
            target,
            order,
        }))
    }

    /// Instantiate catalog entry `candidate` at `target` to plug `door`
    fn place(
        &mut self,
        index: usize,
        door: Door,
        target: GridPos,
        candidate: usize,
    ) -> Result<Option<FrontierDelta>, Halt> {
        if self.max_steps.is_some_and(|max| self.steps >= max) {
            return Err(Halt::Budget);
        }
        if self.layout.is_occupied(target) {
            return Err(GenError::CellOccupied(target).into());
        }
        let Some(template) = self.catalog.get(candidate) else {
            return Ok(None);
        };
        let faces_back = self
            .index
            .door_specs(self.catalog, candidate)
            .iter()
            .filter_map(|spec| spec.place(target))
            .any(|d| d.matches(&door));
        if !faces_back {
            log::debug!("{} at {} cannot face {}, skipping", template.name, target, door);
            return Ok(None);
        }

        let instance = self.instantiator.instantiate(template, target);
        self.steps += 1;

        if !instance.doors.iter().any(|d| d.matches(&door)) {
            log::debug!("{} at {} has no door back to {}", template.name, target, door);
            self.instantiator.destroy(instance.handle);
            return Ok(None);
        }

        let delta = self.frontier.plug(index, &instance.doors);
        self.layout.insert(PlacedRoom {
            handle: instance.handle,
            template: template.id,
            cell: target,
            doors: instance.doors,
        })?;
        self.remaining -= 1;
        log::trace!("placed {} at {} ({} to go)", template.name, target, self.remaining);
        Ok(Some(delta))
    }

    /// Undo the most recent placement
    fn rollback(&mut self, delta: FrontierDelta) {
        self.frontier.revert(delta);
        if let Some(room) = self.layout.pop_last() {
            log::trace!("rolled back {} at {}", room.template, room.cell);
            self.instantiator.destroy(room.handle);
            self.remaining += 1;
        }
    }

    /// Undo every placement left on the stack, then the start room
    fn unwind(&mut self, mut stack: Vec<Frame>) {
        while let Some(frame) = stack.pop() {
            if let Some(delta) = frame.trial {
                self.rollback(delta);
            }
        }
        while let Some(room) = self.layout.pop_last() {
            self.instantiator.destroy(room.handle);
        }
        self.frontier = Frontier::default();
    }

    fn finish(&mut self) -> FinalLayout<I::Handle> {
        let rooms = std::mem::take(&mut self.layout).into_rooms();
        let open_doors = std::mem::take(&mut self.frontier).into_doors();
        FinalLayout {
            rooms,
            open_doors,
            seed: self.seed(),
            steps: self.steps,
        }
    }
}

/// Run a single search with the seed from `config` (or a random one)
pub fn generate<I: RoomInstantiator>(
    catalog: &Catalog,
    config: &GenConfig,
    instantiator: I,
) -> Result<Generation<I::Handle>, GenError> {
    let rng = match config.seed {
        Some(seed) => GenRng::new(seed),
        None => GenRng::from_entropy(),
    };
    PlacementSearch::new(catalog, config, instantiator, rng)?.run()
}
