use std::collections::{HashSet, VecDeque};

use crate::{conf, Entity};

struct Frame {
    index: u64,
    entities: HashSet<Entity>,
}

// Tracks which frames the backend may still be reading from. A frame stays in flight
// until it is retired, either because the ring is full or because a fence was waited on.
#[derive(Default)]
pub struct SyncState {
    in_flight: VecDeque<Frame>,
    submitted: u64,
    retired: u64,
}

impl SyncState {
    pub fn submit(&mut self, entities: HashSet<Entity>) -> u64 {
        firestorm::profile_method!(submit);

        while self.in_flight.len() >= conf::MAX_FRAMES_IN_FLIGHT {
            self.retire_oldest();
        }

        self.submitted += 1;
        self.in_flight.push_back(Frame {
            index: self.submitted,
            entities,
        });
        self.submitted
    }

    pub const fn submitted(&self) -> u64 {
        self.submitted
    }

    pub const fn retired(&self) -> u64 {
        self.retired
    }

    pub fn retire_until(&mut self, index: u64) {
        while self
            .in_flight
            .front()
            .is_some_and(|frame| frame.index <= index)
        {
            self.retire_oldest();
        }
    }

    fn retire_oldest(&mut self) {
        if let Some(frame) = self.in_flight.pop_front() {
            tracing::trace!("Retired frame {}", frame.index);
            self.retired = frame.index;
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn in_flight_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.in_flight.iter().flat_map(|frame| frame.entities.iter().copied())
    }

    pub fn is_in_flight(&self, entity: Entity) -> bool {
        self.in_flight
            .iter()
            .any(|frame| frame.entities.contains(&entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_is_bounded() {
        let mut state = SyncState::default();
        for _ in 0..5 {
            state.submit(HashSet::new());
        }
        assert_eq!(state.submitted(), 5);
        assert_eq!(state.in_flight(), conf::MAX_FRAMES_IN_FLIGHT);
        assert_eq!(state.retired(), 5 - conf::MAX_FRAMES_IN_FLIGHT as u64);
    }

    #[test]
    fn retire_until_stops_at_index() {
        let mut state = SyncState::default();
        state.submit(HashSet::new());
        state.submit(HashSet::new());
        state.retire_until(1);
        assert_eq!(state.in_flight(), 1);
        assert_eq!(state.retired(), 1);
        state.retire_until(2);
        assert_eq!(state.in_flight(), 0);
    }
}
