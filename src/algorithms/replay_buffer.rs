use rand::prelude::IteratorRandom;
use rand::Rng;
use crate::error::{HeadError, Result};

#[derive(Clone, Debug)]
pub struct Transition<S, M> {
    pub state: S,
    pub action: usize,
    pub reward: f32,
    pub next_state: S,
    /// Legal actions in `next_state`
    pub next_mask: M,
    pub done: bool,
}

/// Fixed-capacity ring buffer, oldest transitions are overwritten first.
pub struct ReplayBuffer<S, M> {
    storage: Vec<Transition<S, M>>,
    capacity: usize,
    pos: usize,
}

impl<S: Clone, M: Clone> ReplayBuffer<S, M> {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(HeadError::invalid_parameter("replay_capacity", "must be at least 1"));
        }
        Ok(Self { storage: Vec::with_capacity(capacity), capacity, pos: 0 })
    }

    pub fn push(&mut self, transition: Transition<S, M>) {
        if self.storage.len() < self.capacity {
            self.storage.push(transition);
        } else {
            self.storage[self.pos] = transition;
        }
        self.pos = (self.pos + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Uniform sample without replacement.
    pub fn sample_batch(&self, batch_size: usize, rng: &mut impl Rng) -> Result<Vec<Transition<S, M>>> {
        if batch_size == 0 || batch_size > self.storage.len() {
            return Err(HeadError::EmptyBuffer {
                requested: batch_size,
                available: self.storage.len(),
            });
        }
        Ok(self.storage.iter().cloned().choose_multiple(rng, batch_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn transition(id: f32) -> Transition<[f32; 1], [f32; 2]> {
        Transition {
            state: [id],
            action: 0,
            reward: id,
            next_state: [id + 1.0],
            next_mask: [1.0, 1.0],
            done: false,
        }
    }

    #[test]
    fn wraps_around_at_capacity() {
        let mut buffer = ReplayBuffer::new(3).unwrap();
        for i in 0..5 {
            buffer.push(transition(i as f32));
        }
        assert_eq!(buffer.len(), 3);
        let mut rewards: Vec<f32> = buffer.storage.iter().map(|t| t.reward).collect();
        rewards.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(rewards, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn sample_is_distinct_transitions() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let mut buffer = ReplayBuffer::new(10).unwrap();
        for i in 0..10 {
            buffer.push(transition(i as f32));
        }
        let mut batch: Vec<f32> = buffer.sample_batch(4, &mut rng).unwrap().iter().map(|t| t.reward).collect();
        batch.sort_by(|a, b| a.total_cmp(b));
        batch.dedup();
        assert_eq!(batch.len(), 4);
    }

    #[test]
    fn under_filled_buffer_refuses_to_sample() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let mut buffer = ReplayBuffer::new(10).unwrap();
        buffer.push(transition(0.0));
        assert!(matches!(
            buffer.sample_batch(2, &mut rng),
            Err(HeadError::EmptyBuffer { requested: 2, available: 1 })
        ));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(ReplayBuffer::<[f32; 1], [f32; 2]>::new(0).is_err());
    }
}
