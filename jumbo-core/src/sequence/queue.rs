//! Bounded step queue
//!
//! First-in first-out buffer between the producer and the playback
//! controller. The producer only appends; the controller only peeks and
//! pops. A full queue rejects new steps instead of overwriting or blocking.

use heapless::Deque;

use super::step::SequenceStep;

/// Maximum steps held at once
pub const QUEUE_CAPACITY: usize = 20;

/// Bounded FIFO of pending steps
#[derive(Debug, Clone, Default)]
pub struct SequenceQueue {
    steps: Deque<SequenceStep, QUEUE_CAPACITY>,
}

impl SequenceQueue {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            steps: Deque::new(),
        }
    }

    /// Append a step at the tail
    ///
    /// Returns false, leaving the queue unchanged, when full. Callers should
    /// treat that as backpressure and retry later.
    pub fn enqueue(&mut self, step: SequenceStep) -> bool {
        self.steps.push_back(step).is_ok()
    }

    /// Head of the queue without removing it
    pub fn peek(&self) -> Option<&SequenceStep> {
        self.steps.front()
    }

    /// Remove and return the head, if any
    pub fn pop(&mut self) -> Option<SequenceStep> {
        self.steps.pop_front()
    }

    /// Number of queued steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.steps.is_full()
    }

    /// Free slots left
    pub fn remaining(&self) -> usize {
        QUEUE_CAPACITY - self.steps.len()
    }

    /// Drop every queued step
    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Drop everything behind the head
    ///
    /// The head may be the step on screen; the controller still pops it when
    /// it finishes, so it has to stay put.
    pub fn clear_pending(&mut self) {
        while self.steps.len() > 1 {
            self.steps.pop_back();
        }
    }

    /// Iterate from head to tail
    pub fn iter(&self) -> impl Iterator<Item = &SequenceStep> {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;
    use heapless::String;
    use proptest::prelude::*;

    fn step(n: usize) -> SequenceStep {
        let mut caption: String<8> = String::new();
        let _ = write!(caption, "{}", n);
        SequenceStep::new("calm", &caption, 0.0, 1.0)
    }

    #[test]
    fn test_empty_queue() {
        let mut q = SequenceQueue::new();
        assert!(q.is_empty());
        assert!(q.peek().is_none());
        assert!(q.pop().is_none());
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn test_capacity_limit() {
        let mut q = SequenceQueue::new();
        for i in 0..QUEUE_CAPACITY {
            assert!(q.enqueue(step(i)));
        }
        assert!(q.is_full());
        assert!(!q.enqueue(step(99)));
        assert_eq!(q.len(), QUEUE_CAPACITY);
        assert_eq!(q.remaining(), 0);

        // The rejected step did not displace anything
        assert_eq!(q.peek().map(|s| s.caption.as_str()), Some("0"));
    }

    #[test]
    fn test_peek_does_not_remove() {
        let mut q = SequenceQueue::new();
        q.enqueue(step(1));
        q.enqueue(step(2));
        assert_eq!(q.peek().map(|s| s.caption.as_str()), Some("1"));
        assert_eq!(q.peek().map(|s| s.caption.as_str()), Some("1"));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut q = SequenceQueue::new();
        q.enqueue(step(1));
        q.enqueue(step(2));
        q.clear();
        assert!(q.is_empty());
        assert!(q.enqueue(step(3)));
    }

    #[test]
    fn test_clear_pending_keeps_head() {
        let mut q = SequenceQueue::new();
        q.clear_pending();
        assert!(q.is_empty());

        q.enqueue(step(1));
        q.enqueue(step(2));
        q.enqueue(step(3));
        q.clear_pending();
        assert_eq!(q.len(), 1);
        assert_eq!(q.peek().map(|s| s.caption.as_str()), Some("1"));
    }

    #[test]
    fn test_reuse_after_drain() {
        let mut q = SequenceQueue::new();
        for round in 0..3 {
            for i in 0..QUEUE_CAPACITY {
                assert!(q.enqueue(step(round * 100 + i)));
            }
            while q.pop().is_some() {}
        }
        assert!(q.is_empty());
    }

    proptest! {
        #[test]
        fn prop_fifo_order(count in 0usize..40) {
            let mut q = SequenceQueue::new();
            let mut accepted = 0;
            for i in 0..count {
                if q.enqueue(step(i)) {
                    accepted += 1;
                }
            }
            prop_assert_eq!(accepted, count.min(QUEUE_CAPACITY));
            prop_assert!(q.len() <= QUEUE_CAPACITY);

            for i in 0..accepted {
                let popped = q.pop();
                let mut expected: String<8> = String::new();
                let _ = write!(expected, "{}", i);
                prop_assert_eq!(
                    popped.as_ref().map(|s| s.caption.as_str()),
                    Some(expected.as_str())
                );
            }
            prop_assert!(q.is_empty());
        }
    }
}
