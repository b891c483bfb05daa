//! Counter state shown on the main card
//!
//! A single signed integer that starts at zero. It is not persisted: every
//! launch starts from zero again.

/// Button events the counter card can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAction {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    count: i64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> i64 {
        self.count
    }

    /// Add one and return the new value. Saturates at `i64::MAX`.
    pub fn increment(&mut self) -> i64 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    /// Subtract one and return the new value. Saturates at `i64::MIN`.
    pub fn decrement(&mut self) -> i64 {
        self.count = self.count.saturating_sub(1);
        self.count
    }

    pub fn apply(&mut self, action: CounterAction) -> i64 {
        match action {
            CounterAction::Increase => self.increment(),
            CounterAction::Decrease => self.decrement(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(Counter::new().value(), 0);
    }

    #[test]
    fn increase_and_decrease_move_by_one() {
        let mut counter = Counter::new();
        assert_eq!(counter.apply(CounterAction::Increase), 1);
        assert_eq!(counter.apply(CounterAction::Increase), 2);
        assert_eq!(counter.apply(CounterAction::Decrease), 1);
        assert_eq!(counter.value(), 1);
    }

    #[test]
    fn goes_negative() {
        let mut counter = Counter::new();
        counter.decrement();
        counter.decrement();
        assert_eq!(counter.value(), -2);
        assert_eq!(counter.increment(), -1);
    }

    #[test]
    fn saturates_at_integer_bounds() {
        let mut high = Counter { count: i64::MAX };
        assert_eq!(high.increment(), i64::MAX);

        let mut low = Counter { count: i64::MIN };
        assert_eq!(low.decrement(), i64::MIN);
    }
}
