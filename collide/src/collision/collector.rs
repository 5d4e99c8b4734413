/// Fixed-capacity result accumulator shared by every query.
///
/// The collector clears the caller's buffer, accepts items one at a time and
/// reports whether the upstream iteration should keep going. The bound is
/// checked on every write, so an engine that keeps reporting after being told
/// to stop cannot push past `max`. A caller that reserved `max` slots ahead of
/// time never sees an allocation.
pub struct BoundedCollector<'a, T> {
    out: &'a mut Vec<T>,
    max: usize,
}

impl<'a, T> BoundedCollector<'a, T> {
    pub fn new(out: &'a mut Vec<T>, max: usize) -> Self {
        out.clear();
        Self { out, max }
    }

    /// Store `item` if there is room. Returns `false` once the collector is full,
    /// which callers forward to the engine as "stop".
    #[inline]
    pub fn offer(&mut self, item: T) -> bool {
        if self.out.len() < self.max {
            self.out.push(item);
        }
        !self.is_full()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.out.len() >= self.max
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }
}
