/// A type that collects the steps of an algorithm.
///
/// [`StepCollector`] is also implemented for the unit type `()`, for callers that only want the
/// result.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        self.push(step);
    }
}
