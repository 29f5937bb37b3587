/// Watches a time-history run step by step and may cut it short.
///
/// The integrator hands over one event for the initial state and one per
/// completed step, in step order, before deciding whether to go on. An
/// observer answers with `None` to let the run continue or `Some(action)`
/// to steer it. The action type belongs to the integrator; stopping early
/// is the usual one.
///
/// Any `FnMut(&E) -> Option<A>` closure is an observer, which is how runs
/// are usually recorded or stopped on a threshold. `()` watches nothing.
pub trait Observer<E, A> {
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
