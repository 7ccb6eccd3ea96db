/// Type-state markers for the builder pattern
///
/// These types track at compile time whether the event sink has been set,
/// so a manager cannot be built without a consumer for its events.
use std::marker::PhantomData;

/// Marker trait for sink state
pub trait SinkState {}

/// Sink has not been set
pub struct NoSink;
impl SinkState for NoSink {}

/// Sink has been set
pub struct HasSink;
impl SinkState for HasSink {}

/// Phantom marker to prevent direct construction
#[derive(Debug, Clone, Copy)]
pub struct TypeState<S> {
    _sink: PhantomData<S>,
}

impl<S> TypeState<S> {
    pub(crate) fn new() -> Self {
        Self { _sink: PhantomData }
    }
}

impl<S> Default for TypeState<S> {
    fn default() -> Self {
        Self::new()
    }
}
