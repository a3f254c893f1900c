//! Bounded batches of confirmed transitions and the consumer they are flushed to

use heapless::Vec;

use crate::debounce::Transition;
use crate::Scancode;

/// Receives batches of confirmed transitions from within a scan.
///
/// Batches are in scan order. Leaving a method at its default drops that
/// stream. Handlers run on the scanning stack and must not call back into the
/// matrix.
pub trait SwitchHandler {
    fn switches_closed(&mut self, _scancodes: &[Scancode]) {}

    fn switches_opened(&mut self, _scancodes: &[Scancode]) {}
}

/// No callbacks; state is only available through queries.
impl SwitchHandler for () {}

/// Adapts a pair of optional closures to [`SwitchHandler`].
pub struct Callbacks<C, O> {
    pub closed: Option<C>,
    pub opened: Option<O>,
}

impl<C, O> Callbacks<C, O>
where
    C: FnMut(&[Scancode]),
    O: FnMut(&[Scancode]),
{
    pub fn new(closed: Option<C>, opened: Option<O>) -> Self {
        Callbacks { closed, opened }
    }
}

impl<C, O> SwitchHandler for Callbacks<C, O>
where
    C: FnMut(&[Scancode]),
    O: FnMut(&[Scancode]),
{
    fn switches_closed(&mut self, scancodes: &[Scancode]) {
        if let Some(closed) = self.closed.as_mut() {
            closed(scancodes)
        }
    }

    fn switches_opened(&mut self, scancodes: &[Scancode]) {
        if let Some(opened) = self.opened.as_mut() {
            opened(scancodes)
        }
    }
}

/// Scancodes of one polarity waiting to be flushed.
///
/// `N` must be at least 1; an empty batch fails to build.
#[derive(Debug)]
pub struct EventBatch<const N: usize> {
    scancodes: Vec<Scancode, N>,
}

impl<const N: usize> EventBatch<N> {
    const NOT_EMPTY: () = assert!(N > 0, "event batches need room for at least one scancode");

    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NOT_EMPTY;
        EventBatch {
            scancodes: Vec::new(),
        }
    }

    pub fn as_slice(&self) -> &[Scancode] {
        &self.scancodes
    }

    pub fn len(&self) -> usize {
        self.scancodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scancodes.is_empty()
    }

    /// Append a scancode, first flushing into `sink` if the batch is full.
    ///
    /// Returns true if a flush happened.
    pub fn push(&mut self, scancode: Scancode, sink: impl FnOnce(&[Scancode])) -> bool {
        let flushed = self.scancodes.is_full();
        if flushed {
            self.flush(sink);
        }
        // Room is guaranteed here, N > 0 is checked in `new`.
        let _ = self.scancodes.push(scancode);
        flushed
    }

    /// Hand the pending scancodes to `sink` and empty the batch.
    pub fn flush(&mut self, sink: impl FnOnce(&[Scancode])) {
        if !self.scancodes.is_empty() {
            sink(&self.scancodes);
            self.scancodes.clear();
        }
    }
}

impl<const N: usize> Default for EventBatch<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// The closed and opened batches of one matrix.
#[derive(Debug, Default)]
pub struct EventBatches<const N: usize> {
    closed: EventBatch<N>,
    opened: EventBatch<N>,
}

impl<const N: usize> EventBatches<N> {
    pub const fn new() -> Self {
        EventBatches {
            closed: EventBatch::new(),
            opened: EventBatch::new(),
        }
    }

    pub fn closed(&self) -> &EventBatch<N> {
        &self.closed
    }

    pub fn opened(&self) -> &EventBatch<N> {
        &self.opened
    }

    /// Queue a transition, flushing its batch to `handler` early on overflow.
    pub fn record<H: SwitchHandler>(
        &mut self,
        transition: Transition,
        scancode: Scancode,
        handler: &mut H,
    ) {
        let flushed = match transition {
            Transition::Closed => self
                .closed
                .push(scancode, |codes| handler.switches_closed(codes)),
            Transition::Opened => self
                .opened
                .push(scancode, |codes| handler.switches_opened(codes)),
        };
        if flushed {
            debug!("event batch full, flushed early before {}", scancode);
        }
    }

    /// Flush both batches, closed first.
    pub fn flush<H: SwitchHandler>(&mut self, handler: &mut H) {
        self.closed.flush(|codes| handler.switches_closed(codes));
        self.opened.flush(|codes| handler.switches_opened(codes));
    }
}
