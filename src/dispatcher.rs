//! Thread-affine work queue.
//!
//! A [`Dispatcher`] can be cloned and used from any thread to post work for
//! the single thread that owns the [`EventQueue`]. Work runs in the order it
//! was posted by each sender. Terminating is itself a queued event, so work
//! posted before it still runs.

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// A unit of work executed on the owning thread
pub type Work<T> = Box<dyn FnOnce(&mut T) + Send + 'static>;

enum Event<T> {
    Work(Work<T>),
    Terminate,
}

/// Sending side of the queue
pub struct Dispatcher<T> {
    tx: UnboundedSender<Event<T>>,
}

impl<T> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<T> Dispatcher<T> {
    /// Post work for the owning thread.
    ///
    /// Returns `false` if the queue has stopped and the work was discarded.
    pub fn dispatch<F>(&self, work: F) -> bool
    where
        F: FnOnce(&mut T) + Send + 'static,
    {
        if self.tx.send(Event::Work(Box::new(work))).is_err() {
            debug!("Event queue stopped, discarding work");
            return false;
        }
        true
    }

    /// Ask the loop to stop once everything posted so far has run
    pub fn terminate(&self) -> bool {
        self.tx.send(Event::Terminate).is_ok()
    }

    /// Whether the receiving loop has stopped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving side of the queue, driven by the owning thread
pub struct EventQueue<T> {
    rx: UnboundedReceiver<Event<T>>,
    stopped: bool,
}

/// Create a connected dispatcher and queue
pub fn channel<T>() -> (Dispatcher<T>, EventQueue<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Dispatcher { tx }, EventQueue { rx, stopped: false })
}

impl<T> EventQueue<T> {
    /// Run queued work until a terminate event is reached.
    ///
    /// Blocks the calling thread while waiting. Must not be called from
    /// within an async runtime.
    pub fn run(&mut self, state: &mut T) {
        while !self.stopped {
            match self.rx.blocking_recv() {
                Some(event) => self.handle(event, state),
                None => self.stop(),
            }
        }
    }

    /// Run everything queued right now without waiting.
    ///
    /// Returns the number of work items executed.
    pub fn run_pending(&mut self, state: &mut T) -> usize {
        let mut executed = 0;
        while !self.stopped {
            match self.rx.try_recv() {
                Ok(event) => {
                    if matches!(event, Event::Work(_)) {
                        executed += 1;
                    }
                    self.handle(event, state);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.stop(),
            }
        }
        executed
    }

    /// Whether a terminate event has been processed
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn handle(&mut self, event: Event<T>, state: &mut T) {
        match event {
            Event::Work(work) => work(state),
            Event::Terminate => self.stop(),
        }
    }

    fn stop(&mut self) {
        if !self.stopped {
            debug!("Event queue stopped");
            self.stopped = true;
            self.rx.close();
        }
    }
}
