//! Binding registry and RPC bridge.
//!
//! A [`Webview`] owns the engine and the name → handler registry. It lives on
//! one thread; other threads reach it through a [`Handle`], which posts work
//! onto the owning thread's event queue.

use crate::config::CreateOptions;
use crate::dispatcher::{self, Dispatcher, EventQueue};
use crate::engine::Engine;
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::script;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, instrument, warn};

/// Handler for a bound name.
pub enum Binding {
    /// Receives the raw params array and returns the JSON result, which
    /// resolves the call immediately.
    Sync(Box<dyn FnMut(&mut Webview, &str) -> String>),

    /// Receives `(webview, id, params)` and must eventually settle the call
    /// with [`Webview::resolve`] or [`Handle::resolve`].
    Async(Box<dyn FnMut(&mut Webview, &str, &str)>),
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Sync(_) => f.write_str("Binding::Sync"),
            Binding::Async(_) => f.write_str("Binding::Async"),
        }
    }
}

/// A webview with an RPC bridge between script and native code
pub struct Webview {
    engine: Box<dyn Engine>,
    options: CreateOptions,
    bindings: HashMap<String, Rc<RefCell<Binding>>>,
    dispatcher: Dispatcher<Webview>,
    queue: Option<EventQueue<Webview>>,
}

/// Thread-safe handle for posting work to a [`Webview`]
#[derive(Clone, Debug)]
pub struct Handle {
    dispatcher: Dispatcher<Webview>,
}

impl Webview {
    /// Create a webview on top of `engine`.
    ///
    /// Fails with a version error if the requested minimum version cannot be
    /// satisfied; no engine state is touched in that case.
    pub fn new(options: CreateOptions, engine: impl Engine + 'static) -> Result<Self> {
        let options = options.apply_compatibility()?;
        let (dispatcher, queue) = dispatcher::channel();

        let mut engine: Box<dyn Engine> = Box::new(engine);
        engine.attach(
            Handle {
                dispatcher: dispatcher.clone(),
            },
            &options,
        )?;

        info!(
            minimum_required_version = %options.minimum_required_version,
            debug = options.debug,
            visible = options.visible,
            "Webview created"
        );

        Ok(Self {
            engine,
            options,
            bindings: HashMap::new(),
            dispatcher,
            queue: Some(queue),
        })
    }

    /// Options after compatibility adjustments
    pub fn options(&self) -> &CreateOptions {
        &self.options
    }

    /// Handle usable from any thread
    pub fn handle(&self) -> Handle {
        Handle {
            dispatcher: self.dispatcher.clone(),
        }
    }

    /// Whether `name` is currently bound
    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Bind an asynchronous handler under `name`.
    ///
    /// The handler is called with the call id and the raw params array, and
    /// settles the call itself, possibly later and from another thread.
    #[instrument(skip(self, handler))]
    pub fn bind<F>(&mut self, name: &str, handler: F) -> Result<()>
    where
        F: FnMut(&mut Webview, &str, &str) + 'static,
    {
        self.insert_binding(name, Binding::Async(Box::new(handler)))
    }

    /// Bind a synchronous handler under `name`.
    ///
    /// The returned string must be a JSON value; the call is resolved with it.
    #[instrument(skip(self, handler))]
    pub fn bind_sync<F>(&mut self, name: &str, handler: F) -> Result<()>
    where
        F: FnMut(&mut Webview, &str) -> String + 'static,
    {
        self.insert_binding(name, Binding::Sync(Box::new(handler)))
    }

    fn insert_binding(&mut self, name: &str, binding: Binding) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidArgument("binding name is empty".into()));
        }
        if self.bindings.contains_key(name) {
            return Err(Error::duplicate(name));
        }

        let kind = match binding {
            Binding::Sync(_) => "sync",
            Binding::Async(_) => "async",
        };
        let js = script::binding_stub(name);
        self.engine.eval(&js)?;
        if let Err(e) = self.engine.init(&js) {
            // Only the current page has the stub; take it back out.
            if let Err(undo) = self.engine.eval(&script::remove_binding(name)) {
                warn!(name, error = %undo, "Failed to remove stub");
            }
            return Err(e);
        }
        self.bindings
            .insert(name.to_owned(), Rc::new(RefCell::new(binding)));

        debug!(name, kind, "Bound");
        Ok(())
    }

    /// Remove the binding for `name`
    #[instrument(skip(self))]
    pub fn unbind(&mut self, name: &str) -> Result<()> {
        if !self.bindings.contains_key(name) {
            return Err(Error::not_found(name));
        }

        let js = script::remove_binding(name);
        self.engine.eval(&js)?;
        self.engine.init(&js)?;
        self.bindings.remove(name);

        debug!(name, "Unbound");
        Ok(())
    }

    /// Handle a raw message posted by script.
    ///
    /// Messages naming an unbound method are dropped.
    #[instrument(skip(self, raw))]
    pub fn on_message(&mut self, raw: &str) {
        let Some(envelope) = Envelope::parse(raw) else {
            debug!(len = raw.len(), "Dropping message without method");
            return;
        };

        let Some(binding) = self.bindings.get(&envelope.method).map(Rc::clone) else {
            debug!(method = %envelope.method, "Dropping call to unbound method");
            return;
        };

        let Ok(mut handler) = binding.try_borrow_mut() else {
            warn!(method = %envelope.method, "Handler re-entered, dropping call");
            return;
        };

        let result = match &mut *handler {
            Binding::Sync(f) => Some(f(self, &envelope.params)),
            Binding::Async(f) => {
                f(self, &envelope.id, &envelope.params);
                None
            }
        };
        drop(handler);

        if let Some(result) = result {
            self.resolve(&envelope.id, 0, &result);
        }
    }

    /// Settle the pending call `id` once queued work ahead of it has run.
    ///
    /// A zero `status` resolves the script promise with `result`, anything
    /// else rejects it. `result` must be a JSON value.
    pub fn resolve(&self, id: &str, status: i32, result: &str) {
        self.handle().resolve(id, status, result);
    }

    fn settle(&mut self, id: &str, status: i32, result: &str) {
        if let Err(e) = self.engine.eval(&script::settle(id, status, result)) {
            warn!(id, status, error = %e, "Failed to settle call");
        }
    }

    /// Evaluate script in the current page
    pub fn eval(&mut self, js: &str) -> Result<()> {
        self.engine.eval(js)
    }

    /// Run script on every page load, before `window.onload`
    pub fn init(&mut self, js: &str) -> Result<()> {
        self.engine.init(js)
    }

    /// Navigate to `url`. An empty url loads `about:blank`.
    pub fn navigate(&mut self, url: &str) -> Result<()> {
        let url = if url.is_empty() { "about:blank" } else { url };
        self.engine.navigate(url)
    }

    /// Replace the page content
    pub fn set_html(&mut self, html: &str) -> Result<()> {
        self.engine.set_html(html)
    }

    /// Show the window
    pub fn show(&mut self) -> Result<()> {
        self.engine.show()
    }

    /// Queue work for the owning thread
    pub fn dispatch<F>(&self, work: F) -> Result<()>
    where
        F: FnOnce(&mut Webview) + Send + 'static,
    {
        self.handle().dispatch(work)
    }

    /// Stop the event loop after already-queued work
    pub fn terminate(&self) {
        self.handle().terminate();
    }

    /// Run the event loop on this thread until terminated
    pub fn run(&mut self) -> Result<()> {
        let mut queue = self
            .queue
            .take()
            .ok_or_else(|| Error::InvalidState("event loop is already running".into()))?;

        info!("Running event loop");
        queue.run(self);
        self.queue = Some(queue);
        info!("Event loop stopped");
        Ok(())
    }

    /// Run everything queued so far without blocking.
    ///
    /// Returns the number of work items executed.
    pub fn run_pending(&mut self) -> Result<usize> {
        let mut queue = self
            .queue
            .take()
            .ok_or_else(|| Error::InvalidState("event loop is already running".into()))?;

        let executed = queue.run_pending(self);
        self.queue = Some(queue);
        Ok(executed)
    }
}

impl fmt::Debug for Webview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.bindings.keys().collect();
        names.sort();
        f.debug_struct("Webview")
            .field("options", &self.options)
            .field("bindings", &names)
            .finish()
    }
}

impl Handle {
    /// Queue work for the owning thread.
    ///
    /// Fails with `InvalidState` once the event loop has stopped.
    pub fn dispatch<F>(&self, work: F) -> Result<()>
    where
        F: FnOnce(&mut Webview) + Send + 'static,
    {
        if self.dispatcher.dispatch(work) {
            Ok(())
        } else {
            Err(Error::InvalidState("event loop has stopped".into()))
        }
    }

    /// Settle the pending call `id` on the owning thread. See
    /// [`Webview::resolve`]. A no-op once the loop has stopped.
    pub fn resolve(&self, id: &str, status: i32, result: &str) {
        let id = id.to_owned();
        let result = result.to_owned();
        self.dispatcher
            .dispatch(move |webview: &mut Webview| webview.settle(&id, status, &result));
    }

    /// Hand a raw script message to the bridge on the owning thread
    pub fn deliver(&self, message: &str) {
        let message = message.to_owned();
        self.dispatcher
            .dispatch(move |webview: &mut Webview| webview.on_message(&message));
    }

    /// Stop the event loop after already-queued work
    pub fn terminate(&self) {
        if !self.dispatcher.terminate() {
            debug!("Event loop already stopped");
        }
    }

    /// Whether the event loop has stopped
    pub fn is_closed(&self) -> bool {
        self.dispatcher.is_closed()
    }
}
