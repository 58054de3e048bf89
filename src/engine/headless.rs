//! In-memory engine.
//!
//! Records every call the bridge makes instead of driving a browser. A
//! [`HeadlessProbe`] shares the record, so it can be inspected (and script
//! messages posted) from any thread while the webview owns the engine.

use super::Engine;
use crate::config::CreateOptions;
use crate::error::Result;
use crate::webview::Handle;
use parking_lot::Mutex;
use std::sync::Arc;

/// One call made on the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    /// `eval(js)`
    Eval(String),
    /// `init(js)`
    Init(String),
    /// `navigate(url)`
    Navigate(String),
    /// `set_html(html)`
    SetHtml(String),
    /// `show()`
    Show,
}

#[derive(Default)]
struct Record {
    calls: Vec<EngineCall>,
    handle: Option<Handle>,
    options: Option<CreateOptions>,
}

/// Shared view of the record
type SharedRecord = Arc<Mutex<Record>>;

/// Engine that records calls instead of rendering
pub struct HeadlessEngine {
    record: SharedRecord,
}

/// Inspection side of a [`HeadlessEngine`]
#[derive(Clone)]
pub struct HeadlessProbe {
    record: SharedRecord,
}

impl HeadlessEngine {
    /// Create an engine and the probe observing it
    pub fn new() -> (Self, HeadlessProbe) {
        let record = SharedRecord::default();
        (
            Self {
                record: Arc::clone(&record),
            },
            HeadlessProbe { record },
        )
    }

    fn push(&self, call: EngineCall) -> Result<()> {
        self.record.lock().calls.push(call);
        Ok(())
    }
}

impl Engine for HeadlessEngine {
    fn attach(&mut self, handle: Handle, options: &CreateOptions) -> Result<()> {
        let mut record = self.record.lock();
        record.handle = Some(handle);
        record.options = Some(options.clone());
        Ok(())
    }

    fn eval(&mut self, js: &str) -> Result<()> {
        self.push(EngineCall::Eval(js.to_owned()))
    }

    fn init(&mut self, js: &str) -> Result<()> {
        self.push(EngineCall::Init(js.to_owned()))
    }

    fn navigate(&mut self, url: &str) -> Result<()> {
        self.push(EngineCall::Navigate(url.to_owned()))
    }

    fn set_html(&mut self, html: &str) -> Result<()> {
        self.push(EngineCall::SetHtml(html.to_owned()))
    }

    fn show(&mut self) -> Result<()> {
        self.push(EngineCall::Show)
    }
}

impl HeadlessProbe {
    /// Every call so far, in order
    pub fn calls(&self) -> Vec<EngineCall> {
        self.record.lock().calls.clone()
    }

    /// Scripts passed to `eval`, in order
    pub fn evaluated(&self) -> Vec<String> {
        self.record
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::Eval(js) => Some(js.clone()),
                _ => None,
            })
            .collect()
    }

    /// Scripts passed to `init`, in order
    pub fn init_scripts(&self) -> Vec<String> {
        self.record
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::Init(js) => Some(js.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded calls
    pub fn clear(&self) {
        self.record.lock().calls.clear();
    }

    /// Options the engine was attached with
    pub fn options(&self) -> Option<CreateOptions> {
        self.record.lock().options.clone()
    }

    /// Post a script message to the bridge, as `window.external.invoke`
    /// would. Returns `false` if the engine was never attached.
    pub fn post_message(&self, message: &str) -> bool {
        let handle = self.record.lock().handle.clone();
        match handle {
            Some(handle) => {
                handle.deliver(message);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls_in_order() {
        let (mut engine, probe) = HeadlessEngine::new();
        engine.init("a()").unwrap();
        engine.eval("b()").unwrap();
        engine.navigate("about:blank").unwrap();
        engine.set_html("<p>hi</p>").unwrap();
        engine.show().unwrap();

        assert_eq!(
            probe.calls(),
            vec![
                EngineCall::Init("a()".into()),
                EngineCall::Eval("b()".into()),
                EngineCall::Navigate("about:blank".into()),
                EngineCall::SetHtml("<p>hi</p>".into()),
                EngineCall::Show,
            ]
        );
        assert_eq!(probe.evaluated(), vec!["b()".to_string()]);
        assert_eq!(probe.init_scripts(), vec!["a()".to_string()]);

        probe.clear();
        assert!(probe.calls().is_empty());
    }

    #[test]
    fn test_post_message_requires_attach() {
        let (_engine, probe) = HeadlessEngine::new();
        assert!(!probe.post_message("{}"));
        assert!(probe.options().is_none());
    }
}
