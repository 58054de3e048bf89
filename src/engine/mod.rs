//! Rendering engine capability.
//!
//! The bridge never talks to a browser engine directly. Backends (GTK/WebKit,
//! Cocoa/WKWebView, Win32/WebView2, or the in-memory [`HeadlessEngine`])
//! implement [`Engine`] and are chosen by whoever constructs the
//! [`Webview`](crate::Webview). All methods are called on the owning thread.

pub mod headless;

use crate::config::CreateOptions;
use crate::error::Result;
use crate::webview::Handle;

pub use headless::{EngineCall, HeadlessEngine, HeadlessProbe};

/// Capabilities the bridge needs from a rendering engine
pub trait Engine {
    /// Called once during construction with validated options.
    ///
    /// The engine keeps `handle` to hand script messages to the bridge via
    /// [`Handle::deliver`], and to post UI work from other threads.
    fn attach(&mut self, handle: Handle, options: &CreateOptions) -> Result<()> {
        let _ = (handle, options);
        Ok(())
    }

    /// Evaluate script in the current page. The result is ignored.
    fn eval(&mut self, js: &str) -> Result<()>;

    /// Queue script to run on every page load, before `window.onload`
    fn init(&mut self, js: &str) -> Result<()>;

    /// Navigate to a URL
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Replace the page content with HTML
    fn set_html(&mut self, html: &str) -> Result<()>;

    /// Show the window
    fn show(&mut self) -> Result<()> {
        Ok(())
    }
}
