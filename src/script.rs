//! Script fragments evaluated by the engine on behalf of the bridge.
//!
//! Pending calls live script-side in `window._rpc`, keyed by the sequence
//! number the stub minted. Names and ids are always embedded as escaped
//! string literals; results are embedded verbatim as JSON values.

use crate::json::escape;

/// Global holding the script-side RPC namespace
pub const RPC_NAMESPACE: &str = "window._rpc";

/// Script installing a callable stub under `window[name]`.
///
/// Calling the stub mints a fresh sequence number, registers the promise
/// callbacks under it and posts a `{id, method, params}` envelope to the
/// native side.
pub fn binding_stub(name: &str) -> String {
    format!(
        r#"(function() {{ var name = {name};
  var RPC = {ns} = ({ns} || {{nextSeq: 1}});
  window[name] = function() {{
    var seq = RPC.nextSeq++;
    var promise = new Promise(function(resolve, reject) {{
      RPC[seq] = {{
        resolve: resolve,
        reject: reject,
      }};
    }});
    window.external.invoke(JSON.stringify({{
      id: seq,
      method: name,
      params: Array.prototype.slice.call(arguments),
    }}));
    return promise;
  }};
}})()"#,
        name = escape(name),
        ns = RPC_NAMESPACE,
    )
}

/// Script removing the stub installed by [`binding_stub`]
pub fn remove_binding(name: &str) -> String {
    format!("delete window[{}];", escape(name))
}

/// Script settling the pending call `id`.
///
/// A zero `status` resolves the promise with `result`, anything else rejects
/// it. Ids without a pending entry are ignored.
pub fn settle(id: &str, status: i32, result: &str) -> String {
    let method = if status == 0 { "resolve" } else { "reject" };
    format!(
        "(function() {{ var RPC = {ns} || {{}}; var id = {id}; var p = RPC[id]; \
         if (p) {{ p.{method}({result}); delete RPC[id]; }} }})()",
        ns = RPC_NAMESPACE,
        id = escape(id),
        method = method,
        result = result,
    )
}
