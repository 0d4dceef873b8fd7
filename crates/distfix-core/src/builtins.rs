//! Node.js built-in module names.

use std::collections::HashSet;

/// Built-in modules importable with or without the `node:` prefix
/// (Node's `require('node:module').builtinModules`).
pub const NODE_BUILTINS: &[&str] = &[
    "_http_agent",
    "_http_client",
    "_http_common",
    "_http_incoming",
    "_http_outgoing",
    "_http_server",
    "_stream_duplex",
    "_stream_passthrough",
    "_stream_readable",
    "_stream_transform",
    "_stream_wrap",
    "_stream_writable",
    "_tls_common",
    "_tls_wrap",
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "inspector/promises",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Built-ins that only exist behind the `node:` prefix. A bare `test` is an
/// ordinary package name.
pub const NODE_PREFIX_ONLY: &[&str] = &["sea", "sqlite", "test", "test/reporters"];

/// The set of built-in module names, without prefix.
#[derive(Debug, Clone)]
pub struct BuiltinModules {
    names: HashSet<&'static str>,
    prefix_only: HashSet<&'static str>,
}

impl Default for BuiltinModules {
    fn default() -> Self {
        Self::node()
    }
}

impl BuiltinModules {
    /// Node.js built-ins.
    #[must_use]
    pub fn node() -> Self {
        Self {
            names: NODE_BUILTINS.iter().copied().collect(),
            prefix_only: NODE_PREFIX_ONLY.iter().copied().collect(),
        }
    }

    /// Whether `name` is a built-in that may also be imported without the prefix.
    #[must_use]
    pub fn is_unprefixed(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Whether `name` (prefix already stripped) is any known built-in.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name) || self.prefix_only.contains(name)
    }
}
