//! Development server: serves the build root with live reload injected.
//!
//! The server is an explicit handle. Whoever binds it runs the request
//! loop on a thread and calls [`DevServer::unblock`] to stop it.

mod inject;
mod path;
mod response;


use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use tiny_http::{Request, Server};

use crate::embed::LIVERELOAD_URL;
use crate::log;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;
/// Request handler threads.
const REQUEST_THREADS: usize = 4;

/// Bound HTTP server for one build root.
pub struct DevServer {
    server: Arc<Server>,
    addr: SocketAddr,
    root: PathBuf,
    ws_port: u16,
}

impl DevServer {
    /// Bind `interface:port`, or the next free port.
    ///
    /// `ws_port` is baked into the live reload client this server hands out.
    pub fn bind(interface: IpAddr, port: u16, root: &Path, ws_port: u16) -> Result<Self> {
        let (server, addr) = bind_with_retry(interface, port)?;
        Ok(Self {
            server: Arc::new(server),
            addr,
            root: root.to_path_buf(),
            ws_port,
        })
    }

    /// The bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve requests until [`unblock`](Self::unblock) is called (blocking).
    pub fn run(&self) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(REQUEST_THREADS)
            .thread_name(|i| format!("kiln-http-{i}"))
            .build()?;

        for request in self.server.incoming_requests() {
            let root = self.root.clone();
            let ws_port = self.ws_port;
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &root, ws_port) {
                    log!("serve"; "request error: {e}");
                }
            });
        }

        crate::debug!("serve"; "request loop stopped");
        Ok(())
    }

    /// Make a running [`run`](Self::run) return.
    pub fn unblock(&self) {
        self.server.unblock();
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, root: &Path, ws_port: u16) -> Result<()> {
    if path::url_path(request.url()) == LIVERELOAD_URL {
        return response::respond_livereload_js(request, ws_port);
    }

    match path::resolve_path(request.url(), root) {
        Some(file) => response::respond_file(request, &file),
        None => response::respond_not_found(request, root),
    }
}

/// Bind to the specified interface and port, with automatic port retry.
fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                // Port 0 asks the OS for one
                let addr = server.server_addr().to_ip().unwrap_or(addr);
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}
