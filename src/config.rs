//! Server configuration.
//!
//! [`ServerConfig`] is the resolved configuration the transport needs. With
//! the `server` feature, [`ServerArgs`] parses it from the command line and
//! environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default port for the HTTP API.
pub const DEFAULT_PORT: u16 = 8000;

/// Default front-end origin allowed by CORS.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to.
    pub addr: SocketAddr,
    /// Browser origin allowed to call the API.
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

#[cfg(feature = "server")]
pub use cli::ServerArgs;

#[cfg(feature = "server")]
mod cli {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    use clap::Parser;

    use super::{ServerConfig, DEFAULT_CORS_ORIGIN, DEFAULT_PORT};

    /// Serves the Alien Simulation estimation, city model and report API.
    #[derive(Debug, Parser)]
    #[command(name = "aliensim-server", version, about = "Alien Simulation API", long_about = None)]
    pub struct ServerArgs {
        /// The address to serve the API on.
        #[arg(
            long = "http.addr",
            value_name = "ADDR",
            env = "ALIENSIM_ADDR",
            default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST)
        )]
        pub address: IpAddr,
        /// The port to serve the API on.
        #[arg(
            long = "http.port",
            value_name = "PORT",
            env = "ALIENSIM_PORT",
            default_value_t = DEFAULT_PORT
        )]
        pub port: u16,
        /// The browser origin allowed by CORS.
        #[arg(
            long = "cors-origin",
            value_name = "ORIGIN",
            env = "ALIENSIM_CORS_ORIGIN",
            default_value = DEFAULT_CORS_ORIGIN
        )]
        pub cors_origin: String,
    }

    impl ServerArgs {
        #[must_use]
        pub fn into_config(self) -> ServerConfig {
            ServerConfig {
                addr: SocketAddr::new(self.address, self.port),
                cors_origin: self.cors_origin,
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_localhost_8000() {
        let config = ServerConfig::default();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8000");
        assert_eq!(config.cors_origin, "http://localhost:3000");
    }
}
