use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Runtime settings of the server.
///
/// Built once at startup and then shared read-only with every connection.
/// Every field has a default, so a TOML file only needs to list the values
/// it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,

    /// Size of the single read that fills the request buffer.
    /// Requests larger than this are truncated. Must be non-zero.
    #[serde(deserialize_with = "deserialize_buffer_size")]
    pub buffer_size: usize,

    /// Root directory served by the `/files/{name}` endpoints.
    pub files_directory: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 4221,
            buffer_size: 1024,

            files_directory: PathBuf::from("./files"),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %path.display(), %err, "fail to read config, fall back to default config");
                return ServerConfig::default();
            }
        };

        match Self::from_toml(&content) {
            Ok(server_config) => server_config,
            Err(err) => {
                warn!(path = %path.display(), %err, "fail to deserialize config, fall back to default config");
                ServerConfig::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<ServerConfig>(content)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

fn deserialize_buffer_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let size = usize::deserialize(deserializer)?;
    if size == 0 {
        return Err(serde::de::Error::custom("buffer_size must be greater than zero"));
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_setup() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr(), "127.0.0.1:4221".parse::<SocketAddr>().unwrap());
        assert_eq!(config.buffer_size, 1024);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = ServerConfig::from_toml("port = 8080\nfiles_directory = \"/tmp/data\"\n").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.files_directory, PathBuf::from("/tmp/data"));
        assert_eq!(config.buffer_size, 1024);
        assert_eq!(config.address, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(ServerConfig::from_toml("port = \"not a number\"").is_err());
    }

    #[test]
    fn zero_buffer_size_is_rejected() {
        let err = ServerConfig::from_toml("buffer_size = 0").unwrap_err();
        assert!(err.to_string().contains("buffer_size must be greater than zero"));
        assert_eq!(ServerConfig::from_toml("buffer_size = 64").unwrap().buffer_size, 64);
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let config = ServerConfig::from_file(Path::new("/definitely/not/here.toml"));
        assert_eq!(config, ServerConfig::default());
    }
}
