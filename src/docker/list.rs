use async_trait::async_trait;
use bollard::container::ListContainersOptions;
use bollard::{ClientVersion, Docker};
use tracing::debug;

use super::record::ContainerRecord;

pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

const LOCAL_SOCKET: &str = "/var/run/docker.sock";
const CONNECT_TIMEOUT_SECS: u64 = 120;

// ======================================================
// COLLABORATOR SEAM
// ======================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListRequest {
    pub include_stopped: bool,
    pub include_sizes: bool,
}

#[async_trait]
pub trait ContainerSource: Send + Sync {
    async fn list_containers(&self, request: ListRequest) -> Result<Vec<ContainerRecord>, SourceError>;
}

// ======================================================
// DOCKER ENGINE
// ======================================================

pub struct DockerSource {
    docker: Docker,
}

impl DockerSource {
    /// Connects to the engine. `DOCKER_HOST` is honoured; without an explicit
    /// `api_version` the version is negotiated with the daemon.
    pub async fn connect(api_version: Option<&str>) -> Result<Self, SourceError> {
        let host = std::env::var("DOCKER_HOST").ok();

        let docker = match api_version {
            None => {
                let docker = match host {
                    Some(_) => Docker::connect_with_defaults()?,
                    None => Docker::connect_with_local_defaults()?,
                };
                docker.negotiate_version().await?
            }
            Some(raw) => {
                let version = parse_api_version(raw)?;
                match host.as_deref() {
                    Some(h) if h.starts_with("tcp://") || h.starts_with("http://") => {
                        Docker::connect_with_http(h, CONNECT_TIMEOUT_SECS, &version)?
                    }
                    Some(h) => Docker::connect_with_local(
                        h.trim_start_matches("unix://"),
                        CONNECT_TIMEOUT_SECS,
                        &version,
                    )?,
                    None => Docker::connect_with_local(LOCAL_SOCKET, CONNECT_TIMEOUT_SECS, &version)?,
                }
            }
        };

        Ok(Self { docker })
    }

    pub fn api_version(&self) -> String {
        let version = self.docker.client_version();
        format!("{}.{}", version.major_version, version.minor_version)
    }
}

#[async_trait]
impl ContainerSource for DockerSource {
    async fn list_containers(&self, request: ListRequest) -> Result<Vec<ContainerRecord>, SourceError> {
        let options = Some(ListContainersOptions::<String> {
            all: request.include_stopped,
            size: request.include_sizes,
            ..Default::default()
        });

        let containers = self.docker.list_containers(options).await?;
        debug!(count = containers.len(), "engine returned containers");

        Ok(containers.into_iter().map(ContainerRecord::from).collect())
    }
}

/// `"1.40"` -> API version 1.40.
pub fn parse_api_version(raw: &str) -> Result<ClientVersion, SourceError> {
    let invalid = || format!("invalid Docker API version '{}', expected MAJOR.MINOR", raw);

    let (major, minor) = raw.trim().split_once('.').ok_or_else(invalid)?;
    let major_version = major.parse::<usize>().map_err(|_| invalid())?;
    let minor_version = minor.parse::<usize>().map_err(|_| invalid())?;

    Ok(ClientVersion {
        major_version,
        minor_version,
    })
}
