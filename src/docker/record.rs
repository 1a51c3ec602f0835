use bollard::models::{ContainerSummary, Port};

// ======================================================
// CONTAINER RECORD
// ======================================================

/// One row of `GET /containers/json`, with the optional fields flattened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerRecord {
    pub id: String,
    /// `name[:tag]`
    pub image: String,
    pub command: String,
    /// Creation time, epoch seconds.
    pub created: i64,
    pub status: String,
    pub ports: Vec<PublishedPort>,
    /// Names as the engine reports them, each with a leading `/`.
    pub names: Vec<String>,
    /// Writable layer, bytes. Zero unless sizes were requested.
    pub size_rw: i64,
    /// Writable layer plus base image, bytes.
    pub size_root_fs: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedPort {
    pub private_port: u16,
    /// Transport: `tcp`, `udp` or `sctp`.
    pub typ: String,
    pub ip: Option<String>,
    pub public_port: Option<u16>,
}

#[cfg(test)]
impl PublishedPort {
    pub fn new(private_port: u16, typ: &str) -> Self {
        Self {
            private_port,
            typ: typ.to_string(),
            ip: None,
            public_port: None,
        }
    }

    pub fn published(mut self, ip: Option<&str>, public_port: u16) -> Self {
        self.ip = ip.map(str::to_string);
        self.public_port = Some(public_port);
        self
    }
}

// ======================================================
// CONVERSION FROM THE ENGINE MODEL
// ======================================================

impl From<Port> for PublishedPort {
    fn from(port: Port) -> Self {
        Self {
            private_port: port.private_port,
            typ: port.typ.map(|t| t.to_string()).unwrap_or_default(),
            ip: port.ip.filter(|ip| !ip.is_empty()),
            public_port: port.public_port.filter(|p| *p != 0),
        }
    }
}

impl From<ContainerSummary> for ContainerRecord {
    fn from(summary: ContainerSummary) -> Self {
        Self {
            id: summary.id.unwrap_or_default(),
            image: summary.image.unwrap_or_default(),
            command: summary.command.unwrap_or_default(),
            created: summary.created.unwrap_or_default(),
            status: summary.status.unwrap_or_default(),
            ports: summary
                .ports
                .unwrap_or_default()
                .into_iter()
                .map(PublishedPort::from)
                .collect(),
            names: summary.names.unwrap_or_default(),
            size_rw: summary.size_rw.unwrap_or_default(),
            size_root_fs: summary.size_root_fs.unwrap_or_default(),
        }
    }
}
