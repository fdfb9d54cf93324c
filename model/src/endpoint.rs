use http::Uri;
use std::fmt;
use std::str::FromStr;

pub type HostName = String;
pub type ServiceAddr = NetworkAddr;

/// A `host:port` pair identifying the query service endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkAddr {
    pub host: HostName,
    pub port: u16,
}

impl NetworkAddr {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        assert!(!host.is_empty(), "Hostname cannot be empty");
        assert!(port > 0, "Port cannot be 0");
        Self { host, port }
    }

    pub fn to_uri(&self, scheme: &str) -> Uri {
        Uri::builder()
            .scheme(scheme)
            .authority(format!("{}:{}", self.host, self.port))
            .path_and_query("/")
            .build()
            .expect("Invalid NetworkAddr components")
    }
}

impl fmt::Display for NetworkAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for NetworkAddr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Uri understands hostnames + ports; a dummy scheme makes the parser
        // recognize the authority.
        let format_s = if s.contains("://") {
            s.to_string()
        } else {
            format!("http://{}", s)
        };
        let uri = format_s.parse::<Uri>().map_err(|e| e.to_string())?;

        let authority = uri.authority().ok_or("Missing host/port")?;
        let host = authority.host().to_string();
        let port = authority.port_u16().ok_or("Missing port")?;

        Ok(NetworkAddr { host, port })
    }
}

impl<'a> From<&'a str> for NetworkAddr {
    fn from(s: &'a str) -> Self {
        NetworkAddr::from_str(s).expect("Invalid NetworkAddr string")
    }
}
