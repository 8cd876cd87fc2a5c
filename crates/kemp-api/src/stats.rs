// Statistics endpoint.

use tracing::debug;

use crate::client::Client;
use crate::command::Command;
use crate::error::Error;
use crate::models::{RealServerStats, Statistics, VirtualServerStats};

impl Client {
    /// Fetch throughput and per-service counters.
    ///
    /// `GET stats`
    ///
    /// Both lists come back ordered by address, then port.
    pub async fn get_statistics(&self) -> Result<Statistics, Error> {
        debug!("fetching statistics");
        let mut stats: Statistics = self.request(&Command::new("stats")).await?;
        stats.sort();
        Ok(stats)
    }
}

impl Statistics {
    /// Order both lists by address (lexically), then port (numerically).
    pub fn sort(&mut self) {
        self.virtual_servers.sort_by(VirtualServerStats::cmp_endpoint);
        self.real_servers.sort_by(RealServerStats::cmp_endpoint);
    }
}

impl VirtualServerStats {
    fn cmp_endpoint(a: &Self, b: &Self) -> std::cmp::Ordering {
        a.address.cmp(&b.address).then(a.port.cmp(&b.port))
    }
}

impl RealServerStats {
    fn cmp_endpoint(a: &Self, b: &Self) -> std::cmp::Ordering {
        a.address.cmp(&b.address).then(a.port.cmp(&b.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rs(address: &str, port: u32) -> RealServerStats {
        RealServerStats {
            address: address.into(),
            port,
            ..RealServerStats::default()
        }
    }

    #[test]
    fn sort_is_lexical_on_address_then_numeric_on_port() {
        let mut stats = Statistics {
            real_servers: vec![
                rs("10.0.0.2", 80),
                rs("10.0.0.10", 80),
                rs("10.0.0.1", 8080),
                rs("10.0.0.1", 443),
            ],
            ..Statistics::default()
        };
        stats.sort();

        let order: Vec<_> = stats
            .real_servers
            .iter()
            .map(|r| (r.address.as_str(), r.port))
            .collect();
        assert_eq!(
            order,
            [
                ("10.0.0.1", 443),
                ("10.0.0.1", 8080),
                ("10.0.0.10", 80),
                ("10.0.0.2", 80),
            ]
        );
    }
}
