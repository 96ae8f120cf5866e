//! Static device status grid and network activity tiles.

/// Health rating of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    /// Within normal range.
    Good,
    /// Worth watching.
    Warning,
    /// Needs attention.
    Critical,
}

impl Health {
    /// Single-glyph badge, as used by the status grid.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Good => "●",
            Self::Warning => "▲",
            Self::Critical => "✖",
        }
    }

    /// Lower-case label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

/// One tile of the device status grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemMetric {
    /// Tile heading.
    pub label: &'static str,
    /// Display value.
    pub value: &'static str,
    /// Health rating.
    pub health: Health,
}

/// One tile of the network activity strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkTile {
    /// Tile heading.
    pub label: &'static str,
    /// Display value.
    pub value: &'static str,
}

/// The fixed device metrics shown on the overview.
pub fn device_metrics() -> Vec<SystemMetric> {
    vec![
        SystemMetric { label: "CPU Usage", value: "23%", health: Health::Good },
        SystemMetric { label: "Memory", value: "45MB/264MB", health: Health::Good },
        SystemMetric { label: "WiFi Signal", value: "-67 dBm", health: Health::Good },
        SystemMetric { label: "Temperature", value: "42°C", health: Health::Warning },
        SystemMetric { label: "Uptime", value: "2h 34m", health: Health::Good },
        SystemMetric { label: "Power", value: "USB 5V", health: Health::Good },
    ]
}

/// The fixed network activity tiles.
pub fn network_tiles() -> [NetworkTile; 4] {
    [
        NetworkTile { label: "Requests/min", value: "127" },
        NetworkTile { label: "Data In", value: "2.3MB" },
        NetworkTile { label: "Data Out", value: "1.8MB" },
        NetworkTile { label: "Avg Latency", value: "45ms" },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_metrics_fixed_set() {
        let metrics = device_metrics();
        assert_eq!(metrics.len(), 6);
        let temp = metrics
            .iter()
            .find(|m| m.label == "Temperature")
            .expect("test: temperature tile");
        assert_eq!(temp.health, Health::Warning);
        assert_eq!(
            metrics.iter().filter(|m| m.health == Health::Good).count(),
            5
        );
    }

    #[test]
    fn test_network_tiles() {
        let tiles = network_tiles();
        assert_eq!(tiles[0].value, "127");
        assert_eq!(tiles[3].label, "Avg Latency");
    }
}
