//! Human-readable QoS and counter formatting helpers.

/// Format a data rate in kbit/s as "500 kb/s" or "1.5 Mb/s".
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_rate_kbps(kbps: u64) -> String {
    if kbps >= 1_000 {
        format!("{:.1} Mb/s", kbps as f64 / 1_000.0)
    } else {
        format!("{kbps} kb/s")
    }
}

/// Format a delay in milliseconds as "40 ms" or "1.2 s".
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_delay_ms(ms: u64) -> String {
    if ms >= 1_000 {
        format!("{:.1} s", ms as f64 / 1_000.0)
    } else {
        format!("{ms} ms")
    }
}

/// Format a packet counter compactly: "842", "12.4k", "3.1M".
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_packets(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 10_000 {
        format!("{:.1}k", count as f64 / 1_000.0)
    } else {
        format!("{count}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rates_switch_units_at_a_megabit() {
        assert_eq!(fmt_rate_kbps(500), "500 kb/s");
        assert_eq!(fmt_rate_kbps(1_500), "1.5 Mb/s");
    }

    #[test]
    fn delays_switch_units_at_a_second() {
        assert_eq!(fmt_delay_ms(40), "40 ms");
        assert_eq!(fmt_delay_ms(1_200), "1.2 s");
    }

    #[test]
    fn packet_counts_stay_compact() {
        assert_eq!(fmt_packets(842), "842");
        assert_eq!(fmt_packets(12_400), "12.4k");
        assert_eq!(fmt_packets(3_100_000), "3.1M");
    }
}
