//! Parsers for `ip` and `ifconfig` output.
//!
//! Field layout differs per tool generation:
//! - `ip -o addr`/`ip link`: `inet 10.0.2.15/24`, `link/ether aa:bb:...`
//! - BSD/macOS ifconfig: `inet 192.168.4.21 netmask ...`, `ether aa:bb:...`
//!   (OpenBSD/NetBSD spell the MAC line `lladdr`)
//! - legacy Linux ifconfig: `inet addr:203.0.113.7`, `HWaddr 00:16:...`
//!
//! All parsers are pure token scans over captured text, tested against
//! canned output from each layout.

/// First IPv4 address in `ip -o -4 addr show dev <iface>` output.
pub fn parse_ip_addr(text: &str) -> Option<String> {
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        while let Some(token) = tokens.next() {
            // Exact match skips inet6 lines.
            if token == "inet" {
                return tokens
                    .next()
                    .map(|cidr| cidr.split('/').next().unwrap_or(cidr).to_string());
            }
        }
    }
    None
}

/// MAC address in `ip -o link show dev <iface>` output.
pub fn parse_ip_link_mac(text: &str) -> Option<String> {
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        while let Some(token) = tokens.next() {
            if token == "link/ether" {
                return tokens.next().map(str::to_string);
            }
        }
    }
    None
}

/// First IPv4 address in `ifconfig <iface>` output, any generation.
pub fn parse_ifconfig_inet(text: &str) -> Option<String> {
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        while let Some(token) = tokens.next() {
            if token == "inet" {
                let value = tokens.next()?;
                // Legacy Linux prints `inet addr:203.0.113.7`.
                let addr = value.strip_prefix("addr:").unwrap_or(value);
                return Some(addr.to_string());
            }
        }
    }
    None
}

/// MAC address in `ifconfig <iface>` output, any generation.
pub fn parse_ifconfig_mac(text: &str) -> Option<String> {
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        while let Some(token) = tokens.next() {
            match token {
                // BSD/macOS and OpenBSD/NetBSD spellings.
                "ether" | "lladdr" => return tokens.next().map(str::to_string),
                // Legacy Linux.
                "HWaddr" => return tokens.next().map(str::to_string),
                _ => {}
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const IP_ADDR_OUT: &str = "2: eth0    inet 10.0.2.15/24 brd 10.0.2.255 scope global dynamic noprefixroute eth0\\       valid_lft 85861sec preferred_lft 85861sec\n";

    const IP_LINK_OUT: &str = "2: eth0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc fq_codel state UP mode DEFAULT group default qlen 1000\\    link/ether 08:00:27:4e:66:a1 brd ff:ff:ff:ff:ff:ff\n";

    const MACOS_IFCONFIG: &str = "\
en0: flags=8863<UP,BROADCAST,SMART,RUNNING,SIMPLEX,MULTICAST> mtu 1500
\tether f0:18:98:5a:2b:c1
\tinet6 fe80::1c52:b0ff:fe7a:9c01%en0 prefixlen 64 secured scopeid 0x8
\tinet 192.168.4.21 netmask 0xffffff00 broadcast 192.168.4.255
\tmedia: autoselect
\tstatus: active
";

    const LEGACY_LINUX_IFCONFIG: &str = "\
eth0      Link encap:Ethernet  HWaddr 00:16:3E:5E:6C:00
          inet addr:203.0.113.7  Bcast:203.0.113.255  Mask:255.255.255.0
          inet6 addr: fe80::216:3eff:fe5e:6c00/64 Scope:Link
          UP BROADCAST RUNNING MULTICAST  MTU:1500  Metric:1
";

    const OPENBSD_IFCONFIG: &str = "\
em0: flags=8843<UP,BROADCAST,RUNNING,SIMPLEX,MULTICAST> mtu 1500
\tlladdr 00:0c:29:8d:35:71
\tindex 1 priority 0 llprio 3
\tinet 10.0.0.5 netmask 0xffffff00 broadcast 10.0.0.255
";

    #[test]
    fn ip_addr_strips_the_prefix_length() {
        assert_eq!(parse_ip_addr(IP_ADDR_OUT).unwrap(), "10.0.2.15");
    }

    #[test]
    fn ip_addr_ignores_inet6_lines() {
        let v6_only = "2: eth0    inet6 fe80::a00:27ff:fe4e:66a1/64 scope link\n";
        assert_eq!(parse_ip_addr(v6_only), None);
    }

    #[test]
    fn ip_link_finds_the_ether_token() {
        assert_eq!(
            parse_ip_link_mac(IP_LINK_OUT).unwrap(),
            "08:00:27:4e:66:a1"
        );
    }

    #[test]
    fn ip_link_skips_loopback_lines() {
        let lo = "1: lo: <LOOPBACK,UP,LOWER_UP> mtu 65536\\    link/loopback 00:00:00:00:00:00 brd 00:00:00:00:00:00\n";
        assert_eq!(parse_ip_link_mac(lo), None);
    }

    #[test]
    fn macos_ifconfig_layout() {
        assert_eq!(
            parse_ifconfig_inet(MACOS_IFCONFIG).unwrap(),
            "192.168.4.21"
        );
        assert_eq!(
            parse_ifconfig_mac(MACOS_IFCONFIG).unwrap(),
            "f0:18:98:5a:2b:c1"
        );
    }

    #[test]
    fn legacy_linux_ifconfig_layout() {
        assert_eq!(
            parse_ifconfig_inet(LEGACY_LINUX_IFCONFIG).unwrap(),
            "203.0.113.7"
        );
        assert_eq!(
            parse_ifconfig_mac(LEGACY_LINUX_IFCONFIG).unwrap(),
            "00:16:3E:5E:6C:00"
        );
    }

    #[test]
    fn openbsd_ifconfig_layout() {
        assert_eq!(parse_ifconfig_inet(OPENBSD_IFCONFIG).unwrap(), "10.0.0.5");
        assert_eq!(
            parse_ifconfig_mac(OPENBSD_IFCONFIG).unwrap(),
            "00:0c:29:8d:35:71"
        );
    }

    #[test]
    fn empty_text_parses_to_nothing() {
        assert_eq!(parse_ip_addr(""), None);
        assert_eq!(parse_ip_link_mac(""), None);
        assert_eq!(parse_ifconfig_inet(""), None);
        assert_eq!(parse_ifconfig_mac(""), None);
    }
}
