use super::error::PlatformError;
#[cfg(test)]
use mockall::automock;
use serde::{Serialize, Serializer};
use std::io;
use std::net::Ipv6Addr;

/// One address bound to one interface, as reported by the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddress {
    pub name: String,
    /// Textual form; may carry a `%zone` suffix.
    pub address: String,
    pub loopback: bool,
}

#[cfg_attr(test, automock)]
pub trait HasInterfaces {
    fn interfaces(&self) -> io::Result<Vec<InterfaceAddress>>;
}

pub struct HostInterfaces;

impl HasInterfaces for HostInterfaces {
    fn interfaces(&self) -> io::Result<Vec<InterfaceAddress>> {
        Ok(if_addrs::get_if_addrs()?
            .into_iter()
            .map(|iface| InterfaceAddress {
                loopback: iface.is_loopback(),
                address: iface.ip().to_string(),
                name: iface.name,
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddresses {
    pub name: String,
    pub addresses: Vec<String>,
}

/// Interface name to its IPv6 addresses, in the order interfaces were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceAddressMap(Vec<InterfaceAddresses>);

impl InterfaceAddressMap {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterfaceAddresses> {
        self.0.iter()
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.addresses.as_slice())
    }

    fn push(&mut self, name: &str, address: String) {
        match self.0.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.addresses.push(address),
            None => self.0.push(InterfaceAddresses {
                name: name.to_owned(),
                addresses: vec![address],
            }),
        }
    }
}

impl<N: Into<String>, A: Into<String>> FromIterator<(N, Vec<A>)> for InterfaceAddressMap {
    fn from_iter<I: IntoIterator<Item = (N, Vec<A>)>>(iter: I) -> Self {
        InterfaceAddressMap(
            iter.into_iter()
                .map(|(name, addresses)| InterfaceAddresses {
                    name: name.into(),
                    addresses: addresses.into_iter().map(Into::into).collect(),
                })
                .collect(),
        )
    }
}

impl Serialize for InterfaceAddressMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|entry| (&entry.name, &entry.addresses)))
    }
}

pub fn active_ipv6_addresses(source: &dyn HasInterfaces) -> Result<InterfaceAddressMap, PlatformError> {
    let mut map = InterfaceAddressMap::default();
    for iface in source.interfaces().map_err(PlatformError::Interfaces)? {
        if iface.loopback || is_loopback_name(&iface.name) {
            continue;
        }
        if let Some(address) = displayable_ipv6(&iface.address) {
            map.push(&iface.name, address.to_owned());
        }
    }
    Ok(map)
}

fn is_loopback_name(name: &str) -> bool {
    name.strip_prefix("lo")
        .map(|rest| rest.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

/// Strips the zone, then keeps only IPv6 addresses outside the `fe` link-local/site-local block.
fn displayable_ipv6(address: &str) -> Option<&str> {
    let address = address.split('%').next().unwrap_or_default();
    if address.parse::<Ipv6Addr>().is_err() {
        return None;
    }
    if address.get(..2).is_some_and(|prefix| prefix.eq_ignore_ascii_case("fe")) {
        return None;
    }
    Some(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(name: &str, address: &str) -> InterfaceAddress {
        InterfaceAddress {
            name: name.to_owned(),
            address: address.to_owned(),
            loopback: false,
        }
    }

    fn mock_returning(addresses: Vec<InterfaceAddress>) -> MockHasInterfaces {
        let mut mock = MockHasInterfaces::new();
        mock.expect_interfaces().times(1).return_once(move || Ok(addresses));
        mock
    }

    #[test]
    fn skips_loopback_interfaces() {
        let mut flagged = addr("weird0", "2001:db8::9");
        flagged.loopback = true;
        let mock = mock_returning(vec![
            addr("lo", "2001:db8::1"),
            addr("lo0", "2001:db8::2"),
            flagged,
            addr("eth0", "2001:db8::3"),
        ]);
        let map = active_ipv6_addresses(&mock).unwrap();
        assert_eq!(None, map.get("lo"));
        assert_eq!(None, map.get("lo0"));
        assert_eq!(None, map.get("weird0"));
        assert_eq!(Some(&["2001:db8::3".to_owned()][..]), map.get("eth0"));
    }

    #[test]
    fn keeps_interfaces_that_only_start_like_loopback() {
        let mock = mock_returning(vec![addr("lowpan0", "2001:db8::4")]);
        let map = active_ipv6_addresses(&mock).unwrap();
        assert_eq!(Some(&["2001:db8::4".to_owned()][..]), map.get("lowpan0"));
    }

    #[test]
    fn keeps_interfaces_with_lo_inside_their_name() {
        let mock = mock_returning(vec![addr("wlo1", "2001:db8::6"), addr("enlo0", "2001:db8::7")]);
        let map = active_ipv6_addresses(&mock).unwrap();
        assert_eq!(Some(&["2001:db8::6".to_owned()][..]), map.get("wlo1"));
        assert_eq!(Some(&["2001:db8::7".to_owned()][..]), map.get("enlo0"));
    }

    #[test]
    fn drops_link_local_and_strips_zone() {
        let mock = mock_returning(vec![
            addr("en0", "fe80::1%en0"),
            addr("en0", "FE80::2"),
            addr("en0", "2001:db8::5%en0"),
            addr("en0", "192.168.1.10"),
        ]);
        let map = active_ipv6_addresses(&mock).unwrap();
        assert_eq!(Some(&["2001:db8::5".to_owned()][..]), map.get("en0"));
    }

    #[test]
    fn interface_with_only_link_local_is_omitted() {
        let mock = mock_returning(vec![addr("wlan0", "fe80::abcd%wlan0"), addr("wlan0", "10.0.0.2")]);
        let map = active_ipv6_addresses(&mock).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn keeps_first_seen_interface_order() {
        let mock = mock_returning(vec![
            addr("eth1", "2001:db8::1"),
            addr("eth0", "2001:db8::2"),
            addr("eth1", "2001:db8::3"),
        ]);
        let map = active_ipv6_addresses(&mock).unwrap();
        let expected: InterfaceAddressMap = vec![
            ("eth1", vec!["2001:db8::1", "2001:db8::3"]),
            ("eth0", vec!["2001:db8::2"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(expected, map);
    }

    #[test]
    fn enumeration_failure_is_a_platform_error() {
        let mut mock = MockHasInterfaces::new();
        mock.expect_interfaces()
            .times(1)
            .returning(|| Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")));
        let err = active_ipv6_addresses(&mock).unwrap_err();
        assert!(matches!(err, PlatformError::Interfaces(_)));
    }

    #[test]
    fn serializes_as_ordered_object() {
        let map: InterfaceAddressMap = vec![("eth1", vec!["2001:db8::1"]), ("eth0", vec!["2001:db8::2"])]
            .into_iter()
            .collect();
        assert_eq!(
            r#"{"eth1":["2001:db8::1"],"eth0":["2001:db8::2"]}"#,
            serde_json::to_string(&map).unwrap()
        );
    }
}
