//! Static configuration data shared by the config generators
//!
//! DNS blocks, rule lists and service groups are opaque data emitted as-is.
//! Only the proxy-dependent groups and the few values taken from
//! [`Settings`] vary between runs.

use serde_json::{json, Value};

use crate::settings::Settings;

pub const PROXY_GROUP: &str = "Proxy";
pub const AUTO_GROUP: &str = "Auto";
pub const FALLBACK_GROUP: &str = "Fallback";
pub const FINAL_GROUP: &str = "Final";

/// Built-in policy names as spelled in Clash and Loon.
pub const DIRECT: &str = "DIRECT";
pub const REJECT: &str = "REJECT";

/// Selector groups whose members do not depend on the proxy list.
pub const SERVICE_GROUPS: [(&str, &[&str]); 4] = [
    ("Domestic", &[DIRECT, PROXY_GROUP]),
    ("Streaming", &[PROXY_GROUP, AUTO_GROUP, DIRECT]),
    ("AdBlock", &[REJECT, DIRECT]),
    (FINAL_GROUP, &[PROXY_GROUP, DIRECT]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    DomainSuffix,
    DomainKeyword,
    GeoIp,
}

impl RuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::DomainSuffix => "DOMAIN-SUFFIX",
            RuleKind::DomainKeyword => "DOMAIN-KEYWORD",
            RuleKind::GeoIp => "GEOIP",
        }
    }
}

/// Routing rules, followed by a catch-all to [`FINAL_GROUP`].
pub const RULES: [(RuleKind, &str, &str); 10] = [
    (RuleKind::DomainSuffix, "doubleclick.net", "AdBlock"),
    (RuleKind::DomainKeyword, "adservice", "AdBlock"),
    (RuleKind::DomainSuffix, "netflix.com", "Streaming"),
    (RuleKind::DomainSuffix, "nflxvideo.net", "Streaming"),
    (RuleKind::DomainSuffix, "youtube.com", "Streaming"),
    (RuleKind::DomainSuffix, "googlevideo.com", "Streaming"),
    (RuleKind::DomainSuffix, "cn", "Domestic"),
    (RuleKind::DomainKeyword, "baidu", "Domestic"),
    (RuleKind::GeoIp, "LAN", DIRECT),
    (RuleKind::GeoIp, "CN", "Domestic"),
];

/// Members of a group that needs at least one entry.
fn members_or_direct(names: &[String]) -> Vec<String> {
    if names.is_empty() {
        vec![DIRECT.to_string()]
    } else {
        names.to_vec()
    }
}

// Clash

pub fn clash_header(settings: &Settings) -> String {
    format!(
        "mixed-port: {}\nallow-lan: false\nmode: rule\nlog-level: {}\nexternal-controller: 127.0.0.1:9090\n",
        settings.clash_mixed_port, settings.log_level
    )
}

pub const CLASH_DNS: &str = "dns:
  enable: true
  ipv6: false
  enhanced-mode: fake-ip
  fake-ip-range: 198.18.0.1/16
  default-nameserver:
    - 223.5.5.5
    - 119.29.29.29
  nameserver:
    - https://doh.pub/dns-query
    - https://dns.alidns.com/dns-query
  fallback:
    - https://1.1.1.1/dns-query
    - https://dns.google/dns-query
  fallback-filter:
    geoip: true
    geoip-code: CN
";

/// Proxy groups in Clash order: selector, url-test, fallback, then services.
pub fn clash_groups(names: &[String], settings: &Settings) -> Vec<Value> {
    let mut selector = vec![
        AUTO_GROUP.to_string(),
        FALLBACK_GROUP.to_string(),
        DIRECT.to_string(),
    ];
    selector.extend(names.iter().cloned());

    let mut groups = vec![
        json!({"name": PROXY_GROUP, "type": "select", "proxies": selector}),
        json!({
            "name": AUTO_GROUP,
            "type": "url-test",
            "proxies": members_or_direct(names),
            "url": settings.test_url,
            "interval": settings.test_interval,
            "tolerance": settings.test_tolerance,
        }),
        json!({
            "name": FALLBACK_GROUP,
            "type": "fallback",
            "proxies": members_or_direct(names),
            "url": settings.test_url,
            "interval": settings.test_interval,
        }),
    ];
    groups.extend(
        SERVICE_GROUPS
            .iter()
            .map(|(name, members)| json!({"name": name, "type": "select", "proxies": members})),
    );
    groups
}

pub fn clash_rules() -> Vec<String> {
    RULES
        .iter()
        .map(|(kind, value, target)| format!("{},{},{}", kind.as_str(), value, target))
        .chain(std::iter::once(format!("MATCH,{}", FINAL_GROUP)))
        .collect()
}

// sing-box

pub const SINGBOX_DIRECT: &str = "direct";
pub const SINGBOX_BLOCK: &str = "block";
pub const SINGBOX_DNS_OUT: &str = "dns-out";

fn singbox_tag(policy: &str) -> &str {
    match policy {
        DIRECT => SINGBOX_DIRECT,
        REJECT => SINGBOX_BLOCK,
        other => other,
    }
}

pub fn singbox_log(settings: &Settings) -> Value {
    json!({"level": settings.log_level, "timestamp": true})
}

pub fn singbox_dns() -> Value {
    json!({
        "servers": [
            {"tag": "remote", "address": "https://1.1.1.1/dns-query", "detour": PROXY_GROUP},
            {"tag": "local", "address": "https://223.5.5.5/dns-query", "detour": SINGBOX_DIRECT},
            {"tag": "block", "address": "rcode://success"}
        ],
        "rules": [
            {"outbound": "any", "server": "local"},
            {"rule_set": "geosite-cn", "server": "local"}
        ],
        "final": "remote",
        "strategy": "ipv4_only"
    })
}

pub fn singbox_inbounds(settings: &Settings) -> Value {
    json!([{
        "type": "mixed",
        "tag": "mixed-in",
        "listen": "127.0.0.1",
        "listen_port": settings.singbox_mixed_port,
        "sniff": true
    }])
}

/// Selector and urltest outbounds placed before the proxies.
pub fn singbox_groups(names: &[String], settings: &Settings) -> Vec<Value> {
    let mut selector = vec![AUTO_GROUP.to_string()];
    selector.extend(names.iter().cloned());
    selector.push(SINGBOX_DIRECT.to_string());

    let mut groups = vec![
        json!({"type": "selector", "tag": PROXY_GROUP, "outbounds": selector, "default": AUTO_GROUP}),
        json!({
            "type": "urltest",
            "tag": AUTO_GROUP,
            "outbounds": if names.is_empty() { vec![SINGBOX_DIRECT.to_string()] } else { names.to_vec() },
            "url": settings.test_url,
            "interval": format!("{}s", settings.test_interval),
            "tolerance": settings.test_tolerance,
        }),
    ];
    groups.extend(SERVICE_GROUPS.iter().map(|(name, members)| {
        let outbounds: Vec<&str> = members.iter().map(|member| singbox_tag(member)).collect();
        json!({"type": "selector", "tag": name, "outbounds": outbounds})
    }));
    groups
}

/// Outbounds placed after the proxies.
pub fn singbox_builtin_outbounds() -> Vec<Value> {
    vec![
        json!({"type": "direct", "tag": SINGBOX_DIRECT}),
        json!({"type": "block", "tag": SINGBOX_BLOCK}),
        json!({"type": "dns", "tag": SINGBOX_DNS_OUT}),
    ]
}

pub fn singbox_route() -> Value {
    let mut rules = vec![json!({"protocol": "dns", "outbound": SINGBOX_DNS_OUT})];
    for (kind, value, target) in RULES.iter() {
        let outbound = singbox_tag(target);
        let rule = match (kind, *value) {
            (RuleKind::GeoIp, "LAN") => json!({"ip_is_private": true, "outbound": outbound}),
            (RuleKind::GeoIp, code) => {
                json!({"rule_set": format!("geoip-{}", code.to_ascii_lowercase()), "outbound": outbound})
            }
            (RuleKind::DomainSuffix, domain) => json!({"domain_suffix": [domain], "outbound": outbound}),
            (RuleKind::DomainKeyword, keyword) => {
                json!({"domain_keyword": [keyword], "outbound": outbound})
            }
        };
        rules.push(rule);
    }

    json!({
        "rules": rules,
        "rule_set": [
            {
                "tag": "geoip-cn",
                "type": "remote",
                "format": "binary",
                "url": "https://raw.githubusercontent.com/SagerNet/sing-geoip/rule-set/geoip-cn.srs",
                "download_detour": SINGBOX_DIRECT
            },
            {
                "tag": "geosite-cn",
                "type": "remote",
                "format": "binary",
                "url": "https://raw.githubusercontent.com/SagerNet/sing-geosite/rule-set/geosite-cn.srs",
                "download_detour": SINGBOX_DIRECT
            }
        ],
        "final": FINAL_GROUP,
        "auto_detect_interface": true
    })
}

// Loon

pub const LOON_GENERAL: &str = "[General]
ip-mode = ipv4-only
dns-server = system,119.29.29.29,223.5.5.5
doh-server = https://doh.pub/dns-query
allow-wifi-access = false
skip-proxy = 192.168.0.0/16,10.0.0.0/8,172.16.0.0/12,localhost,*.local
bypass-tun = 10.0.0.0/8,100.64.0.0/10,127.0.0.0/8,169.254.0.0/16,172.16.0.0/12,192.168.0.0/16,224.0.0.0/4,255.255.255.255/32
";

/// Everything after `[Rule]`, emitted verbatim.
pub const LOON_TRAILER: &str = "[Remote Rule]

[Rewrite]

[Host]

[Script]

[MITM]
";

pub fn loon_groups(names: &[String], settings: &Settings) -> Vec<String> {
    let members = members_or_direct(names).join(",");

    let mut selector = vec![AUTO_GROUP.to_string(), FALLBACK_GROUP.to_string(), DIRECT.to_string()];
    selector.extend(names.iter().cloned());

    let mut groups = vec![
        format!("{} = select,{}", PROXY_GROUP, selector.join(",")),
        format!(
            "{} = url-test,{},url = {},interval = {},tolerance = {}",
            AUTO_GROUP, members, settings.test_url, settings.test_interval, settings.test_tolerance
        ),
        format!(
            "{} = fallback,{},url = {},interval = {}",
            FALLBACK_GROUP, members, settings.test_url, settings.test_interval
        ),
    ];
    groups.extend(
        SERVICE_GROUPS
            .iter()
            .map(|(name, members)| format!("{} = select,{}", name, members.join(","))),
    );
    groups
}

pub fn loon_rules() -> Vec<String> {
    RULES
        .iter()
        .map(|(kind, value, target)| format!("{},{},{}", kind.as_str(), value, target))
        .chain(std::iter::once(format!("FINAL,{}", FINAL_GROUP)))
        .collect()
}
