use std::fs;

use proxyconv::{ConvertError, Converter, FormatRegistry, Settings};
use tempfile::TempDir;

#[cfg(test)]
mod settings_tests {
    use super::*;

    #[test]
    fn test_load_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("proxyconv.yaml");
        fs::write(
            &path,
            r#"
test_url: "https://cp.cloudflare.com/generate_204"
test_interval: 120
clash_mixed_port: 7899
"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.test_url, "https://cp.cloudflare.com/generate_204");
        assert_eq!(settings.test_interval, 120);
        assert_eq!(settings.clash_mixed_port, 7899);
        assert_eq!(settings.fetch_timeout_secs, 15);
    }

    #[test]
    fn test_load_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("proxyconv.toml");
        fs::write(&path, "singbox_mixed_port = 2081\nlog_level = \"warn\"\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.singbox_mixed_port, 2081);
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.test_interval, 300);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Settings::load(dir.path().join("absent.yaml")),
            Err(ConvertError::Settings(_))
        ));
    }

    #[test]
    fn test_settings_reach_generators() {
        let settings = Settings::from_content(
            "clash_mixed_port = 7999\ntest_url = \"https://cp.cloudflare.com\"\ntest_interval = 60\n",
        )
        .unwrap();
        let registry = FormatRegistry::with_settings(&settings).unwrap();
        let converter = Converter::new(&registry);
        let link = "trojan://secret@example.com:443#T";

        let clash = converter.convert(link, "txt", "clash-meta").unwrap();
        assert!(clash.output.starts_with("mixed-port: 7999\n"));
        assert!(clash.output.contains("https://cp.cloudflare.com"));

        let singbox = converter.convert(link, "txt", "sing-box").unwrap();
        assert!(singbox.output.contains("\"60s\""));

        let loon = converter.convert(link, "txt", "loon").unwrap();
        assert!(loon.output.contains("url = https://cp.cloudflare.com"));
    }
}
