//! Shared fixtures for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use link_mirror::config::RegistryConfig;
use tempfile::TempDir;

pub const SERVICES: &str = r#"{
    "example.com": { "query_whitelist": ["x"] },
    "youtube.com": {
        "alt_domains": ["m.youtube.com", "youtu.be"],
        "query_whitelist": ["v", "t"]
    },
    "twitter.com": {},
    "vimeo.com": { "query_whitelist": ["h"] }
}"#;

pub const ALTS: &str = r#"{
    "mirror.example": { "service": "example.com" },
    "yewtu.be": { "service": "youtube.com" },
    "inv.example": { "service": "youtube.com" },
    "nitter.example": { "service": "twitter.com" },
    "x.com": { "service": "twitter.com" },
    "orphan.example": {}
}"#;

/// Registry files in a temporary directory.
pub struct Fixture {
    pub dir: TempDir,
    pub services_path: PathBuf,
    pub alts_path: PathBuf,
}

impl Fixture {
    pub fn new(services: &str, alts: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let services_path = dir.path().join("services.json");
        let alts_path = dir.path().join("alts.json");
        fs::write(&services_path, services).unwrap();
        fs::write(&alts_path, alts).unwrap();
        Self {
            dir,
            services_path,
            alts_path,
        }
    }

    pub fn standard() -> Self {
        Self::new(SERVICES, ALTS)
    }

    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            services_path: path_str(&self.services_path),
            alts_path: path_str(&self.alts_path),
            ..RegistryConfig::default()
        }
    }

    #[allow(dead_code)]
    pub fn rewrite_services(&self, services: &str) {
        fs::write(&self.services_path, services).unwrap();
    }
}

fn path_str(path: &Path) -> String {
    path.display().to_string()
}
