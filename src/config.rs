use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::{
    core::{Canvas, Fps, Rgb8},
    error::{BannerError, BannerResult},
};

/// Vertical space kept free above and below the badges.
pub const BADGE_MARGIN_Y: u32 = 10;

pub const DEFAULT_BADGE_URLS: &[&str] = &[
    "https://img.shields.io/badge/Vault-FFD814?style=for-the-badge&logo=vault&logoColor=black",
    "https://img.shields.io/badge/Wazuh-005792?style=for-the-badge&logo=wazuh&logoColor=white",
    "https://img.shields.io/badge/Keycloak-008AAA?style=for-the-badge&logo=keycloak&logoColor=white",
    "https://img.shields.io/badge/wiki.js-1976D2?style=for-the-badge&logo=wikidotjs&logoColor=white",
    "https://img.shields.io/badge/GitLab-FC6D26?style=for-the-badge&logo=gitlab&logoColor=white",
    "https://img.shields.io/badge/Grafana-F46800?style=for-the-badge&logo=grafana&logoColor=white",
    "https://img.shields.io/badge/Prometheus-E6522C?style=for-the-badge&logo=prometheus&logoColor=white",
    "https://img.shields.io/badge/Nginx-009639?style=for-the-badge&logo=nginx&logoColor=white",
    "https://img.shields.io/badge/Portainer-13BEF9?style=for-the-badge&logo=portainer&logoColor=white",
    "https://img.shields.io/badge/Nextcloud-0082C9?style=for-the-badge&logo=nextcloud&logoColor=white",
    "https://img.shields.io/badge/WordPress-21759B?style=for-the-badge&logo=wordpress&logoColor=white",
    "https://img.shields.io/badge/InfluxDB-22ADF6?style=for-the-badge&logo=influxdb&logoColor=white",
    "https://img.shields.io/badge/MySQL-4479A1?style=for-the-badge&logo=mysql&logoColor=white",
    "https://img.shields.io/badge/PostgreSQL-316192?style=for-the-badge&logo=postgresql&logoColor=white",
    "https://img.shields.io/badge/MongoDB-47A248?style=for-the-badge&logo=mongodb&logoColor=white",
    "https://img.shields.io/badge/ArangoDB-DDE072?style=for-the-badge&logo=arangodb&logoColor=black",
    "https://img.shields.io/badge/Redis-DC382D?style=for-the-badge&logo=redis&logoColor=white",
    "https://img.shields.io/badge/Neo4j-008CC1?style=for-the-badge&logo=neo4j&logoColor=white",
    "https://img.shields.io/badge/Docker-2496ED?style=for-the-badge&logo=docker&logoColor=white",
    "https://img.shields.io/badge/Kubernetes-326CE5?style=for-the-badge&logo=kubernetes&logoColor=white",
    "https://img.shields.io/badge/Python-3776AB?style=for-the-badge&logo=python&logoColor=white",
    "https://img.shields.io/badge/Angular-DD0031?style=for-the-badge&logo=angular&logoColor=white",
    "https://img.shields.io/badge/C++-00599C?style=for-the-badge&logo=cplusplus&logoColor=white",
];

/// Everything a banner render needs. Every field has a default, so a JSON config file only
/// has to name what it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BannerConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Horizontal gap between neighbouring badges.
    pub padding_x: u32,
    /// Nominal scroll speed. The per-frame step is derived from the loop distance instead.
    pub speed_px_per_frame: u32,
    pub fps: u32,
    pub duration_seconds: f64,
    pub background_rgb: Rgb8,
    pub output_path: PathBuf,
    /// Left-to-right order of the badges in the strip.
    pub badge_urls: Vec<String>,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200,
            canvas_height: 70,
            padding_x: 10,
            speed_px_per_frame: 3,
            fps: 25,
            duration_seconds: 100.0,
            background_rgb: Rgb8::new(13, 17, 23),
            output_path: PathBuf::from("assets/banner.gif"),
            badge_urls: DEFAULT_BADGE_URLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl BannerConfig {
    pub fn from_json_path(path: &Path) -> BannerResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> BannerResult<()> {
        self.canvas()?;
        self.fps()?;
        if self.canvas_width > u32::from(u16::MAX) || self.canvas_height > u32::from(u16::MAX) {
            return Err(BannerError::validation(format!(
                "canvas {}x{} exceeds the GIF limit of {}x{}",
                self.canvas_width,
                self.canvas_height,
                u16::MAX,
                u16::MAX
            )));
        }
        if self.speed_px_per_frame == 0 {
            return Err(BannerError::validation("speed_px_per_frame must be > 0"));
        }
        if !self.duration_seconds.is_finite() || self.duration_seconds <= 0.0 {
            return Err(BannerError::validation(
                "duration_seconds must be a positive number",
            ));
        }
        if self.badge_height() == 0 {
            return Err(BannerError::validation(format!(
                "canvas_height must be > {} to leave room for badges",
                2 * BADGE_MARGIN_Y
            )));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(BannerError::validation("output_path must not be empty"));
        }
        Ok(())
    }

    pub fn canvas(&self) -> BannerResult<Canvas> {
        Canvas::new(self.canvas_width, self.canvas_height)
    }

    pub fn fps(&self) -> BannerResult<Fps> {
        Fps::new(self.fps)
    }

    /// Height every badge is scaled to.
    pub fn badge_height(&self) -> u32 {
        self.canvas_height.saturating_sub(2 * BADGE_MARGIN_Y)
    }

    pub fn total_frames(&self) -> BannerResult<u64> {
        Ok(self.fps()?.frames_for_secs(self.duration_seconds))
    }

    pub fn frame_delay_ms(&self) -> BannerResult<u32> {
        Ok(self.fps()?.frame_delay_ms())
    }

    pub fn with_output_path(mut self, out_path: impl Into<PathBuf>) -> Self {
        self.output_path = out_path.into();
        self
    }
}
