//! CCTV bandwidth calculator tool
//!
//! Sizes the network for an IP camera deployment: per-camera bitrate by
//! resolution, scaled by frame rate against a 25 fps baseline, with a 30%
//! switch margin and a monthly storage estimate. Stateless arithmetic.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Baseline frame rate the per-camera bitrates assume
const BASELINE_FPS: f64 = 25.0;

/// Switch sizing margin
const SWITCH_MARGIN: f64 = 1.3;

/// TB of 24/7 footage per Mbps of stream over one month
const TB_PER_MBPS_MONTH: f64 = 0.45;

/// Supported camera resolutions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Resolution {
    R720p,
    #[default]
    R1080p,
    R4k,
}

impl Resolution {
    /// Approximate bitrate per camera in Mbps
    pub fn bitrate_mbps(&self) -> f64 {
        match self {
            Resolution::R720p => 2.0,
            Resolution::R1080p => 4.0,
            Resolution::R4k => 15.0,
        }
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "720p" => Ok(Resolution::R720p),
            "1080p" => Ok(Resolution::R1080p),
            "4k" => Ok(Resolution::R4k),
            other => Err(Error::Other(format!(
                "unknown resolution '{}': expected 720p, 1080p, or 4K",
                other
            ))),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resolution::R720p => "720p",
            Resolution::R1080p => "1080p",
            Resolution::R4k => "4K",
        };
        f.write_str(s)
    }
}

/// Computed sizing figures
#[derive(Debug, Clone, PartialEq)]
pub struct BandwidthEstimate {
    pub cameras: u32,
    pub resolution: Resolution,
    pub fps: u32,
    pub bitrate_per_camera_mbps: f64,
    pub total_mbps: f64,
    pub switch_recommendation_mbps: f64,
    pub storage_tb_per_month: f64,
}

/// Compute the bandwidth requirement for a camera deployment.
pub fn calculate_bandwidth(cameras: u32, resolution: Resolution, fps: u32) -> BandwidthEstimate {
    let bitrate = resolution.bitrate_mbps();
    let total = cameras as f64 * bitrate * (fps as f64 / BASELINE_FPS);

    BandwidthEstimate {
        cameras,
        resolution,
        fps,
        bitrate_per_camera_mbps: bitrate,
        total_mbps: total,
        switch_recommendation_mbps: total * SWITCH_MARGIN,
        storage_tb_per_month: total * TB_PER_MBPS_MONTH,
    }
}

/// Render the estimate the way the assistant presents it.
pub fn format_estimate(e: &BandwidthEstimate) -> String {
    format!(
        "CCTV BANDWIDTH ESTIMATE\n\
         -----------------------------\n\
         Configuration:\n\
         - Cameras: {cameras}\n\
         - Resolution: {resolution}\n\
         - FPS: {fps}\n\
         \n\
         Result:\n\
         - Bitrate per camera: {bitrate} Mbps\n\
         - Total bandwidth required: {total:.2} Mbps\n\
         - Switch recommendation: {switch:.2} Mbps (30% margin)\n\
         \n\
         Tip: for 24/7 recording, plan for {storage:.1} TB/month of storage.\n",
        cameras = e.cameras,
        resolution = e.resolution,
        fps = e.fps,
        bitrate = e.bitrate_per_camera_mbps,
        total = e.total_mbps,
        switch = e.switch_recommendation_mbps,
        storage = e.storage_tb_per_month,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_deployment_figures() {
        // 10 cameras at 1080p/25fps: 40 Mbps total, 52 Mbps switch,
        // 18 TB per month
        let e = calculate_bandwidth(10, Resolution::R1080p, 25);

        assert_eq!(e.bitrate_per_camera_mbps, 4.0);
        assert!((e.total_mbps - 40.0).abs() < 1e-9);
        assert!((e.switch_recommendation_mbps - 52.0).abs() < 1e-9);
        assert!((e.storage_tb_per_month - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_fps_scales_linearly() {
        let half = calculate_bandwidth(10, Resolution::R720p, 12);
        assert!((half.total_mbps - 10.0 * 2.0 * (12.0 / 25.0)).abs() < 1e-9);

        let double = calculate_bandwidth(4, Resolution::R4k, 50);
        assert!((double.total_mbps - 4.0 * 15.0 * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolution_parsing() {
        assert_eq!("720p".parse::<Resolution>().unwrap(), Resolution::R720p);
        assert_eq!("4K".parse::<Resolution>().unwrap(), Resolution::R4k);
        assert_eq!("4k".parse::<Resolution>().unwrap(), Resolution::R4k);
        assert!("8K".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_formatted_output_carries_the_figures() {
        let e = calculate_bandwidth(10, Resolution::R1080p, 25);
        let text = format_estimate(&e);

        assert!(text.contains("Total bandwidth required: 40.00 Mbps"));
        assert!(text.contains("Switch recommendation: 52.00 Mbps"));
        assert!(text.contains("18.0 TB/month"));
    }
}
