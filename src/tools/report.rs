//! Maintenance report tool
//!
//! Formats an incident confirmation for field technicians. Pure text
//! generation: the ticket is synthesized, nothing is persisted.

use crate::error::{Error, Result};
use chrono::Local;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Incident priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for Priority {
    type Err = Error;

    // The deployed assistant speaks Spanish, so the original field values
    // stay accepted alongside the English ones.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "low" | "baja" => Ok(Priority::Low),
            "medium" | "media" => Ok(Priority::Medium),
            "high" | "alta" => Ok(Priority::High),
            other => Err(Error::Other(format!(
                "unknown priority '{}': expected Low, Medium, or High",
                other
            ))),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        };
        f.write_str(s)
    }
}

impl Priority {
    fn response_window(&self) -> &'static str {
        match self {
            Priority::High => "within 2 hours",
            Priority::Medium => "within 24 hours",
            Priority::Low => "within 72 hours",
        }
    }
}

/// Synthesize a ticket confirmation for an equipment failure.
pub fn create_report(equipment: &str, failure_type: &str, priority: Priority) -> String {
    let ticket_id = format!("SEC-{}", rand::thread_rng().gen_range(1000..=9999));
    let date = Local::now().format("%Y-%m-%d %H:%M");

    format!(
        "MAINTENANCE REPORT CREATED\n\
         --------------------------------\n\
         Ticket ID: {ticket_id}\n\
         Date: {date}\n\
         Equipment: {equipment}\n\
         Failure type: {failure_type}\n\
         Priority: {priority}\n\
         Status: Reported to the security department\n\
         Next step: technician assigned {window}\n",
        window = priority.response_window(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_report_contains_ticket_and_echoes_fields() {
        let report = create_report("CCTV-Camara-3", "No video signal", Priority::default());

        let ticket = Regex::new(r"SEC-\d{4}").unwrap();
        assert!(ticket.is_match(&report));
        assert!(report.contains("CCTV-Camara-3"));
        assert!(report.contains("No video signal"));
        assert!(report.contains("Priority: Medium"));
    }

    #[test]
    fn test_ticket_number_stays_in_range() {
        for _ in 0..50 {
            let report = create_report("panel", "fault", Priority::Low);
            let ticket = Regex::new(r"SEC-(\d+)").unwrap();
            let caps = ticket.captures(&report).unwrap();
            let n: u32 = caps[1].parse().unwrap();
            assert!((1000..=9999).contains(&n));
        }
    }

    #[test]
    fn test_priority_accepts_spanish_aliases() {
        assert_eq!("Media".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!("alta".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("Baja".parse::<Priority>().unwrap(), Priority::Low);
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }
}
