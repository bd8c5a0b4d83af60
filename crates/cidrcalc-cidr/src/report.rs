//! Report layout
//!
//! Decides which lines a [`Cidr`] produces and how wide each column is.
//! [`Report::write_lines`] is the one text renderer; `Display` uses it with
//! unstyled labels.

use std::fmt;

use cidrcalc_core::Ipv4;
use serde::Serialize;

use crate::{Cidr, DerivedAddresses};

/// Label column width when every line is shown
const LABEL_WIDTH_FULL: usize = 9;
/// Label column width for /31 (no `broadcast` line)
const LABEL_WIDTH_POINT_TO_POINT: usize = 7;
/// Label column width for /32 (only `ip` and `mask`)
const LABEL_WIDTH_HOST: usize = 4;

/// Label used for the host count line
pub const NUM_HOSTS_LABEL: &str = "num hosts";

/// One address line of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLine {
    pub label: &'static str,
    pub address: Ipv4,
}

/// Lines to display for one CIDR, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    cidr: Cidr,
    derived: DerivedAddresses,
    lines: Vec<ReportLine>,
}

impl Report {
    /// Build the report for `cidr`
    ///
    /// `ip` and `mask` always appear. `minAddr`/`maxAddr` appear below /32,
    /// `broadcast` and the host count below /31.
    ///
    /// ```
    /// use cidrcalc_cidr::{Cidr, Report};
    ///
    /// let report = Report::new(&Cidr::parse("192.168.1.5/32").unwrap());
    /// let labels: Vec<_> = report.lines().iter().map(|l| l.label).collect();
    /// assert_eq!(labels, ["ip", "mask"]);
    /// assert_eq!(report.num_hosts(), None);
    /// ```
    pub fn new(cidr: &Cidr) -> Self {
        let derived = cidr.subnet().derive();

        let mut lines = vec![
            ReportLine { label: "ip", address: cidr.address() },
            ReportLine { label: "mask", address: derived.mask },
        ];
        if let (Some(min), Some(max)) = (derived.min_host, derived.max_host) {
            lines.push(ReportLine { label: "minAddr", address: min });
            lines.push(ReportLine { label: "maxAddr", address: max });
        }
        if let Some(broadcast) = derived.broadcast {
            lines.push(ReportLine { label: "broadcast", address: broadcast });
        }

        Self {
            cidr: *cidr,
            derived,
            lines,
        }
    }

    /// Address lines in display order
    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    /// Usable host count, when it is displayed
    pub fn num_hosts(&self) -> Option<u64> {
        self.derived.host_count
    }

    /// Width of the label column, sized to the longest label shown
    pub fn label_width(&self) -> usize {
        match self.cidr.prefix_len() {
            32 => LABEL_WIDTH_HOST,
            31 => LABEL_WIDTH_POINT_TO_POINT,
            _ => LABEL_WIDTH_FULL,
        }
    }

    /// Width of the dotted-decimal column, sized to the longest address shown
    pub fn address_width(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.address.to_string().len())
            .max()
            .unwrap_or(0)
    }

    /// Machine-readable form of the report
    pub fn summary(&self) -> Summary {
        let d = &self.derived;
        Summary {
            ip: self.cidr.address().into(),
            prefix_len: self.cidr.prefix_len(),
            mask: d.mask.into(),
            wildcard: d.wildcard.into(),
            network: d.network.into(),
            min_addr: d.min_host.map(Rendered::from),
            max_addr: d.max_host.map(Rendered::from),
            broadcast: d.broadcast.map(Rendered::from),
            num_hosts: d.host_count,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_lines(f, str::to_string)
    }
}

impl Report {
    /// Write the aligned text report
    ///
    /// `style_label` receives each label already padded to the label column
    /// width, so styling it cannot shift the columns after it.
    ///
    /// ```
    /// use cidrcalc_cidr::{Cidr, Report};
    ///
    /// let report = Report::new(&Cidr::parse("10.0.0.1/32").unwrap());
    /// let mut out = String::new();
    /// report.write_lines(&mut out, |label| label.to_uppercase()).unwrap();
    /// assert!(out.starts_with("IP   : 10.0.0.1 "));
    /// ```
    pub fn write_lines<W, F>(&self, out: &mut W, style_label: F) -> fmt::Result
    where
        W: fmt::Write,
        F: Fn(&str) -> String,
    {
        let label_width = self.label_width();
        let address_width = self.address_width();

        for line in &self.lines {
            writeln!(
                out,
                "{} : {:<aw$}  {}",
                style_label(&format!("{:<label_width$}", line.label)),
                line.address.to_string(),
                line.address.to_binary(),
                aw = address_width,
            )?;
        }
        if let Some(hosts) = self.num_hosts() {
            writeln!(out, "{} : {}", style_label(NUM_HOSTS_LABEL), hosts)?;
        }
        Ok(())
    }
}

/// Address in both of its display forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub dotted: String,
    pub binary: String,
}

impl From<Ipv4> for Rendered {
    fn from(ip: Ipv4) -> Self {
        Self {
            dotted: ip.to_string(),
            binary: ip.to_binary(),
        }
    }
}

/// Serializable report; fields that do not apply are omitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub ip: Rendered,
    pub prefix_len: u8,
    pub mask: Rendered,
    pub wildcard: Rendered,
    pub network: Rendered,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_addr: Option<Rendered>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_addr: Option<Rendered>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<Rendered>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_hosts: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(input: &str) -> Report {
        Report::new(&Cidr::parse(input).unwrap())
    }

    fn labels(report: &Report) -> Vec<&'static str> {
        report.lines().iter().map(|l| l.label).collect()
    }

    #[test]
    fn test_full_report_text() {
        let expected = "\
ip        : 10.9.19.101    00001010.00001001.00010011.01100101
mask      : 255.255.254.0  11111111.11111111.11111110.00000000
minAddr   : 10.9.18.1      00001010.00001001.00010010.00000001
maxAddr   : 10.9.19.254    00001010.00001001.00010011.11111110
broadcast : 10.9.19.255    00001010.00001001.00010011.11111111
num hosts : 510
";
        assert_eq!(report("10.9.19.101/23").to_string(), expected);
    }

    #[test]
    fn test_slash_31_lines() {
        let report = report("192.168.1.0/31");
        assert_eq!(labels(&report), ["ip", "mask", "minAddr", "maxAddr"]);
        assert_eq!(report.num_hosts(), None);
        assert_eq!(report.label_width(), 7);

        let text = report.to_string();
        assert!(text.starts_with("ip      : 192.168.1.0      "));
        assert!(!text.contains("broadcast"));
        assert!(!text.contains(NUM_HOSTS_LABEL));
    }

    #[test]
    fn test_slash_32_lines() {
        let report = report("192.168.1.5/32");
        assert_eq!(labels(&report), ["ip", "mask"]);
        assert_eq!(report.label_width(), 4);
        assert_eq!(
            report.to_string(),
            "ip   : 192.168.1.5      11000000.10101000.00000001.00000101\n\
             mask : 255.255.255.255  11111111.11111111.11111111.11111111\n"
        );
    }

    #[test]
    fn test_styled_labels_keep_layout() {
        let report = report("10.9.19.101/23");
        let mut styled = String::new();
        report
            .write_lines(&mut styled, |label| format!("<{label}>"))
            .unwrap();

        assert!(styled.starts_with("<ip       > : 10.9.19.101    00001010."));
        assert!(styled.contains("\n<broadcast> : 10.9.19.255    "));
        assert!(styled.ends_with("<num hosts> : 510\n"));

        let unstyled = styled.replace(['<', '>'], "");
        assert_eq!(unstyled, report.to_string());
    }

    #[test]
    fn test_ip_line_shows_address_as_given() {
        let report = report("192.168.1.77/24");
        assert_eq!(report.lines()[0].address.to_string(), "192.168.1.77");
    }

    #[test]
    fn test_address_width() {
        assert_eq!(report("10.9.19.101/23").address_width(), 13);
        assert_eq!(report("1.2.3.4/32").address_width(), 15);
    }

    #[test]
    fn test_report_is_idempotent() {
        assert_eq!(
            report("172.16.5.4/12").to_string(),
            report("172.16.5.4/12").to_string()
        );
    }

    #[test]
    fn test_summary_json() {
        let json = serde_json::to_value(report("10.9.19.101/23").summary()).unwrap();
        assert_eq!(json["ip"]["dotted"], "10.9.19.101");
        assert_eq!(json["prefix_len"], 23);
        assert_eq!(json["mask"]["binary"], "11111111.11111111.11111110.00000000");
        assert_eq!(json["network"]["dotted"], "10.9.18.0");
        assert_eq!(json["broadcast"]["dotted"], "10.9.19.255");
        assert_eq!(json["num_hosts"], 510);
    }

    #[test]
    fn test_summary_json_omits_missing_fields() {
        let json = serde_json::to_value(report("192.168.1.5/32").summary()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("min_addr"));
        assert!(!obj.contains_key("broadcast"));
        assert!(!obj.contains_key("num_hosts"));
        assert!(obj.contains_key("mask"));
    }
}
