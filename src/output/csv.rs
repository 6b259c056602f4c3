//! Delimited export of vulnerability records.
//!
//! The column list names `packageId` twice, and both columns carry the same
//! value. Existing consumers of these files expect eleven columns in exactly
//! this order.

use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::VulnerabilityRecord;

pub const CSV_COLUMNS: [&str; 11] = [
    "packageId",
    "packageName",
    "packageVersion",
    "packageLicenses",
    "packageId",
    "cveId",
    "cvss",
    "cveStatus",
    "severity",
    "sourceId",
    "resourceId",
];

const LINE_END: &str = "\r\n";

/// `sbom_<YYYYMMDD-HHMMSS>.csv` for the given local time.
pub fn export_filename(at: DateTime<Local>) -> String {
    format!("sbom_{}.csv", at.format("%Y%m%d-%H%M%S"))
}

/// Quotes a field only when it contains a delimiter, quote, or line break.
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_row<W: Write, S: AsRef<str>>(out: &mut W, fields: &[S]) -> Result<()> {
    let line = fields
        .iter()
        .map(|f| escape(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    out.write_all(line.as_bytes())?;
    out.write_all(LINE_END.as_bytes())?;
    Ok(())
}

/// Scores always keep a fractional part, so `10.0` stays `10.0`.
fn format_cvss(cvss: f64) -> String {
    format!("{:?}", cvss)
}

fn record_fields(record: &VulnerabilityRecord) -> [String; 11] {
    [
        record.package_id.clone(),
        record.package_name.clone(),
        record.package_version.clone(),
        record.package_licenses.clone(),
        record.package_id.clone(),
        record.cve_id.clone(),
        record.cvss.map(format_cvss).unwrap_or_default(),
        record.cve_status.clone(),
        record.severity.clone(),
        record.source_id.clone(),
        record.resource_id.clone(),
    ]
}

/// Writes the header and one row per record.
pub fn write_csv<W: Write>(out: &mut W, records: &[VulnerabilityRecord]) -> Result<()> {
    write_row(out, &CSV_COLUMNS[..])?;
    for record in records {
        write_row(out, &record_fields(record)[..])?;
    }
    out.flush()?;
    Ok(())
}

/// Writes `records` to a timestamped file in `dir` and returns its path.
pub fn export_csv(
    dir: &Path,
    records: &[VulnerabilityRecord],
    at: DateTime<Local>,
) -> Result<PathBuf> {
    let path = dir.join(export_filename(at));
    let mut writer = BufWriter::new(File::create(&path)?);
    write_csv(&mut writer, records)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cve, Package};
    use chrono::TimeZone;

    fn records() -> Vec<VulnerabilityRecord> {
        let openssl = Package::new(
            "pkg-openssl",
            "openssl",
            "1.1.1k",
            vec!["Apache-2.0".to_string(), "OpenSSL".to_string()],
        );
        let odd = Package::new("pkg-odd", "weird, \"quoted\" name", "0.1", vec![]);
        let mut all = VulnerabilityRecord::flatten(
            &openssl,
            vec![
                Cve {
                    cve_id: "CVE-2021-3711".to_string(),
                    cvss: Some(9.8),
                    cve_status: "OPEN".to_string(),
                    severity: "CRITICAL".to_string(),
                    source_id: "src-1".to_string(),
                    resource_id: "res-1".to_string(),
                },
                Cve {
                    cve_id: "CVE-2021-3712".to_string(),
                    cvss: Some(7.4),
                    cve_status: "OPEN".to_string(),
                    severity: "HIGH".to_string(),
                    source_id: "src-2".to_string(),
                    resource_id: "res-2".to_string(),
                },
            ],
        );
        all.extend(VulnerabilityRecord::flatten(
            &odd,
            vec![Cve {
                cve_id: "CVE-2020-0001".to_string(),
                cvss: None,
                cve_status: "OPEN".to_string(),
                severity: "LOW".to_string(),
                source_id: "src-3".to_string(),
                resource_id: "res-3".to_string(),
            }],
        ));
        all
    }

    /// Minimal reader for the dialect written above.
    fn parse(text: &str) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        let mut row = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match (c, in_quotes) {
                ('"', true) if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                ('"', true) => in_quotes = false,
                ('"', false) => in_quotes = true,
                (',', false) => row.push(std::mem::take(&mut field)),
                ('\r', false) => {}
                ('\n', false) => {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                (c, _) => field.push(c),
            }
        }
        rows
    }

    #[test]
    fn test_export_filename_format() {
        let at = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(export_filename(at), "sbom_20240307-090502.csv");
    }

    #[test]
    fn test_header_duplicates_package_id() {
        let mut out = Vec::new();
        write_csv(&mut out, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "packageId,packageName,packageVersion,packageLicenses,packageId,cveId,cvss,cveStatus,severity,sourceId,resourceId\r\n"
        );
    }

    #[test]
    fn test_escape_minimal_quoting() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_row_layout() {
        let mut out = Vec::new();
        write_csv(&mut out, &records()[..1]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let second_line = text.split("\r\n").nth(1).unwrap();
        assert_eq!(
            second_line,
            "pkg-openssl,openssl,1.1.1k,Apache-2.0|OpenSSL,pkg-openssl,CVE-2021-3711,9.8,OPEN,CRITICAL,src-1,res-1"
        );
    }

    #[test]
    fn test_whole_number_cvss_keeps_fraction() {
        let package = Package::new("p", "log4j-core", "2.14.1", vec![]);
        let cve: Cve = serde_json::from_str(
            r#"{"cveId":"CVE-2021-44228","cvss":10.0,"cveStatus":"OPEN","severity":"CRITICAL","sourceId":"s","resourceId":"r"}"#,
        )
        .unwrap();

        let mut out = Vec::new();
        write_csv(&mut out, &VulnerabilityRecord::flatten(&package, vec![cve])).unwrap();
        let text = String::from_utf8(out).unwrap();
        let row = text.split("\r\n").nth(1).unwrap();
        assert_eq!(
            row,
            "p,log4j-core,2.14.1,,p,CVE-2021-44228,10.0,OPEN,CRITICAL,s,r"
        );
        assert_eq!(format_cvss(9.8), "9.8");
        assert_eq!(format_cvss(0.0), "0.0");
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let records = records();
        let at = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let path = export_csv(dir.path(), &records, at).unwrap();
        assert_eq!(path, dir.path().join("sbom_20240102-030405.csv"));

        let text = std::fs::read_to_string(&path).unwrap();
        let rows = parse(&text);
        assert_eq!(rows.len(), records.len() + 1);
        assert_eq!(rows[0], CSV_COLUMNS);

        for (row, record) in rows[1..].iter().zip(&records) {
            assert_eq!(row.len(), 11);
            assert_eq!(row[0], record.package_id);
            assert_eq!(row[4], record.package_id);
            assert_eq!(row[1], record.package_name);
            assert_eq!(row[2], record.package_version);
            assert_eq!(row[5], record.cve_id);
            assert_eq!(row[8], record.severity);
        }
        assert_eq!(rows[3][6], "");
    }
}
