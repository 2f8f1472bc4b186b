//! Material-not-issued XML source.
//!
//! The export is a flat list of `Results` elements; a job has a material
//! shortage when any of its rows reports a required quantity greater than
//! the issued quantity.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use crate::enrich::join_key;

#[derive(Error, Debug)]
pub enum MaterialError {
    #[error("Failed to read material file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse material XML: {0}")]
    Parse(#[from] quick_xml::Error),
}

#[derive(Default)]
struct ResultAcc {
    job: String,
    required: f64,
    issued: f64,
}

#[derive(Clone, Copy)]
enum Field {
    Job,
    Required,
    Issued,
}

/// Reads the XML export and returns the normalized join keys of all jobs
/// with a shortage.
pub fn read_shortages(path: &Path) -> Result<HashSet<String>, MaterialError> {
    let content = std::fs::read_to_string(path).map_err(|e| MaterialError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    shortages_from_str(&content)
}

pub fn shortages_from_str(xml: &str) -> Result<HashSet<String>, MaterialError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut shortages = HashSet::new();
    let mut current: Option<ResultAcc> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"Results" => current = Some(ResultAcc::default()),
                b"JobMtl_JobNum" => field = Some(Field::Job),
                b"JobMtl_RequiredQty" => field = Some(Field::Required),
                b"JobMtl_IssuedQty" => field = Some(Field::Issued),
                _ => field = None,
            },
            Event::Text(t) => {
                if let (Some(acc), Some(f)) = (current.as_mut(), field) {
                    let decoded = t.decode().unwrap_or_default();
                    let text = quick_xml::escape::unescape(&decoded)
                        .map(|c| c.into_owned())
                        .unwrap_or_else(|_| decoded.into_owned());
                    match f {
                        Field::Job => acc.job = text.trim().to_string(),
                        Field::Required => acc.required = parse_qty(&text),
                        Field::Issued => acc.issued = parse_qty(&text),
                    }
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"Results" {
                    if let Some(acc) = current.take() {
                        if !acc.job.is_empty() && acc.required > acc.issued {
                            shortages.insert(join_key(&acc.job));
                        }
                    }
                }
                field = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(shortages)
}

fn parse_qty(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<Report>
  <Results>
    <JobMtl_JobNum>J1</JobMtl_JobNum>
    <JobMtl_PartNum>P-1</JobMtl_PartNum>
    <JobMtl_RequiredQty>5</JobMtl_RequiredQty>
    <JobMtl_IssuedQty>3</JobMtl_IssuedQty>
  </Results>
  <Results>
    <JobMtl_JobNum>J2</JobMtl_JobNum>
    <JobMtl_RequiredQty>4</JobMtl_RequiredQty>
    <JobMtl_IssuedQty>4</JobMtl_IssuedQty>
  </Results>
  <Results>
    <JobMtl_JobNum>j3</JobMtl_JobNum>
    <JobMtl_RequiredQty>2</JobMtl_RequiredQty>
    <JobMtl_IssuedQty>0</JobMtl_IssuedQty>
  </Results>
</Report>"#;

    #[test]
    fn test_shortage_when_required_exceeds_issued() {
        let shortages = shortages_from_str(SAMPLE).unwrap();
        assert!(shortages.contains("J1"));
        assert!(!shortages.contains("J2"));
    }

    #[test]
    fn test_job_keys_are_normalized() {
        let shortages = shortages_from_str(SAMPLE).unwrap();
        assert!(shortages.contains("J3"));
    }

    #[test]
    fn test_missing_quantities_default_to_zero() {
        let xml = "<R><Results><JobMtl_JobNum>J9</JobMtl_JobNum></Results></R>";
        let shortages = shortages_from_str(xml).unwrap();
        assert!(shortages.is_empty());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(shortages_from_str("<Results><unclosed>").is_err());
    }
}
