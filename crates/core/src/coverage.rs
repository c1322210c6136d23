//! Coverage reporting
//!
//! After a build, the coverage report named in the project configuration is parsed
//! and its percentage printed. A missing report never affects the build; an
//! unknown parser name is a configuration mistake and fails the run.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::configs::CoverageSettings;
use crate::output::OutputSink;
use crate::types::{FriggError, FriggResult};

/// Extracts a coverage percentage from the text of a report
pub trait CoverageParser {
    fn name(&self) -> &'static str;
    fn parse(&self, report: &str) -> FriggResult<f64>;
}

/// Cobertura XML, as written by coverage.py: root `line-rate` attribute
pub struct CoberturaParser;

/// Clover XML: project level `coveredstatements / statements`
pub struct CloverParser;

/// LCOV tracefiles: summed `LH` over summed `LF`
pub struct LcovParser;

impl CoverageParser for CoberturaParser {
    fn name(&self) -> &'static str {
        "cobertura"
    }

    fn parse(&self, report: &str) -> FriggResult<f64> {
        let mut reader = Reader::from_str(report);
        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"coverage" => {
                    let rate = numeric_attribute(&e, "line-rate")?;
                    return Ok(rate * 100.0);
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Err(FriggError::Coverage(
            "no <coverage> element in report".to_string(),
        ))
    }
}

impl CoverageParser for CloverParser {
    fn name(&self) -> &'static str {
        "clover"
    }

    fn parse(&self, report: &str) -> FriggResult<f64> {
        let mut reader = Reader::from_str(report);
        let mut depth = 0usize;
        let mut project_depth = None;

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(e) => {
                    if e.name().as_ref() == b"project" {
                        project_depth = Some(depth);
                    } else if is_project_metrics(&e, depth, project_depth) {
                        return clover_percentage(&e);
                    }
                    depth += 1;
                }
                Event::Empty(e) if is_project_metrics(&e, depth, project_depth) => {
                    return clover_percentage(&e);
                }
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Eof => break,
                _ => {}
            }
        }
        Err(FriggError::Coverage(
            "no project <metrics> element in report".to_string(),
        ))
    }
}

impl CoverageParser for LcovParser {
    fn name(&self) -> &'static str {
        "lcov"
    }

    fn parse(&self, report: &str) -> FriggResult<f64> {
        let mut hit = 0u64;
        let mut found = 0u64;
        for line in report.lines().map(str::trim) {
            if let Some(value) = line.strip_prefix("LH:") {
                hit += parse_count(value)?;
            } else if let Some(value) = line.strip_prefix("LF:") {
                found += parse_count(value)?;
            }
        }
        if found == 0 {
            return Err(FriggError::Coverage(
                "report contains no instrumented lines".to_string(),
            ));
        }
        Ok(hit as f64 / found as f64 * 100.0)
    }
}

/// Look up a parser by the name used in the `coverage.parser` setting
pub fn parser_for(name: &str) -> Option<Box<dyn CoverageParser>> {
    match name.to_ascii_lowercase().as_str() {
        "cobertura" | "python" => Some(Box::new(CoberturaParser)),
        "clover" | "php" => Some(Box::new(CloverParser)),
        "lcov" => Some(Box::new(LcovParser)),
        _ => None,
    }
}

/// Parse a report with the named parser
pub fn parse_coverage(report: &str, parser_name: &str) -> FriggResult<f64> {
    let parser = parser_for(parser_name).ok_or_else(|| {
        FriggError::Coverage(format!("unknown coverage parser '{}'", parser_name))
    })?;
    parser.parse(report)
}

pub struct CoverageReporter<'a> {
    sink: &'a OutputSink,
}

impl<'a> CoverageReporter<'a> {
    pub fn new(sink: &'a OutputSink) -> Self {
        Self { sink }
    }

    /// Print the coverage percentage for the configured report.
    ///
    /// Returns `Ok(None)` when coverage is not configured, the report file does not
    /// exist, or the report cannot be read or parsed. Only an unknown parser name
    /// is an error.
    pub fn report(
        &self,
        settings: Option<&CoverageSettings>,
        working_directory: &Path,
    ) -> FriggResult<Option<f64>> {
        let Some(settings) = settings else {
            return Ok(None);
        };

        let report_path = working_directory.join(&settings.path);
        if !report_path.is_file() {
            tracing::debug!("No coverage report at {}", report_path.display());
            return Ok(None);
        }

        let parser = parser_for(&settings.parser).ok_or_else(|| {
            FriggError::Coverage(format!(
                "unknown coverage parser '{}' in configuration",
                settings.parser
            ))
        })?;

        let parsed = std::fs::read_to_string(&report_path)
            .map_err(FriggError::from)
            .and_then(|report| parser.parse(&report));

        match parsed {
            Ok(percentage) => {
                self.sink.coverage(percentage);
                Ok(Some(percentage))
            }
            Err(e) => {
                self.sink.error(format!(
                    "Could not read {} coverage report {}: {}",
                    parser.name(),
                    report_path.display(),
                    e
                ));
                Ok(None)
            }
        }
    }
}

fn is_project_metrics(e: &BytesStart, depth: usize, project_depth: Option<usize>) -> bool {
    e.name().as_ref() == b"metrics" && project_depth.is_some_and(|d| depth == d + 1)
}

fn clover_percentage(e: &BytesStart) -> FriggResult<f64> {
    let statements = numeric_attribute(e, "statements")?;
    let covered = numeric_attribute(e, "coveredstatements")?;
    if statements == 0.0 {
        return Err(FriggError::Coverage(
            "report contains no statements".to_string(),
        ));
    }
    Ok(covered / statements * 100.0)
}

fn numeric_attribute(e: &BytesStart, name: &str) -> FriggResult<f64> {
    let attribute = e
        .try_get_attribute(name)
        .map_err(|err| FriggError::Coverage(format!("invalid attribute: {}", err)))?
        .ok_or_else(|| FriggError::Coverage(format!("missing '{}' attribute", name)))?;

    std::str::from_utf8(&attribute.value)
        .ok()
        .and_then(|value| value.trim().parse::<f64>().ok())
        .ok_or_else(|| FriggError::Coverage(format!("'{}' is not a number", name)))
}

fn parse_count(value: &str) -> FriggResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| FriggError::Coverage(format!("invalid line count '{}'", value)))
}

fn xml_error(e: quick_xml::Error) -> FriggError {
    FriggError::Coverage(format!("malformed XML: {}", e))
}
