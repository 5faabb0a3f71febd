//! Export and import of the whole site document.
//!
//! An export is the document verbatim, pretty-printed, meant to replace the
//! bundled baseline file on the server. Imports are checked here before they
//! ever reach a store.

use chrono::NaiveDate;
use serde_json::Value;

use crate::document::SiteDocument;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("not valid JSON: {0}")]
    Json(serde_json::Error),
    #[error("expected a JSON object at the top level")]
    NotAnObject,
    #[error("missing section: {0}")]
    MissingSection(&'static str),
    #[error("malformed document: {0}")]
    Shape(serde_json::Error),
}

/// Top-level sections an import must carry, with the accepted spellings.
const REQUIRED_SECTIONS: &[(&str, &[&str])] = &[
    ("categories", &["categories"]),
    ("heroSection", &["heroSection", "hero"]),
    ("contact", &["contact"]),
];

pub fn export_file_name(date: NaiveDate) -> String {
    format!("data-{}.json", date.format("%Y-%m-%d"))
}

pub fn to_pretty_json(document: &SiteDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

/// Parses an import payload, rejecting it unless every required section is
/// present and non-null.
pub fn parse_import(text: &str) -> Result<SiteDocument, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Json)?;
    validate_sections(&value)?;
    serde_json::from_value(value).map_err(ImportError::Shape)
}

pub fn validate_sections(value: &Value) -> Result<(), ImportError> {
    let object = value.as_object().ok_or(ImportError::NotAnObject)?;
    for (section, spellings) in REQUIRED_SECTIONS {
        let present = spellings
            .iter()
            .any(|key| object.get(*key).is_some_and(|value| !value.is_null()));
        if !present {
            return Err(ImportError::MissingSection(*section));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "data-2026-03-07.json");
    }

    #[test]
    fn pretty_json_is_indented() {
        let json = to_pretty_json(&SiteDocument::fallback()).unwrap();
        assert!(json.starts_with("{\n  \"heroSection\": {"));
    }

    #[test]
    fn missing_contact_is_rejected() {
        let result = parse_import(r#"{"heroSection":{"title":"T"},"categories":[]}"#);
        assert!(matches!(result, Err(ImportError::MissingSection("contact"))));
    }

    #[test]
    fn null_section_is_rejected() {
        let result = parse_import(r#"{"heroSection":{},"categories":null,"contact":{}}"#);
        assert!(matches!(
            result,
            Err(ImportError::MissingSection("categories"))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(parse_import("{not json"), Err(ImportError::Json(_))));
        assert!(matches!(parse_import("[]"), Err(ImportError::NotAnObject)));
    }

    #[test]
    fn hero_alias_is_accepted() {
        let document =
            parse_import(r#"{"hero":{"title":"T"},"categories":[],"contact":{"phone":"01"}}"#)
                .unwrap();
        assert_eq!(document.hero_section.title, "T");
        assert_eq!(document.contact.phone, "01");
        assert!(document.services.is_empty());
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let result = parse_import(r#"{"heroSection":{},"categories":"x","contact":{}}"#);
        assert!(matches!(result, Err(ImportError::Shape(_))));
    }
}
