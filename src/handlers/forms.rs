//! Multipart form collection for the upload-bearing endpoints.
//!
//! Listing create/update and profile update all arrive as multipart
//! forms: text fields plus zero or more files per file category. This
//! module drains the stream once, stores accepted files through the
//! [`FileStore`], and hands the handler a simple lookup structure with
//! per-field validation helpers.

use axum::extract::multipart::{Multipart, MultipartError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::ApiError;
use crate::infrastructure::FileStore;

fn bad_multipart(err: MultipartError) -> ApiError {
    // ---
    ApiError::Validation(format!("malformed multipart request: {err}"))
}

/// Text fields and stored file references collected from one request.
///
/// Fields not named in `file_categories` are read as text; unknown text
/// fields are collected but only ever consulted through the allow-listed
/// accessors, so they cannot reach a stored document.
#[derive(Debug, Default)]
pub struct UploadForm {
    // ---
    fields: HashMap<String, String>,
    files: HashMap<String, Vec<String>>,
}

impl UploadForm {
    // ---

    /// Drain the multipart stream, storing files as they appear.
    ///
    /// Files are written before field validation runs, the same order the
    /// upload middleware imposed historically; a rejected file (wrong
    /// type, too large) fails the whole request.
    pub async fn collect(
        store: &FileStore,
        mut multipart: Multipart,
        file_categories: &[&str],
    ) -> Result<Self, ApiError> {
        // ---
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if file_categories.contains(&name.as_str()) {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field.content_type().map(str::to_owned);
                let data = field.bytes().await.map_err(bad_multipart)?;

                // Browsers submit an empty part for untouched file inputs.
                if data.is_empty() && file_name.as_deref().unwrap_or_default().is_empty() {
                    continue;
                }

                let reference = store
                    .save_image(file_name.as_deref(), content_type.as_deref(), &data)
                    .await?;
                form.files.entry(name).or_default().push(reference);
            } else {
                let value = field.text().await.map_err(bad_multipart)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// A text field, with empty submissions treated as absent.
    pub fn text(&self, key: &str) -> Option<&str> {
        // ---
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// A required text field.
    pub fn require_text(&self, key: &str, label: &str) -> Result<String, ApiError> {
        // ---
        self.text(key)
            .map(str::to_owned)
            .ok_or_else(|| ApiError::Validation(format!("{label} is required.")))
    }

    /// A required numeric field; the error names the field.
    pub fn require_number<T: FromStr>(&self, key: &str, label: &str) -> Result<T, ApiError> {
        // ---
        self.text(key)
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| {
                ApiError::Validation(format!("{label} is required and must be a valid number."))
            })
    }

    /// A numeric field that may be absent, but must parse when present.
    pub fn optional_number<T: FromStr>(
        &self,
        key: &str,
        label: &str,
    ) -> Result<Option<T>, ApiError> {
        // ---
        match self.text(key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
                ApiError::Validation(format!("{label} must be a valid number."))
            }),
        }
    }

    /// An RFC 3339 timestamp field that may be absent.
    pub fn optional_datetime(
        &self,
        key: &str,
        label: &str,
    ) -> Result<Option<DateTime<Utc>>, ApiError> {
        // ---
        match self.text(key) {
            None => Ok(None),
            Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|_| {
                    ApiError::Validation(format!("{label} must be an RFC 3339 timestamp."))
                }),
        }
    }

    /// Stored references for a file category, if any files were uploaded.
    pub fn take_files(&mut self, category: &str) -> Option<Vec<String>> {
        // ---
        self.files.remove(category).filter(|refs| !refs.is_empty())
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn form_with(fields: &[(&str, &str)]) -> UploadForm {
        // ---
        UploadForm {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }

    #[test]
    fn empty_text_counts_as_missing() {
        // ---
        let form = form_with(&[("brand", "  "), ("model", "CB350")]);

        assert_eq!(form.text("brand"), None);
        assert_eq!(form.text("model"), Some("CB350"));
        assert!(form.require_text("brand", "Brand").is_err());
    }

    #[test]
    fn numeric_errors_name_the_field() {
        // ---
        let form = form_with(&[("price", "fifty grand")]);

        let err = form.require_number::<i64>("price", "Price").unwrap_err();
        assert!(err.to_string().contains("Price"));

        let err = form
            .require_number::<u32>("ownersCount", "Number of owners")
            .unwrap_err();
        assert!(err.to_string().contains("Number of owners"));
    }

    #[test]
    fn optional_number_distinguishes_absent_from_malformed() {
        // ---
        let form = form_with(&[("modelYear", "twenty twenty")]);

        assert_eq!(
            form.optional_number::<i64>("price", "Price").unwrap(),
            None
        );
        assert!(form
            .optional_number::<i32>("modelYear", "Model year")
            .is_err());
    }

    #[test]
    fn datetime_parses_rfc3339() {
        // ---
        let form = form_with(&[("postedOn", "2024-06-01T10:00:00Z"), ("bad", "last tuesday")]);

        let parsed = form.optional_datetime("postedOn", "Posted on").unwrap();
        assert!(parsed.is_some());
        assert!(form.optional_datetime("bad", "Posted on").is_err());
        assert_eq!(
            form.optional_datetime("missing", "Posted on").unwrap(),
            None
        );
    }
}
