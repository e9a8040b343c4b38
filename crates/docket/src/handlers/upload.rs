//! multipart form parsing for record endpoints
//!
//! record create/update requests arrive as `multipart/form-data` with
//! text fields plus at most one `document` file part. this module
//! flattens a request into a field map and the single uploaded-file
//! descriptor the services take.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::attachments::UploadedFile;

use super::ApiError;

/// name of the file part on record upload forms.
pub const FILE_FIELD: &str = "document";

/// fallback original filename when the client omits one.
const DEFAULT_FILENAME: &str = "document.pdf";

/// a parsed multipart form: text fields plus an optional file.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    /// the uploaded `document` part, if any.
    pub file: Option<UploadedFile>,
}

impl FormData {
    /// drain a multipart request into a form-data map.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == FILE_FIELD {
                let file_name = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .unwrap_or(DEFAULT_FILENAME)
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("failed to read uploaded file: {}", e))
                })?;
                // an empty file part means "no file", matching html
                // forms submitted without a selection
                if !data.is_empty() {
                    form.file = Some(UploadedFile {
                        name: file_name,
                        content_type,
                        data,
                    });
                }
            } else {
                let value = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("invalid form field '{}': {}", name, e))
                })?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// take a text field. empty strings count as absent, matching the
    /// original forms where untouched inputs submit as "".
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name).filter(|v| !v.is_empty())
    }

    /// take a numeric id field.
    pub fn take_id(&mut self, name: &str) -> Result<Option<u64>, ApiError> {
        match self.take(name) {
            None => Ok(None),
            Some(value) => value
                .parse::<u64>()
                .map(Some)
                .map_err(|_| ApiError::bad_request(format!("invalid {}: {:?}", name, value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(fields: &[(&str, &str)]) -> FormData {
        FormData {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            file: None,
        }
    }

    #[test]
    fn test_take_treats_empty_as_absent() {
        let mut form = form_with(&[("title", "Order A"), ("description", "")]);
        assert_eq!(form.take("title").as_deref(), Some("Order A"));
        assert_eq!(form.take("description"), None);
        assert_eq!(form.take("missing"), None);
    }

    #[test]
    fn test_take_id() {
        let mut form = form_with(&[("report_id", "42"), ("bad", "abc"), ("blank", "")]);
        assert_eq!(form.take_id("report_id").unwrap(), Some(42));
        assert_eq!(form.take_id("blank").unwrap(), None);
        assert!(form.take_id("bad").is_err());
    }
}
