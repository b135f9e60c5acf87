//! Multipart form collection for endpoints that accept image uploads.
//!
//! Text parts are kept by name (a trailing `[]` is dropped, so `facilities[]`
//! and `facilities` are the same field). Parts carrying a file name are
//! collected as [`UploadedImage`]s; empty file parts are skipped because
//! browsers send them for untouched file inputs.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use serde_json::json;

use crate::error::AppError;
use crate::infrastructure::storage::{ImageStore, UploadedImage};

fn malformed(e: MultipartError) -> AppError {
    AppError::bad_request(
        "Malformed multipart body",
        json!({ "reason": e.body_text() }),
    )
}

#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, Vec<String>>,
    pub images: Vec<UploadedImage>,
}

impl MultipartForm {
    /// Reads every part of `multipart`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for malformed bodies or more than
    /// `max_images` files.
    pub async fn collect(mut multipart: Multipart, max_images: usize) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field
                .name()
                .unwrap_or_default()
                .trim_end_matches("[]")
                .to_string();

            if field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(malformed)?;
                if bytes.is_empty() {
                    continue;
                }
                if form.images.len() >= max_images {
                    return Err(AppError::bad_request(
                        "Too many images",
                        json!({ "limit": max_images }),
                    ));
                }
                form.images.push(UploadedImage {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field.text().await.map_err(malformed)?;
                form.fields.entry(name).or_default().push(value);
            }
        }

        Ok(form)
    }

    /// Stores the collected images in order and returns their URLs.
    ///
    /// # Errors
    ///
    /// Returns the first storage failure; images stored before it are kept.
    pub async fn store_images(&mut self, store: &dyn ImageStore) -> Result<Vec<String>, AppError> {
        let mut urls = Vec::with_capacity(self.images.len());
        for image in std::mem::take(&mut self.images) {
            urls.push(store.store(image).await?);
        }
        Ok(urls)
    }

    /// Adds a text value; used to build forms outside of a request.
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    /// First non-blank value of `name`, trimmed.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).and_then(|values| {
            values
                .iter()
                .map(|v| v.trim())
                .find(|v| !v.is_empty())
                .map(str::to_string)
        })
    }

    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when the field is missing or blank.
    pub fn required(&self, name: &str) -> Result<String, AppError> {
        self.text(name)
            .ok_or_else(|| AppError::bad_request("Missing form field", json!({ "field": name })))
    }

    /// Every non-blank value of a repeated field.
    pub fn list(&self, name: &str) -> Vec<String> {
        self.fields
            .get(name)
            .map(|values| {
                values
                    .iter()
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Parses an optional field.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the value does not parse.
    pub fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, AppError> {
        self.text(name)
            .map(|raw| {
                raw.parse().map_err(|_| {
                    AppError::bad_request(
                        "Invalid form field",
                        json!({ "field": name, "value": raw }),
                    )
                })
            })
            .transpose()
    }

    /// Parses a required field.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the value is missing or does not parse.
    pub fn parse_required<T: FromStr>(&self, name: &str) -> Result<T, AppError> {
        self.parse(name)?
            .ok_or_else(|| AppError::bad_request("Missing form field", json!({ "field": name })))
    }

    /// Checkbox-style flag: `true`/`on`/`1` are true, `false`/`off`/`0` false.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for any other value.
    pub fn flag(&self, name: &str) -> Result<Option<bool>, AppError> {
        match self.text(name).map(|v| v.to_lowercase()).as_deref() {
            None => Ok(None),
            Some("true" | "on" | "1") => Ok(Some(true)),
            Some("false" | "off" | "0") => Ok(Some(false)),
            Some(other) => Err(AppError::bad_request(
                "Invalid form field",
                json!({ "field": name, "value": other }),
            )),
        }
    }
}
