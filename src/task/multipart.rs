use std::path::PathBuf;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};

use crate::error::{EncodingError, MoyaError, MoyaResult};

/// Where the content of a form part comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormDataProvider {
    Data(Bytes),
    File(PathBuf),
}

/// One part of a `multipart/form-data` upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFormData {
    pub provider: FormDataProvider,
    pub name: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

impl MultipartFormData {
    #[must_use]
    pub fn new(provider: FormDataProvider, name: impl Into<String>) -> Self {
        Self {
            provider,
            name: name.into(),
            file_name: None,
            mime_type: None,
        }
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    async fn into_part(self) -> MoyaResult<(String, Part)> {
        let (bytes, default_name) = match self.provider {
            FormDataProvider::Data(data) => (data.to_vec(), None),
            FormDataProvider::File(path) => {
                let bytes = tokio::fs::read(&path).await.map_err(MoyaError::io)?;
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned());
                (bytes, file_name)
            }
        };
        let mut part = Part::bytes(bytes);
        if let Some(file_name) = self.file_name.or(default_name) {
            part = part.file_name(file_name);
        }
        if let Some(mime_type) = self.mime_type {
            part = part.mime_str(&mime_type).map_err(|_err| {
                MoyaError::ParameterEncoding(EncodingError::InvalidMimeType { mime_type })
            })?;
        }
        Ok((self.name, part))
    }
}

pub(crate) async fn build_form(parts: Vec<MultipartFormData>) -> MoyaResult<Form> {
    let mut form = Form::new();
    for body_part in parts {
        let (name, part) = body_part.into_part().await?;
        form = form.part(name, part);
    }
    Ok(form)
}
