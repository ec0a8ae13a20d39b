use std::path::Path;
use thurgood_core::models::{FormatRequest, FormattedDocument};
use thurgood_core::ClientResult;
use validator::Validate;

use crate::{write_file, ApiClient, RequestSpec, ResponseShape};

impl ApiClient {
    /// Render a document. PDF and DOCX come back as bytes (written to
    /// `save_to` when given), the HTML preview as text.
    pub async fn format_document(
        &self,
        request: &FormatRequest,
        save_to: Option<&Path>,
    ) -> ClientResult<FormattedDocument> {
        request.validate()?;
        let format = request.output_format;
        let shape = if format.is_binary() {
            ResponseShape::Bytes
        } else {
            ResponseShape::Text
        };

        let body = self
            .execute(
                RequestSpec::post("/format/v1/document")
                    .json_body(request)?
                    .expect(shape),
            )
            .await?;

        if !format.is_binary() {
            let html = body.into_text()?;
            if let Some(path) = save_to {
                write_file(path, html.as_bytes()).await?;
                return Ok(FormattedDocument::Saved {
                    format,
                    path: path.to_path_buf(),
                    size_bytes: html.len() as u64,
                });
            }
            return Ok(FormattedDocument::Text { html });
        }

        let bytes = body.into_bytes()?.to_vec();
        let size_bytes = bytes.len() as u64;
        match save_to {
            Some(path) => {
                write_file(path, &bytes).await?;
                Ok(FormattedDocument::Saved {
                    format,
                    path: path.to_path_buf(),
                    size_bytes,
                })
            }
            None => Ok(FormattedDocument::Binary {
                format,
                bytes,
                size_bytes,
            }),
        }
    }
}
