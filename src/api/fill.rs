//! Presentation fill endpoint.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::metrics::FillMetrics;
use crate::server::AppState;
use crate::template::{fill_presentation, Mapping};

pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

pub const FILL_ID_HEADER: &str = "x-fill-id";

/// Raw form fields of a fill request
#[derive(Debug, Default)]
struct FillForm {
    template: Option<Bytes>,
    data: Option<Bytes>,
    json_text: Option<String>,
}

impl FillForm {
    async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Multipart(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "template" => form.template = Some(read_bytes(field).await?),
                "data" => form.data = Some(read_bytes(field).await?),
                "json_text" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::Multipart(e.to_string()))?;
                    form.json_text = Some(text);
                }
                _ => tracing::debug!(field = %name, "Ignoring unknown form field"),
            }
        }
        Ok(form)
    }

    /// Split into template bytes and mapping JSON, checking that exactly
    /// one mapping source was sent
    fn into_parts(self) -> Result<(Bytes, Bytes)> {
        let template = self
            .template
            .ok_or_else(|| AppError::MissingField("Missing form field: template".to_string()))?;

        let json = match (self.data, self.json_text) {
            (Some(data), None) => data,
            (None, Some(text)) => Bytes::from(text),
            (None, None) => {
                return Err(AppError::MissingField(
                    "One of the form fields data or json_text is required".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(AppError::MissingField(
                    "Send either data or json_text, not both".to_string(),
                ))
            }
        };
        Ok((template, json))
    }
}

async fn read_bytes(field: axum::extract::multipart::Field<'_>) -> Result<Bytes> {
    field
        .bytes()
        .await
        .map_err(|e| AppError::Multipart(e.to_string()))
}

/// POST /fill - Fill a presentation template with a JSON mapping
pub async fn fill(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    let fill_id = Uuid::new_v4();
    let result = fill_request(&state, fill_id, multipart).await;

    if let Err(e) = &result {
        if e.status().is_client_error() {
            FillMetrics::record_client_error();
        } else {
            FillMetrics::record_server_error();
        }
    }
    result
}

#[tracing::instrument(skip_all, fields(fill_id = %fill_id))]
async fn fill_request(
    state: &AppState,
    fill_id: Uuid,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    let multipart = multipart.map_err(|e| AppError::Multipart(e.body_text()))?;
    let (template, json) = FillForm::read(multipart).await?.into_parts()?;
    let mapping = Mapping::from_json_slice(&json)?;

    tracing::debug!(
        template_bytes = template.len(),
        keys = mapping.len(),
        "Fill request accepted"
    );

    let options = state.fill_options.clone();
    let started = Instant::now();
    let filled =
        tokio::task::spawn_blocking(move || fill_presentation(&template, &mapping, &options))
            .await
            .map_err(|e| AppError::Internal(format!("Fill task failed: {}", e)))??;
    let elapsed = started.elapsed();

    FillMetrics::record_success(&filled.report, elapsed);
    tracing::info!(
        slides = filled.report.slides,
        slides_modified = filled.report.slides_modified,
        tokens_replaced = filled.report.tokens_replaced,
        tables_rebuilt = filled.report.tables_rebuilt(),
        markers_unresolved = filled.report.markers_unresolved,
        quality_table_extended = filled.report.quality_table.is_some(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Presentation filled"
    );

    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.settings.fill.output_filename
    );
    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static(PPTX_CONTENT_TYPE)),
        (
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition)
                .map_err(|e| AppError::Internal(format!("Invalid output filename: {}", e)))?,
        ),
        (
            HeaderName::from_static(FILL_ID_HEADER),
            HeaderValue::from_str(&fill_id.to_string())
                .map_err(|e| AppError::Internal(e.to_string()))?,
        ),
    ];

    Ok((StatusCode::OK, headers, filled.bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(template: bool, data: bool, json_text: bool) -> FillForm {
        FillForm {
            template: template.then(|| Bytes::from_static(b"PK")),
            data: data.then(|| Bytes::from_static(b"{}")),
            json_text: json_text.then(|| "{\"a\": 1}".to_string()),
        }
    }

    #[test]
    fn test_into_parts_prefers_single_source() {
        let (_, json) = form(true, false, true).into_parts().unwrap();
        assert_eq!(&json[..], b"{\"a\": 1}");

        let (_, json) = form(true, true, false).into_parts().unwrap();
        assert_eq!(&json[..], b"{}");
    }

    #[test]
    fn test_into_parts_missing_fields() {
        for form in [
            form(false, true, false),
            form(true, false, false),
            form(true, true, true),
        ] {
            assert!(matches!(form.into_parts(), Err(AppError::MissingField(_))));
        }
    }
}
