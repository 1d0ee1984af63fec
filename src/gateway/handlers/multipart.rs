use axum::extract::Multipart;

use crate::catalog::FormData;
use crate::gateway::error::ApiError;

/// Buffer a multipart body. Text parts become fields; the part carrying a
/// file name is kept as the upload.
pub async fn read_form(mut multipart: Multipart) -> Result<FormData, ApiError> {
    let mut form = FormData::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to parse form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read file '{}': {}", name, e))
                })?;
                form.set_file(file_name, bytes.to_vec());
            }
            None => {
                let value = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read field '{}': {}", name, e))
                })?;
                form.insert(name, value);
            }
        }
    }

    Ok(form)
}
