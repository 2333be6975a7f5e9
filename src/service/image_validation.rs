use crate::error::AppError;

pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10MB
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Pure pre-upload gate: nothing here touches the store, and a rejected file
/// must leave no side effects anywhere.
pub fn validate_image(data: &[u8], filename: &str, content_type: &str) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("File is empty or null".to_string()));
    }

    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::Validation(
            "File size exceeds maximum limit of 10MB".to_string(),
        ));
    }

    if filename.is_empty() {
        return Err(AppError::Validation("Invalid filename".to_string()));
    }

    let extension = file_extension(filename).to_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "File type not allowed. Allowed types: {:?}",
            ALLOWED_EXTENSIONS
        )));
    }

    if !content_type.starts_with("image/") {
        return Err(AppError::Validation("File is not an image".to_string()));
    }

    Ok(())
}

fn file_extension(filename: &str) -> &str {
    filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}
