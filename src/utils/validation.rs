use crate::utils::error::{EtlError, Result};
use mongodb::options::ConnectionString;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

const MONGODB_SCHEMES: [&str; 2] = ["mongodb", "mongodb+srv"];

pub fn validate_connection_uri(field_name: &str, uri: &str) -> Result<()> {
    if uri.trim().is_empty() {
        return Err(EtlError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    // 錯誤訊息中不可帶出原始 URI，裡面可能有帳號密碼
    let scheme = uri.split_once("://").map(|(scheme, _)| scheme);
    match scheme {
        Some(scheme) if MONGODB_SCHEMES.contains(&scheme) => {}
        Some(scheme) => {
            return Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format!("{}://...", scheme),
                reason: format!(
                    "Unsupported URI scheme. Valid schemes: {}",
                    MONGODB_SCHEMES.join(", ")
                ),
            })
        }
        None => {
            return Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: "<redacted>".to_string(),
                reason: "URI has no scheme".to_string(),
            })
        }
    }

    ConnectionString::parse(uri)
        .map(|_| ())
        .map_err(|e| EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: "<redacted>".to_string(),
            reason: format!("Invalid connection string: {}", e.kind),
        })
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    validate_path(field_name, name)?;

    if name.contains('/') || name.contains('\\') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "File name must not contain path separators".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
