use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Resolve relative paths against the working directory and require a regular file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.exists() {
        return Err(format!("Input file not found: {}", resolved.display()).into());
    }
    if !resolved.is_file() {
        return Err(format!("Input path is not a file: {}", resolved.display()).into());
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortgage_calc_core::{FormField, RawLoanForm};
    use std::io::Write;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mortgage-cli-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_read_form_file() {
        let path = temp_path("form.json");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"{{"mortgageAmount": 250000, "mortgageTerm": "20", "interestRate": 4.5, "mortgageType": "repayment"}}"#
        )
        .unwrap();

        let form: RawLoanForm = read_json(path.to_str().unwrap()).unwrap();
        assert_eq!(
            form.get(FormField::MortgageTerm).map(|v| v.as_text().into_owned()),
            Some("20".to_string())
        );
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_reported() {
        let path = temp_path("absent.json");
        let err = read_json::<RawLoanForm>(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("Input file not found"));
    }

    #[test]
    fn test_malformed_json_reported() {
        let path = temp_path("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = read_json::<RawLoanForm>(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse"));
        fs::remove_file(&path).unwrap();
    }
}
