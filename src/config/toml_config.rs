use crate::domain::model::{OutputFormat, Subject};
use crate::utils::error::{Result, TaggerError};
use crate::utils::validation::{validate_path, validate_positive_number, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub tagger: TaggerSection,
    /// Inline vocabulary, `"phrase" = "Concept"`.
    pub keywords: Option<toml::Table>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaggerSection {
    pub subject: Option<Subject>,
    pub input_dir: Option<String>,
    pub output_dir: Option<String>,
    pub format: Option<OutputFormat>,
    pub workers: Option<usize>,
    pub keywords_file: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// 以自訂查詢函式解析 ${VAR}
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = Self::substitute_vars(content, lookup)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換變數 (例如 ${DATA_DIR})，未定義的變數保持原樣
    fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TaggerError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.tagger.input_dir {
            validate_path("tagger.input_dir", dir)?;
        }
        if let Some(dir) = &self.tagger.output_dir {
            validate_path("tagger.output_dir", dir)?;
        }
        if let Some(file) = &self.tagger.keywords_file {
            validate_path("tagger.keywords_file", file)?;
        }
        if let Some(workers) = self.tagger.workers {
            validate_positive_number("tagger.workers", workers, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[tagger]
subject = "ancient_history"
input_dir = "./questions"
output_dir = "./out"
format = "json"
workers = 3

[keywords]
"pharaoh" = "Ancient Egypt"
"senate" = "Ancient Rome"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.tagger.subject, Some(Subject::AncientHistory));
        assert_eq!(config.tagger.input_dir.as_deref(), Some("./questions"));
        assert_eq!(config.tagger.format, Some(OutputFormat::Json));
        assert_eq!(config.tagger.workers, Some(3));
        assert_eq!(config.keywords.as_ref().map(|k| k.len()), Some(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.tagger.subject.is_none());
        assert!(config.keywords.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_variable_substitution() {
        let vars: HashMap<&str, &str> = [("DATA_DIR", "/srv/questions")].into_iter().collect();

        let config = TomlConfig::from_toml_str_with(
            r#"
[tagger]
input_dir = "${DATA_DIR}"
output_dir = "${UNSET_DIR}"
"#,
            |name| vars.get(name).map(|v| v.to_string()),
        )
        .unwrap();

        assert_eq!(config.tagger.input_dir.as_deref(), Some("/srv/questions"));
        assert_eq!(config.tagger.output_dir.as_deref(), Some("${UNSET_DIR}"));
    }

    #[test]
    fn test_unknown_subject_is_rejected() {
        let err = TomlConfig::from_toml_str("[tagger]\nsubject = \"chemistry\"\n").unwrap_err();
        assert!(matches!(err, TaggerError::TomlError(_)));
    }

    #[test]
    fn test_zero_workers_fails_validation() {
        let config = TomlConfig::from_toml_str("[tagger]\nworkers = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[tagger]\nsubject = \"physics\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.tagger.subject, Some(Subject::Physics));
    }
}
