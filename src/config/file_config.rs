//! Configuration file support for arxiv-tracker.
//!
//! The file is a JSON object whose keys mirror the command-line options.
//! Every key is optional; environment variables prefixed with
//! `ARXIV_TRACKER_` override the file.
//!
//! # Configuration File Format
//!
//! ```json
//! {
//!   "categories": ["cs.CL", "cs.AI"],
//!   "keywords": ["large language model"],
//!   "keyword_fields": ["title", "abstract"],
//!   "max_results": 20,
//!   "output_dir": "outputs",
//!   "output_formats": ["console", "markdown"],
//!   "history_file": "papers_history.json",
//!   "verify_ssl": true
//! }
//! ```
//!
//! List values in the environment are space separated, e.g.
//! `ARXIV_TRACKER_CATEGORIES="cs.CL cs.LG"`.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use super::{ConfigError, ConfigLayer};

/// Prefix of the environment variables read into the configuration
pub const ENV_PREFIX: &str = "ARXIV_TRACKER";

/// Keys whose environment values are split into lists
const LIST_KEYS: [&str; 4] = ["categories", "keywords", "keyword_fields", "output_formats"];

/// Load the file layer merged with the environment layer.
///
/// `file` names the JSON config and whether it must exist. A required file
/// that is missing or malformed is an error; an optional one that is
/// missing is skipped. `env` replaces the process environment, for tests.
pub fn load_layer(
    file: Option<(&Path, bool)>,
    env: Option<HashMap<String, String>>,
) -> Result<ConfigLayer, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some((path, required)) = file {
        if path.is_file() {
            tracing::debug!("Loading config file {}", path.display());
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Json)
                    .required(true),
            );
        } else if required {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
            });
        }
    }

    let mut environment = config::Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(" ");
    for key in LIST_KEYS {
        environment = environment.with_list_parse_key(key);
    }
    builder = builder.add_source(environment.source(env));

    let layer = builder.build()?.try_deserialize::<ConfigLayer>()?;
    tracing::debug!("Config file and environment layer: {:?}", layer);
    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchField;
    use crate::output::OutputFormat;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn no_env() -> Option<HashMap<String, String>> {
        Some(HashMap::new())
    }

    #[test]
    fn test_config_file_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "categories": ["cs.CL", "cs.AI"],
                "keywords": ["retrieval"],
                "keyword_fields": ["ti", "abs"],
                "max_results": 25,
                "output_formats": ["console", "md", "structured"],
                "verify_ssl": false
            }"#,
        )
        .unwrap();

        let layer = load_layer(Some((&path, true)), no_env()).unwrap();

        assert_eq!(
            layer.categories,
            Some(vec!["cs.CL".to_string(), "cs.AI".to_string()])
        );
        assert_eq!(
            layer.keyword_fields,
            Some(vec![SearchField::Title, SearchField::Abstract])
        );
        assert_eq!(layer.max_results, Some(25));
        assert_eq!(
            layer.output_formats,
            Some(vec![
                OutputFormat::Console,
                OutputFormat::Markdown,
                OutputFormat::Json
            ])
        );
        assert_eq!(layer.verify_ssl, Some(false));
        assert_eq!(layer.history_file, None);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"max_results": 25, "output_dir": "a"}"#).unwrap();

        let env = HashMap::from([
            ("ARXIV_TRACKER_MAX_RESULTS".to_string(), "7".to_string()),
            ("ARXIV_TRACKER_CATEGORIES".to_string(), "cs.CL cs.LG".to_string()),
        ]);
        let layer = load_layer(Some((&path, true)), Some(env)).unwrap();

        assert_eq!(layer.max_results, Some(7));
        assert_eq!(layer.output_dir, Some(PathBuf::from("a")));
        assert_eq!(
            layer.categories,
            Some(vec!["cs.CL".to_string(), "cs.LG".to_string()])
        );
    }

    #[test]
    fn test_required_file_missing() {
        let result = load_layer(Some((Path::new("/nonexistent/config.json"), true)), no_env());
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_optional_file_missing_is_skipped() {
        let layer = load_layer(Some((Path::new("/nonexistent/config.json"), false)), no_env()).unwrap();
        assert_eq!(layer, ConfigLayer::default());
    }

    #[test]
    fn test_config_file_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = load_layer(Some((&path, true)), no_env());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_saved_layer_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let layer = ConfigLayer {
            keywords: Some(vec!["diffusion".into()]),
            keyword_fields: Some(vec![SearchField::All]),
            output_formats: Some(vec![OutputFormat::Csv]),
            ..Default::default()
        };

        layer.save(&path).unwrap();

        assert_eq!(load_layer(Some((&path, true)), no_env()).unwrap(), layer);
    }
}
