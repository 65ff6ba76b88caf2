//! `.doctrans.toml` configuration

mod core;
mod loader;

pub use self::core::DoctransConfig;
pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_config, read_config,
    CONFIG_FILE_NAME,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::values::{DocstringFormat, FunctionKind};
    use crate::core::DoctransError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config_sections() {
        let config = parse_config(
            r#"
            [emit]
            inline_types = false
            function_type = "cls"

            [parse]
            docstring_format = "google"
            infer_type = true

            [class]
            bases = ["Base"]
            "#,
        )
        .unwrap();
        assert!(!config.emit.inline_types);
        assert_eq!(config.emit.function_type, Some(FunctionKind::ClassMethod));
        assert_eq!(config.parse.docstring_format, Some(DocstringFormat::Google));
        assert!(config.parse.infer_type);
        assert_eq!(config.class.bases, vec!["Base".to_string()]);
        assert_eq!(config.table.metadata_name, "metadata");
    }

    #[test]
    fn test_parse_config_rejects_bad_toml() {
        assert!(matches!(
            parse_config("[emit\ninline_types = 3"),
            Err(DoctransError::Config(_))
        ));
    }

    #[test]
    fn test_directory_ancestors_depth() {
        let dirs: Vec<_> = directory_ancestors("/a/b/c".into(), 2).collect();
        assert_eq!(dirs.len(), 2);
        assert!(dirs[1].ends_with("b"));
    }

    #[test]
    fn test_load_config_searches_ancestors() {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[emit]\nemit_default_doc = false\n",
        )
        .unwrap();
        let nested = root.path().join("pkg").join("sub");
        fs::create_dir_all(&nested).unwrap();
        assert!(!load_config_from(nested).emit.emit_default_doc);
    }

    #[test]
    fn test_invalid_explicit_config_falls_back_to_defaults() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("broken.toml");
        fs::write(&path, "emit = 5").unwrap();
        assert_eq!(load_config(Some(&path)), DoctransConfig::default());
    }
}
