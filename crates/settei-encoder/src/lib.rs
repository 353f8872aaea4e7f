//! Canonical-format serializer for settei configuration documents.
//!
//! [`ToConfigText`] is implemented as an extension trait over
//! [`settei_parser::Document`] rather than folding serialization into the
//! parser crate itself, mirroring how a CST and its printer live in
//! separate crates: the tree model has no opinion on how it is rendered,
//! and a consumer that only needs to read documents never pulls in the
//! formatting machinery.

mod error;
mod format;

pub use error::EncodeError;

use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use settei_parser::{Document, Options};
use tracing::warn;

use format::Writer;

pub trait ToConfigText {
    /// Renders the whole document as canonical configuration text.
    fn to_config_string(&self) -> Result<String, EncodeError>;

    /// Renders and writes to `path`, fsyncing first if the document's
    /// [`Options::FSYNC`] bit is set.
    fn write_file(&self, path: impl AsRef<Path>) -> Result<(), EncodeError>;
}

impl ToConfigText for Document {
    fn to_config_string(&self) -> Result<String, EncodeError> {
        let mut writer = Writer::new(self);
        writer.write_document()?;
        Ok(writer.finish())
    }

    fn write_file(&self, path: impl AsRef<Path>) -> Result<(), EncodeError> {
        let path = path.as_ref();
        let text = self.to_config_string()?;
        let mut file = File::create(path).map_err(|source| {
            warn!(path = %path.display(), "failed to create config file");
            EncodeError::Write {
                path: path.to_path_buf(),
                source,
            }
        })?;
        file.write_all(text.as_bytes())
            .map_err(|source| EncodeError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        if self.option(Options::FSYNC) {
            file.sync_all().map_err(|source| EncodeError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn build() -> Document {
        let mut doc = Document::new();
        doc.read_string(
            r#"
            name = "alice";
            age = 30;
            pi = 3.5;
            tags = [ "a", "b" ];
            mixed = ( 1, "two", true );
            server = {
              host = "localhost";
              port = 8080;
            };
            "#,
        )
        .unwrap();
        doc
    }

    #[test]
    fn round_trips_basic_document() {
        let doc = build();
        let text = doc.to_config_string().unwrap();

        let mut reparsed = Document::new();
        reparsed.read_string(&text).unwrap();

        let root = reparsed.root();
        let age = reparsed.get_member(root, "age").unwrap();
        assert_eq!(reparsed.as_int(age), Some(30));
        let server = reparsed.get_member(root, "server").unwrap();
        let host = reparsed.get_member(server, "host").unwrap();
        assert_eq!(reparsed.as_str(host), Some("localhost"));
    }

    #[test]
    fn empty_group_renders_compact() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.add(root, Some("empty"), settei_parser::Kind::Group)
            .unwrap();
        let text = doc.to_config_string().unwrap();
        assert_eq!(text, indoc! {"
            empty = { }
        "});
    }

    #[test]
    fn hex_format_round_trips() {
        let mut doc = Document::new();
        let root = doc.root();
        let id = doc.add(root, Some("mask"), settei_parser::Kind::Int).unwrap();
        doc.set_int(id, 255).unwrap();
        doc.set_format(id, settei_parser::NumFormat::Hex).unwrap();
        let text = doc.to_config_string().unwrap();
        assert!(text.contains("0xFF"));
    }

    #[test]
    fn rejects_non_finite_float() {
        let mut doc = Document::new();
        let root = doc.root();
        let id = doc.add(root, Some("bad"), settei_parser::Kind::Float).unwrap();
        doc.set_float(id, f64::NAN).unwrap();
        assert!(doc.to_config_string().is_err());
    }
}
