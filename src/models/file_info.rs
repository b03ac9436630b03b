use derive_builder::Builder;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::ruler::Entity;

#[derive(Debug, Builder, Serialize)]
#[builder(build_fn(skip))]
pub struct FileInfo {
    pub name: String,
    pub base_name: String,
    pub extension: String,
    pub path: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    #[builder(default)]
    pub mime_type: Option<String>,
    pub size: u64,
    #[builder(default)]
    pub is_text: bool,
    #[builder(default)]
    pub entity_labels: Vec<String>,
    #[builder(default)]
    pub entities: Vec<Entity>,
    #[builder(default)]
    pub scan_errors: Vec<String>,
}

impl FileInfoBuilder {
    pub fn build(&self) -> Result<FileInfo, String> {
        Ok(FileInfo::new(
            self.name.clone().ok_or("Missing field: name")?,
            self.base_name.clone().ok_or("Missing field: base_name")?,
            self.extension.clone().ok_or("Missing field: extension")?,
            self.path.clone().ok_or("Missing field: path")?,
            self.file_type.clone().ok_or("Missing field: file_type")?,
            self.mime_type.clone().flatten(),
            self.size.ok_or("Missing field: size")?,
            self.is_text.unwrap_or_default(),
            self.entities.clone().unwrap_or_default(),
            self.scan_errors.clone().unwrap_or_default(),
        ))
    }
}

impl FileInfo {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        base_name: String,
        extension: String,
        path: String,
        file_type: FileType,
        mime_type: Option<String>,
        size: u64,
        is_text: bool,
        entities: Vec<Entity>,
        scan_errors: Vec<String>,
    ) -> Self {
        // Labels are always derived from the entities, never set directly.
        let entity_labels = entities
            .iter()
            .map(|entity| entity.label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        FileInfo {
            name,
            base_name,
            extension,
            path,
            file_type,
            mime_type,
            size,
            is_text,
            entity_labels,
            entities,
            scan_errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
}

impl Serialize for FileType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let value = match self {
            FileType::File => "file",
            FileType::Directory => "directory",
        };
        serializer.serialize_str(value)
    }
}
