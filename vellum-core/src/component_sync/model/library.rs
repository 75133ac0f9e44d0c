/*
    library.rs - Library assets and the workspace snapshot

    A file carries four asset mappings (colors, typographies, components,
    media). The workspace snapshot is the engine's whole world: the local
    file's data plus the data of every linked library file, keyed by file
    id. Asset references with a None file id resolve against the local
    file.
*/

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::container::{Component, Container, Page};
use super::content::ContentNode;
use super::types::{
    AssetKind, ColorId, ComponentId, FileId, Gradient, MediaId, PageId, TypographyId,
};

/// A reusable color (solid, gradient, opacity) stored in a library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAsset {
    pub id: ColorId,
    pub name: String,
    pub color: Option<String>,
    pub opacity: Option<f64>,
    pub gradient: Option<Gradient>,
}

/// A reusable set of font attributes stored in a library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    pub id: TypographyId,
    pub name: String,
    pub font_id: Option<String>,
    pub font_family: Option<String>,
    pub font_variant_id: Option<String>,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub line_height: Option<String>,
    pub letter_spacing: Option<String>,
    pub text_transform: Option<String>,
}

impl Typography {
    /// Merge every typography field except name and id into a text node
    pub fn apply_to_node(&self, node: &mut ContentNode) {
        node.font_id = self.font_id.clone();
        node.font_family = self.font_family.clone();
        node.font_variant_id = self.font_variant_id.clone();
        node.font_size = self.font_size.clone();
        node.font_weight = self.font_weight.clone();
        node.font_style = self.font_style.clone();
        node.line_height = self.line_height.clone();
        node.letter_spacing = self.letter_spacing.clone();
        node.text_transform = self.text_transform.clone();
    }
}

/// An uploaded image stored in a library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: MediaId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub mtype: String,
}

/// The content of one file: its pages and its library assets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FileData {
    /// Page ids in user order
    pub pages: Vec<PageId>,
    pub pages_index: BTreeMap<PageId, Page>,
    pub components: BTreeMap<ComponentId, Component>,
    pub colors: BTreeMap<ColorId, ColorAsset>,
    pub typographies: BTreeMap<TypographyId, Typography>,
    pub media: BTreeMap<MediaId, MediaAsset>,
}

impl FileData {
    pub fn get_page(&self, id: &PageId) -> Option<&Page> {
        self.pages_index.get(id)
    }

    pub fn get_component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.get(id)
    }

    /// True when the asset map for the given kind has no entries
    pub fn assets_empty(&self, kind: AssetKind) -> bool {
        match kind {
            AssetKind::Components => self.components.is_empty(),
            AssetKind::Colors => self.colors.is_empty(),
            AssetKind::Typographies => self.typographies.is_empty(),
            AssetKind::Media => self.media.is_empty(),
        }
    }
}

/// A linked library file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub id: FileId,
    pub name: String,
    pub data: FileData,
}

/// Immutable snapshot of the workspace the engine runs against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorkspaceSnapshot {
    /// The local file's data
    pub data: FileData,
    /// Linked libraries by file id
    pub libraries: BTreeMap<FileId, LibraryEntry>,
}

impl WorkspaceSnapshot {
    /// Data of the given library; None selects the local file
    pub fn library_data(&self, file_id: Option<&FileId>) -> Option<&FileData> {
        match file_id {
            None => Some(&self.data),
            Some(id) => self.libraries.get(id).map(|entry| &entry.data),
        }
    }

    /// Resolve a component, treating a None file as the local library
    pub fn get_component(
        &self,
        component_id: &ComponentId,
        component_file: Option<&FileId>,
    ) -> Option<&Component> {
        self.library_data(component_file).and_then(|data| data.get_component(component_id))
    }

    /// The container named by exactly one of page-id / component-id,
    /// always within the local file
    pub fn get_container(
        &self,
        page_id: Option<&PageId>,
        component_id: Option<&ComponentId>,
    ) -> Option<Container<'_>> {
        match (page_id, component_id) {
            (Some(page_id), None) => self.data.get_page(page_id).map(Container::Page),
            (None, Some(component_id)) => {
                self.data.get_component(component_id).map(Container::Component)
            }
            _ => None,
        }
    }
}
