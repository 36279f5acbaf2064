#![forbid(unsafe_code)]

use crate::common::{validate_opt_text, validate_text};
use crate::{ContractViolation, SchemaVersion, Validate};

pub const GALLERY_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

pub const GALLERY_TITLE_MAX_LEN: usize = 128;
pub const GALLERY_DESCRIPTION_MAX_LEN: usize = 1_024;
pub const GALLERY_IMAGE_URL_MAX_LEN: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GalleryItemId(pub u64);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    CustomOrders,
    PortraitArt,
    PencilSketch,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::PencilSketch,
        Category::PortraitArt,
        Category::CustomOrders,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::CustomOrders => "customOrders",
            Category::PortraitArt => "portraitArt",
            Category::PencilSketch => "pencilSketch",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::CustomOrders => "Custom Orders",
            Category::PortraitArt => "Portrait Art",
            Category::PencilSketch => "Pencil Sketch",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItemInput {
    pub schema_version: SchemaVersion,
    pub title: String,
    pub category: Category,
    pub description: String,
    pub image_url: String,
}

impl GalleryItemInput {
    pub fn v1(
        title: String,
        category: Category,
        description: String,
        image_url: String,
    ) -> Result<Self, ContractViolation> {
        let input = Self {
            schema_version: GALLERY_CONTRACT_VERSION,
            title,
            category,
            description,
            image_url,
        };
        input.validate()?;
        Ok(input)
    }
}

impl Validate for GalleryItemInput {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text(
            "gallery_item_input.title",
            &self.title,
            GALLERY_TITLE_MAX_LEN,
        )?;
        validate_opt_text(
            "gallery_item_input.description",
            &self.description,
            GALLERY_DESCRIPTION_MAX_LEN,
        )?;
        validate_text(
            "gallery_item_input.image_url",
            &self.image_url,
            GALLERY_IMAGE_URL_MAX_LEN,
        )?;
        if self.image_url.chars().any(char::is_whitespace) {
            return Err(ContractViolation::InvalidValue {
                field: "gallery_item_input.image_url",
                reason: "must not contain whitespace",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItemRecord {
    pub schema_version: SchemaVersion,
    pub gallery_item_id: GalleryItemId,
    pub title: String,
    pub category: Category,
    pub description: String,
    pub image_url: String,
}

impl GalleryItemRecord {
    pub fn from_input_v1(
        gallery_item_id: GalleryItemId,
        input: GalleryItemInput,
    ) -> Result<Self, ContractViolation> {
        input.validate()?;
        Ok(Self {
            schema_version: GALLERY_CONTRACT_VERSION,
            gallery_item_id,
            title: input.title,
            category: input.category,
            description: input.description,
            image_url: input.image_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_gallery_01_category_wire_names_roundtrip() {
        for c in Category::ALL {
            assert_eq!(Category::parse(c.as_str()), Some(c));
        }
        assert_eq!(Category::parse("watercolour"), None);
        assert_eq!(Category::PencilSketch.label(), "Pencil Sketch");
    }

    #[test]
    fn at_gallery_02_image_url_required() {
        let out = GalleryItemInput::v1(
            "Bridal Radiance".to_string(),
            Category::CustomOrders,
            String::new(),
            " ".to_string(),
        );
        assert!(out.is_err());

        let ok = GalleryItemInput::v1(
            "Bridal Radiance".to_string(),
            Category::CustomOrders,
            String::new(),
            "/assets/bridal.jpg".to_string(),
        );
        assert!(ok.is_ok());
    }
}
