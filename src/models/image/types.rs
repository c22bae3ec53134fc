use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who owns an uploaded image. Ownership is exclusive: a freshly uploaded
/// image is Unowned, then belongs to either a pending submission (via the
/// link table) or a business idea (direct reference), never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOwner {
    Unowned,
    Submission(i64),
    BusinessIdea(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum VariantKind {
    Thumbnail,
    Medium,
    Full,
}

impl VariantKind {
    pub const ALL: [VariantKind; 3] = [VariantKind::Thumbnail, VariantKind::Medium, VariantKind::Full];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKind::Thumbnail => "THUMBNAIL",
            VariantKind::Medium => "MEDIUM",
            VariantKind::Full => "FULL",
        }
    }

    /// Bounding box the variant is scaled to fit within. Full keeps the
    /// original dimensions.
    pub fn max_dimensions(&self) -> Option<(u32, u32)> {
        match self {
            VariantKind::Thumbnail => Some((200, 200)),
            VariantKind::Medium => Some((800, 800)),
            VariantKind::Full => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: i64,
    pub original_filename: String,
    pub content_type: String,
    #[serde(skip_serializing)]
    pub business_idea_id: Option<i64>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ImageVariant {
    pub id: i64,
    pub image_id: i64,
    pub kind: VariantKind,
    pub storage_path: String,
    pub width: i64,
    pub height: i64,
    pub size: i64,
}

#[derive(Debug, Clone)]
pub struct NewVariant {
    pub kind: VariantKind,
    pub storage_path: String,
    pub width: i64,
    pub height: i64,
    pub size: i64,
}

/// Image plus its derived variants, as returned by the upload endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageWithVariants {
    #[serde(flatten)]
    pub image: Image,
    pub variants: Vec<ImageVariant>,
}
