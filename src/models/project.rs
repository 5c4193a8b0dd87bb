use serde::{Deserialize, Deserializer, Serialize};

/// One portfolio entry. `images` is display-ordered; the first image is the
/// card thumbnail. `link` is an optional external URL, kept as a plain string
/// ("" = none) so exports stay byte-compatible with hand-edited documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub link: String,
}

/// On-disk shape. Older documents carry a single `image` string instead of
/// the `images` array; both decode to the same record. Normalization happens
/// here and nowhere else.
#[derive(Deserialize)]
struct ProjectOnDisk {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    images: Option<Vec<String>>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

impl<'de> Deserialize<'de> for Project {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = ProjectOnDisk::deserialize(deserializer)?;
        let images = match (raw.images, raw.image) {
            (Some(list), _) => list,
            (None, Some(single)) if !single.is_empty() => vec![single],
            _ => Vec::new(),
        };
        Ok(Project {
            title: raw.title,
            description: raw.description,
            images,
            link: raw.link.unwrap_or_default(),
        })
    }
}

impl Project {
    /// First non-empty image, if any. Renderers fall back to a placeholder.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.iter().map(String::as_str).find(|s| !s.is_empty())
    }

    /// Admin-list excerpt: first 50 characters, ellipsis when truncated.
    pub fn short_description(&self) -> String {
        let total = self.description.chars().count();
        if total <= 50 {
            return self.description.clone();
        }
        let head: String = self.description.chars().take(50).collect();
        format!("{}...", head)
    }

    pub fn decode_list(data: &str) -> Result<Vec<Project>, serde_json::Error> {
        serde_json::from_str(data)
    }

    pub fn encode_list(projects: &[Project]) -> String {
        serde_json::to_string(projects).unwrap_or_else(|_| "[]".to_string())
    }

    /// Pretty form (2-space indent) used for the export artifact.
    pub fn encode_list_pretty(projects: &[Project]) -> String {
        serde_json::to_string_pretty(projects).unwrap_or_else(|_| "[]".to_string())
    }
}
