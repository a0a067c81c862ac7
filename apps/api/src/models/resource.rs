use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::text_enum;
use crate::catalog::filter::Facetable;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Article,
    Video,
    Course,
    Template,
    Guide,
}

text_enum!(ResourceType {
    Article => "article",
    Video => "video",
    Course => "course",
    Template => "template",
    Guide => "guide",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResourceRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub resource_type: String,
    pub url: String,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Facetable for ResourceRow {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        if let Some(author) = &self.author {
            fields.push(author);
        }
        fields
    }

    fn kind(&self) -> &str {
        &self.resource_type
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::filter::{build_listing, ListingQuery};

    fn resource(title: &str, description: &str, author: Option<&str>) -> ResourceRow {
        ResourceRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            resource_type: "article".to_string(),
            url: "https://example.org/r".to_string(),
            tags: vec!["career".to_string()],
            author: author.map(str::to_string),
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn titles_matching(resources: &[ResourceRow], search: &str) -> Vec<String> {
        let query = ListingQuery {
            search: Some(search.to_string()),
            ..Default::default()
        };
        build_listing(resources, &query)
            .unwrap()
            .page
            .items
            .iter()
            .map(|r| r.title.clone())
            .collect()
    }

    #[test]
    fn test_search_matches_author() {
        let resources = vec![
            resource("Interview prep", "Common questions", Some("Wanjiru Kamau")),
            resource("CV basics", "One page is enough", None),
        ];
        assert_eq!(titles_matching(&resources, "kamau"), vec!["Interview prep"]);
        assert_eq!(titles_matching(&resources, "one page"), vec!["CV basics"]);
        assert_eq!(titles_matching(&resources, "cv"), vec!["CV basics"]);
    }

    #[test]
    fn test_missing_author_is_not_searched() {
        let r = resource("CV basics", "One page", None);
        assert_eq!(r.search_fields(), vec!["CV basics", "One page"]);
    }
}
