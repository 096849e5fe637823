use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub meta_data: Option<String>,
    pub is_public: bool,
    pub owner_id: i64,
}

/// Lazily parsed view of [`Resource::meta_data`].
#[derive(Debug, Clone, PartialEq)]
pub enum Metadata<'a> {
    Absent,
    Document(Value),
    /// The stored text is not valid JSON and is passed through untouched.
    Opaque(&'a str),
}

impl Resource {
    pub fn metadata(&self) -> Metadata<'_> {
        match self.meta_data.as_deref() {
            None | Some("") => Metadata::Absent,
            Some(raw) => match serde_json::from_str(raw) {
                Ok(document) => Metadata::Document(document),
                Err(_) => Metadata::Opaque(raw),
            },
        }
    }
}

/// A resource as served to the console, with its metadata document
/// pre-parsed when it is well formed.
#[derive(Serialize, Debug, Clone)]
pub struct ResourceDetail {
    #[serde(flatten)]
    pub resource: Resource,
    pub metadata: Option<Value>,
}

impl From<Resource> for ResourceDetail {
    fn from(resource: Resource) -> Self {
        let metadata = match resource.metadata() {
            Metadata::Document(document) => Some(document),
            Metadata::Absent | Metadata::Opaque(_) => None,
        };

        Self { resource, metadata }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatingResource {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatingResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PermissionType {
    Read,
    Write,
    Admin,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceShare {
    pub user_id: i64,
    pub permission_type: PermissionType,
}

/// Which listing endpoint a query goes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingScope {
    /// `GET /resources/`: everything the user may see.
    #[default]
    Collection,
    /// `GET /resources/me`: resources owned by or shared with the user.
    Accessible,
}

/// Query string of a resource listing. Unset predicates are left out of the
/// request entirely.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    #[serde(skip)]
    pub scope: ListingScope,
    pub skip: u64,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(meta_data: Option<&str>) -> Resource {
        Resource {
            id: 1,
            name: "alpha".to_owned(),
            description: None,
            content: None,
            meta_data: meta_data.map(str::to_owned),
            is_public: false,
            owner_id: 7,
        }
    }

    #[test]
    fn malformed_metadata_is_opaque() {
        let resource = resource(Some("{not json"));

        assert_eq!(resource.metadata(), Metadata::Opaque("{not json"));
        assert!(ResourceDetail::from(resource).metadata.is_none());
    }

    #[test]
    fn well_formed_metadata_is_parsed() {
        let resource = resource(Some(r#"{"tier":"gold"}"#));

        assert_eq!(
            resource.metadata(),
            Metadata::Document(serde_json::json!({ "tier": "gold" }))
        );
    }

    #[test]
    fn empty_metadata_is_absent() {
        assert_eq!(resource(Some("")).metadata(), Metadata::Absent);
        assert_eq!(resource(None).metadata(), Metadata::Absent);
    }

    #[test]
    fn list_params_omit_unset_predicates() {
        let params = ListParams {
            scope: ListingScope::Accessible,
            skip: 0,
            limit: 10,
            owner_id: None,
            is_public: None,
            search: None,
            sort_by: Some("name"),
            sort_order: Some("asc"),
        };

        let value = serde_json::to_value(&params).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 4);
        assert!(!object.contains_key("owner_id"));
        assert!(!object.contains_key("search"));
    }
}
