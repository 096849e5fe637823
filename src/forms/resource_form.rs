use super::ValidationError;
use crate::interfaces::resources::{CreatingResource, UpdatingResource};
use serde::Deserialize;

/// The create/edit form as submitted by the browser. On create, blank
/// optional fields are treated as not filled in; on edit, a field sent blank
/// clears the stored value and a field left out keeps it.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub meta_data: Option<String>,
    pub is_public: Option<bool>,
}

impl ResourceForm {
    pub fn into_creating(self) -> Result<CreatingResource, ValidationError> {
        let name = match filled(self.name) {
            Some(name) => name,
            None => return Err(ValidationError::new("name", "name is required")),
        };

        Ok(CreatingResource {
            name,
            description: filled(self.description),
            content: filled(self.content),
            meta_data: validate_meta_data(self.meta_data)?,
            is_public: self.is_public.unwrap_or(false),
        })
    }

    pub fn into_updating(self) -> Result<UpdatingResource, ValidationError> {
        let name = match self.name {
            Some(name) if name.trim().is_empty() => {
                return Err(ValidationError::new("name", "name must not be blank"));
            }
            name => name,
        };

        let meta_data = match self.meta_data {
            Some(meta_data) if meta_data.trim().is_empty() => Some(String::new()),
            meta_data => validate_meta_data(meta_data)?,
        };

        Ok(UpdatingResource {
            name,
            description: cleared(self.description),
            content: cleared(self.content),
            meta_data,
            is_public: self.is_public,
        })
    }
}

fn filled(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn cleared(value: Option<String>) -> Option<String> {
    value.map(|value| {
        if value.trim().is_empty() {
            String::new()
        } else {
            value
        }
    })
}

fn validate_meta_data(meta_data: Option<String>) -> Result<Option<String>, ValidationError> {
    let Some(meta_data) = filled(meta_data) else {
        return Ok(None);
    };

    match serde_json::from_str::<serde_json::Value>(&meta_data) {
        Ok(_) => Ok(Some(meta_data)),
        Err(err) => Err(ValidationError::new(
            "metaData",
            format!("metadata must be valid JSON ({err})"),
        )),
    }
}
