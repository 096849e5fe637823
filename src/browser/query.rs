use crate::interfaces::resources::{ListParams, ListingScope};
use serde::{Deserialize, Serialize};

/// Whose resources the list is restricted to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum OwnerScope {
    /// Resources owned by the signed-in user.
    Mine,
    /// Resources the signed-in user owns or that were shared with them.
    Shared,
    Owner(i64),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase", default)]
pub struct Filters {
    pub owner: Option<OwnerScope>,
    pub is_public: Option<bool>,
    /// Empty means no text filter.
    pub search: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    Id,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn to_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Id => "id",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn to_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase", default)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

/// Everything that determines which page the backend returns. Two equal
/// states always describe the same request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    pub skip: u64,
    pub limit: u32,
    pub filters: Filters,
    pub sort: Sort,
}

impl QueryState {
    pub fn new(limit: u32) -> Self {
        Self {
            skip: 0,
            limit: limit.max(1),
            filters: Filters::default(),
            sort: Sort::default(),
        }
    }

    /// 1-based page the current `skip` lands on.
    pub fn page(&self) -> u32 {
        let page = self.skip / u64::from(self.limit.max(1)) + 1;
        u32::try_from(page).unwrap_or(u32::MAX)
    }

    pub fn to_list_params(&self, current_user_id: i64) -> ListParams {
        let (scope, owner_id) = match self.filters.owner {
            None => (ListingScope::Collection, None),
            Some(OwnerScope::Mine) => (ListingScope::Collection, Some(current_user_id)),
            Some(OwnerScope::Owner(owner_id)) => (ListingScope::Collection, Some(owner_id)),
            // The backend has no "shared only" filter; its own-or-shared
            // listing is the closest it offers.
            Some(OwnerScope::Shared) => (ListingScope::Accessible, None),
        };
        let search = self.filters.search.trim();

        ListParams {
            scope,
            skip: self.skip,
            limit: self.limit,
            owner_id,
            is_public: self.filters.is_public,
            search: (!search.is_empty()).then(|| search.to_owned()),
            sort_by: Some(self.sort.field.to_str()),
            sort_order: Some(self.sort.order.to_str()),
        }
    }
}
