//! Data Transfer Objects - request types for the web endpoints.

use serde::{Deserialize, Serialize};

/// `?page=` on list endpoints. Kept as text; the paginator decides what a
/// malformed value means.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Form body of the create and edit endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFormRequest {
    pub text: Option<String>,
    /// Group id; empty means no group.
    pub group: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_form_request_fields_are_optional() {
        let req: PostFormRequest = serde_json::from_str("{}").unwrap();
        assert!(req.text.is_none());
        assert!(req.group.is_none());
    }
}
