use serde::{Deserialize, Serialize};

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// A cake as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CakeResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
}

/// Wrapper for the cake listing endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CakesResponse {
    pub cakes: Vec<CakeResponse>,
}

/// Payload for `POST /cakes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCakeRequest {
    pub title: String,
    pub description: String,
}

/// Payload for `PUT /cakes/:id`; replaces both fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCakeRequest {
    pub title: String,
    pub description: String,
}

impl CakeResponse {
    pub fn new(id: i64, title: impl Into<String>, description: impl Into<String>) -> Self {
        CakeResponse {
            id,
            title: title.into(),
            description: description.into(),
        }
    }
}

impl CakesResponse {
    pub fn new(cakes: Vec<CakeResponse>) -> Self {
        CakesResponse { cakes }
    }

    pub fn len(&self) -> usize {
        self.cakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cakes.is_empty()
    }
}

impl CreateCakeRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        CreateCakeRequest {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Validate the create cake request
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.title, &self.description)
    }

    /// Copy of the request with surrounding whitespace removed
    pub fn normalized(self) -> Self {
        CreateCakeRequest {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}

impl UpdateCakeRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        UpdateCakeRequest {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Validate the update cake request
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.title, &self.description)
    }

    pub fn normalized(self) -> Self {
        UpdateCakeRequest {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}

fn validate_fields(title: &str, description: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title cannot be empty".to_string());
    }

    if title.trim().chars().count() > MAX_TITLE_LENGTH {
        return Err(format!("Title cannot exceed {} characters", MAX_TITLE_LENGTH));
    }

    if description.trim().chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "Description cannot exceed {} characters",
            MAX_DESCRIPTION_LENGTH
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cake_response_serialization() {
        let cake = CakeResponse::new(1, "Mock Cake", "Moke Cake Description");

        let json = serde_json::to_string(&cake).expect("Failed to serialize cake");
        let expected = r#"{"id":1,"title":"Mock Cake","description":"Moke Cake Description"}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_cakes_response_serialization() {
        let cakes = CakesResponse::new(vec![CakeResponse::new(1, "Mock Cake", "Moke Cake Description")]);

        let json = serde_json::to_string(&cakes).expect("Failed to serialize cakes");
        let expected = r#"{"cakes":[{"id":1,"title":"Mock Cake","description":"Moke Cake Description"}]}"#;
        assert_eq!(json, expected);

        let empty = serde_json::to_string(&CakesResponse::default()).unwrap();
        assert_eq!(empty, r#"{"cakes":[]}"#);
    }

    #[test]
    fn test_create_cake_request_deserialization() {
        let json = r#"{"title":"New Cake","description":"New Cake Description"}"#;
        let request: CreateCakeRequest =
            serde_json::from_str(json).expect("Failed to deserialize CreateCakeRequest");

        assert_eq!(request, CreateCakeRequest::new("New Cake", "New Cake Description"));
    }

    #[test]
    fn test_create_cake_request_requires_both_fields() {
        let missing_description = r#"{"title":"New Cake"}"#;
        assert!(serde_json::from_str::<CreateCakeRequest>(missing_description).is_err());

        let missing_title = r#"{"description":"New Cake Description"}"#;
        assert!(serde_json::from_str::<UpdateCakeRequest>(missing_title).is_err());
    }

    #[test]
    fn test_create_cake_request_validation() {
        assert!(CreateCakeRequest::new("Cheesecake", "Baked").validate().is_ok());

        // Empty description is allowed
        assert!(CreateCakeRequest::new("Cheesecake", "").validate().is_ok());

        assert!(CreateCakeRequest::new("", "Baked").validate().is_err());
        assert!(CreateCakeRequest::new("   ", "Baked").validate().is_err());
        assert!(CreateCakeRequest::new("a".repeat(201), "Baked").validate().is_err());
        assert!(CreateCakeRequest::new("Cheesecake", "a".repeat(2001)).validate().is_err());
    }

    #[test]
    fn test_title_limit_counts_characters() {
        let title = "ケ".repeat(MAX_TITLE_LENGTH);
        assert!(UpdateCakeRequest::new(title, "").validate().is_ok());
    }

    #[test]
    fn test_update_cake_request_validation() {
        assert!(UpdateCakeRequest::new("Updated Cake", "Updated Description").validate().is_ok());
        assert!(UpdateCakeRequest::new(" ", "Updated Description").validate().is_err());
    }

    #[test]
    fn test_request_normalization() {
        let request = CreateCakeRequest::new("  Carrot Cake ", "\tWith walnuts\n").normalized();
        assert_eq!(request.title, "Carrot Cake");
        assert_eq!(request.description, "With walnuts");

        let request = UpdateCakeRequest::new(" Lemon ", " Tart ").normalized();
        assert_eq!(request, UpdateCakeRequest::new("Lemon", "Tart"));
    }
}
