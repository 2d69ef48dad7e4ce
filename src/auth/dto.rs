use serde::{Deserialize, Serialize};

use crate::auth::repo_types::User;

/// Request body for `/api/login` and the split login/register routes.
///
/// Every field is optional at the serde level so a missing email or password
/// is reported by the service as a bad request rather than a decode error.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub language: Option<String>,
    pub field: Option<String>,
}

/// Public projection of a user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub name: Option<String>,
    pub email: String,
    pub language: Option<String>,
    pub field: Option<String>,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            name: u.name,
            email: u.email,
            language: u.language,
            field: u.field,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[test]
    fn user_view_hides_hash_and_id() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            password_hash: "$argon2id$secret".into(),
            name: Some("Ann".into()),
            language: None,
            field: None,
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(UserResponse { user: user.into() }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "user": {"name": "Ann", "email": "a@x.com", "language": null, "field": null}
            })
        );
    }

    #[test]
    fn login_request_tolerates_missing_fields() {
        let req: LoginRequest = serde_json::from_str(r#"{"email": "a@x.com"}"#).unwrap();
        assert_eq!(req.email.as_deref(), Some("a@x.com"));
        assert!(req.password.is_none());
    }
}
