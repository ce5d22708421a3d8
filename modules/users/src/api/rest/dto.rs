use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::contract::model::User;
use crate::domain::error::DomainError;

/// REST representation of a user. The password hash is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub username: Option<String>,
    pub birth: Option<DateTime<Utc>>,
    pub icon: Option<String>,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /users`. Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserReq {
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub birth: Option<Value>,
}

/// Body of `PATCH /users`: the only fields a user may change on their own record.
///
/// Anything else in the payload (`id`, `email`, `password`, `hash`, ...) is
/// dropped during deserialization and never reaches the domain. A key sent as
/// `null` deserializes to `Some(None)`, a missing key to `None`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUserReq {
    #[serde(default, deserialize_with = "nullable")]
    pub username: Option<Option<String>>,
    #[serde(default)]
    pub birth: Option<Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub title: Option<Option<String>>,
}

/// Present keys always land in `Some`, so `null` survives as `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Text of a birth value, or `None` when it is falsy
/// (missing, `null`, `false`, `0` or `""`).
///
/// Other non-string values are rejected as invalid birth dates.
pub fn birth_text(value: Option<&Value>) -> Result<Option<&str>, DomainError> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(other) => Err(DomainError::invalid_birth(other.to_string())),
    }
}

/// Error payload shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            birth: user.birth,
            icon: user.icon,
            title: user.title,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn user_dto_omits_hash() {
        let user = User {
            id: 1,
            email: "a@x.com".into(),
            hash: "$argon2id$secret".into(),
            username: Some("al".into()),
            birth: None,
            icon: None,
            title: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(UserDto::from(user)).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["username"], "al");
        assert!(json["birth"].is_null());
        assert!(json.get("hash").is_none());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn update_req_tells_null_from_missing() {
        let req: UpdateUserReq =
            serde_json::from_str(r#"{"title":null,"icon":"i.png"}"#).unwrap();
        assert_eq!(req.title, Some(None));
        assert_eq!(req.icon, Some(Some("i.png".into())));
        assert_eq!(req.username, None);
    }

    #[test]
    fn falsy_birth_values_carry_no_text() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert_eq!(birth_text(Some(&falsy)).unwrap(), None, "{falsy}");
        }
        assert_eq!(birth_text(None).unwrap(), None);
        assert_eq!(
            birth_text(Some(&json!("2000-01-01"))).unwrap(),
            Some("2000-01-01")
        );
        for truthy in [json!(true), json!(1), json!(["2000"]), json!({})] {
            assert!(
                matches!(birth_text(Some(&truthy)), Err(DomainError::InvalidBirth { .. })),
                "{truthy}"
            );
        }
    }

    #[test]
    fn update_req_drops_forbidden_keys() {
        let req: UpdateUserReq = serde_json::from_str(
            r#"{"username":"bob","id":999,"email":"evil@x.com","password":"p","hash":"h","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(req.username.clone().flatten().as_deref(), Some("bob"));
        assert_eq!(req.birth, None);
        assert_eq!(req.icon, None);
        assert_eq!(req.title, None);
    }

    #[test]
    fn create_req_requires_email_and_password() {
        let ok: CreateUserReq =
            serde_json::from_str(r#"{"password":"p","email":"a@x.com","extra":true}"#).unwrap();
        assert_eq!(ok.birth, None);

        assert!(serde_json::from_str::<CreateUserReq>(r#"{"email":"a@x.com"}"#).is_err());
        assert!(serde_json::from_str::<CreateUserReq>(r#"{"password":"p"}"#).is_err());
    }
}
