use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Status given to complaints submitted without one.
pub const DEFAULT_STATUS: &str = "pending";

/// `userType` of field agents.
pub const AGENT_TYPE: &str = "Agent";

/// `userType` values that denote citizens.
pub const ORDINARY_TYPES: [&str; 2] = ["Ordinary", "User"];

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub phone: i64,
    pub user_type: String,
    pub district: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub state: String,
    pub pincode: i64,
    pub comment: String,
    pub status: String,
    pub file: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssignedComplaint {
    #[serde(rename = "_id")]
    pub id: String,
    pub agent_id: String,
    pub complaint_id: String,
    pub status: String,
    pub agent_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub message: String,
    pub complaint_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: i64,
    pub user_type: String,
    pub district: Option<String>,
}

#[derive(Debug, Default)]
pub struct UserProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<i64>,
}

#[derive(Debug)]
pub struct NewComplaint {
    pub user_id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub state: String,
    pub pincode: i64,
    pub comment: String,
    pub status: String,
    pub file: Option<String>,
}

#[derive(Debug)]
pub struct NewAssignment {
    pub agent_id: String,
    pub complaint_id: String,
    pub status: String,
    pub agent_name: String,
}

#[derive(Debug)]
pub struct NewMessage {
    pub name: String,
    pub message: String,
    pub complaint_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOrder {
    NewestFirst,
    OldestFirst,
}

/// Accepts an integer given either as a JSON number or as a digit string.
pub fn int_or_string<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Phone {
        #[serde(default, deserialize_with = "int_or_string")]
        phone: Option<i64>,
    }

    #[test]
    fn phone_accepts_numbers_and_digit_strings() {
        let n: Phone = serde_json::from_str(r#"{"phone": 9876543210}"#).unwrap();
        let s: Phone = serde_json::from_str(r#"{"phone": "9876543210"}"#).unwrap();
        assert_eq!(n.phone, Some(9876543210));
        assert_eq!(s.phone, Some(9876543210));
    }

    #[test]
    fn phone_blank_or_missing_is_none() {
        let blank: Phone = serde_json::from_str(r#"{"phone": ""}"#).unwrap();
        let missing: Phone = serde_json::from_str("{}").unwrap();
        assert_eq!(blank.phone, None);
        assert_eq!(missing.phone, None);
    }

    #[test]
    fn phone_rejects_words() {
        assert!(serde_json::from_str::<Phone>(r#"{"phone": "call me"}"#).is_err());
    }

    #[test]
    fn password_is_never_serialized() {
        let now = Utc::now();
        let user = User {
            id: "u1".into(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            password: "hunter2".into(),
            phone: 1,
            user_type: "Ordinary".into(),
            district: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["_id"], "u1");
        assert_eq!(json["userType"], "Ordinary");
    }
}
