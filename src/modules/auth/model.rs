use serde::{Deserialize, Deserializer, Serialize, de};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Country {
    Canada,
    India,
    Uk,
    Usa,
}

impl Country {
    pub fn as_str(&self) -> &'static str {
        match self {
            Country::Canada => "CANADA",
            Country::India => "INDIA",
            Country::Uk => "UK",
            Country::Usa => "USA",
        }
    }
}

// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Valid email is required"))]
    pub user_email: String,
    #[serde(deserialize_with = "integral_role")]
    pub user_role: i32,
    pub user_country: Country,
}

/// Accepts any JSON number with an integral value in `i32` range, so `1` and
/// `1.0` name the same role.
fn integral_role<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() == 0.0 && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&value) {
        Ok(value as i32)
    } else {
        Err(de::Error::custom(format!(
            "user_role must be an integer, got {value}"
        )))
    }
}

// Row of the authentication table
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AuthenticationRecord {
    pub user_id: i32,
    pub user_email: String,
    pub user_role: i32,
    pub user_country: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub user_id: i32,
    pub user_email: String,
    pub user_role: i32,
    pub user_country: Option<String>,
    pub firebase_uid: String,
}

impl CreateUserResponse {
    pub fn new(record: AuthenticationRecord, firebase_uid: String) -> Self {
        Self {
            user_id: record.user_id,
            user_email: record.user_email,
            user_role: record.user_role,
            user_country: record.user_country,
            firebase_uid,
        }
    }
}
