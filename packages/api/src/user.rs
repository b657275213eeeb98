//! Users: `GET users`.

use flatfile_core::{AccountId, Decode, Decoded, Path, Record, UserId};
use serde::Serialize;
use serde_json::Value;

/// A user belonging to the authenticated account.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub account_id: AccountId,
}

impl Decode for User {
    fn shape() -> String {
        "User".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "User")?;
        let id = record.required("id");
        let name = record.required("name");
        let email = record.required("email");
        let account_id = record.required("accountId");
        record.finish(|| {
            Some(User {
                id: id?,
                name: name?,
                email: email?,
                account_id: account_id?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatfile_core::decode;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "id": "us_usr_a1b2c3d4",
            "name": "Ada",
            "email": "ada@example.com",
            "accountId": "us_acc_z9y8x7w6"
        })
    }

    #[test]
    fn decodes_and_roundtrips() {
        let user: User = decode(&sample()).unwrap();
        assert_eq!(user.id.as_str(), "us_usr_a1b2c3d4");
        let back: User = decode(&serde_json::to_value(&user).unwrap()).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn swapped_identifiers_rejected() {
        let mut json = sample();
        json["accountId"] = json!("us_usr_a1b2c3d4");
        let err = decode::<User>(&json).unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert!(err.has_failure_at("accountId"));
        assert_eq!(err.failures()[0].expected, "AccountId");
    }
}
