//! Data models for the warehouse back-office client

pub mod lenient;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The end-user's login pair, echoed into every data call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub user_code: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user_code: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_code: user_code.into(),
            password: password.into(),
        }
    }
}

/// Authenticated user, derived from the login response plus the submitted credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: i64,
    pub code: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub admin: bool,
    pub user_name: String,
    pub password: String,
    #[serde(default)]
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn from_login(response: &LoginResponse, credentials: &Credentials) -> Self {
        Self {
            uid: response.uid,
            code: response.code.clone(),
            email: response.email.clone(),
            first_name: response.first_name.clone(),
            last_name: response.last_name.clone(),
            company_name: response.company_name.clone(),
            admin: response.admin,
            user_name: credentials.user_code.clone(),
            password: credentials.password.clone(),
            logged_in_at: Some(Utc::now()),
        }
    }

    /// Credentials to reuse for data calls after a restore
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.user_name, &self.password)
    }

    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.user_name.clone()
        } else {
            name.to_string()
        }
    }
}

/// `{id, code, name}` references embedded in the login response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default, deserialize_with = "lenient::i64_or_zero")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
}

/// Response of `POST {base}/Login`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub success: String,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub err: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub msg: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub token: String,
    #[serde(default, deserialize_with = "lenient::i64_or_zero")]
    pub uid: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub company_name: String,
    #[serde(default, deserialize_with = "lenient::bool_or_false")]
    pub admin: bool,
    #[serde(default, deserialize_with = "lenient::string")]
    pub ticket: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub employee_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub resource_id: Option<i64>,
    #[serde(default)]
    pub dept: Option<NamedRef>,
    #[serde(default)]
    pub wh: Option<NamedRef>,
}

impl LoginResponse {
    /// `success == "true"` AND `err == 0`
    pub fn is_authenticated(&self) -> bool {
        self.success == "true" && self.err == Some(0)
    }
}

/// Current account ("cari") row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrentAccount {
    #[serde(default, deserialize_with = "lenient::string")]
    pub current_account_code: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub current_account_name: String,
}

/// Inventory row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InventoryItem {
    #[serde(default, deserialize_with = "lenient::string")]
    pub inventory_code: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub inventory_name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub thumbnail: Option<String>,
}

/// Shipment package ("koli") row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KoliItem {
    #[serde(default, deserialize_with = "lenient::i64_or_zero")]
    pub id: i64,
    #[serde(rename = "PackageNo", default, deserialize_with = "lenient::string")]
    pub package_no: String,
    #[serde(rename = "Explanation", default, deserialize_with = "lenient::string")]
    pub explanation: String,
}

/// One inventory line inside a koli
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KoliDetailItem {
    #[serde(default, deserialize_with = "lenient::string")]
    pub inventory_name: String,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub thumbnail: Option<String>,
}

/// Order receipt that can be converted into a koli
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderReceipt {
    #[serde(default, deserialize_with = "lenient::i64_or_zero")]
    pub rec_id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub receipt_no: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub current_account_name: String,
}

/// Normalized result of a `CreateShipmentBoxService` call.
///
/// The server's verdict is passed through untouched; callers decide what
/// `success != "true"` means for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOutcome {
    pub success: String,
    pub msg: String,
    pub result_box_id: Option<i64>,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.success == "true"
    }
}

/// Result of resolving a barcode to a koli record id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BarcodeLookup {
    Found { rec_id: i64 },
    /// `err == 99`: displayable message, not an exception
    NotFound { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_json() -> &'static str {
        r#"{
            "success": "true", "err": 0, "msg": "", "token": "abc", "uid": 1,
            "code": "U1", "email": null, "firstName": "Ayşe", "lastName": "Yılmaz",
            "companyName": "Depo A.Ş.", "admin": false, "ticket": "t-1",
            "dept": {"id": 3, "code": "D", "name": "Sevkiyat"},
            "privs": [{"logical": 1}], "menu": []
        }"#
    }

    #[test]
    fn test_login_response_parses_and_ignores_unknown_fields() {
        let resp: LoginResponse = serde_json::from_str(login_json()).unwrap();
        assert!(resp.is_authenticated());
        assert_eq!(resp.token, "abc");
        assert_eq!(resp.email, None);
        assert_eq!(resp.dept.unwrap().name, "Sevkiyat");
    }

    #[test]
    fn test_login_requires_err_zero() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"success": "true", "err": 5, "msg": "locked"}"#).unwrap();
        assert!(!resp.is_authenticated());

        let missing_err: LoginResponse =
            serde_json::from_str(r#"{"success": "true"}"#).unwrap();
        assert!(!missing_err.is_authenticated());
    }

    #[test]
    fn test_user_from_login_uses_submitted_credentials() {
        let resp: LoginResponse = serde_json::from_str(login_json()).unwrap();
        let user = User::from_login(&resp, &Credentials::new("u1", "p1"));

        assert_eq!(user.uid, 1);
        assert_eq!(user.user_name, "u1");
        assert_eq!(user.credentials(), Credentials::new("u1", "p1"));
        assert_eq!(user.display_name(), "Ayşe Yılmaz");
        assert!(user.logged_in_at.is_some());
    }

    #[test]
    fn test_user_record_json_roundtrip_keeps_camel_case() {
        let resp: LoginResponse = serde_json::from_str(login_json()).unwrap();
        let user = User::from_login(&resp, &Credentials::new("u1", "p1"));
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["userName"], "u1");
        assert_eq!(json["companyName"], "Depo A.Ş.");

        // Records written without a timestamp still load
        let legacy = r#"{"uid":1,"code":"U1","email":null,"firstName":"A","lastName":"B",
            "companyName":"C","admin":true,"userName":"u1","password":"p1"}"#;
        let user: User = serde_json::from_str(legacy).unwrap();
        assert!(user.logged_in_at.is_none());
    }

    #[test]
    fn test_item_rows_tolerate_loose_types() {
        let koli: KoliItem =
            serde_json::from_str(r#"{"id": "17", "PackageNo": "PK-17", "Explanation": null}"#)
                .unwrap();
        assert_eq!(koli.id, 17);
        assert_eq!(koli.explanation, "");

        let line: KoliDetailItem =
            serde_json::from_str(r#"{"InventoryName": "Vida", "Quantity": "2.5"}"#).unwrap();
        assert_eq!(line.quantity, 2.5);
        assert_eq!(line.thumbnail, None);

        let receipt: OrderReceipt = serde_json::from_str(
            r#"{"RecId": 9, "ReceiptNo": "SP-9", "CurrentAccountName": "Mağaza"}"#,
        )
        .unwrap();
        assert_eq!(receipt.rec_id, 9);
    }
}
