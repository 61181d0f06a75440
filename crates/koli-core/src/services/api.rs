//! Remote call layer
//!
//! Every operation is exactly one POST:
//!
//! - `{base}/Login` for authentication
//! - `{base}/RunJsonService` for generic named services (lists, details,
//!   barcode lookup), which must answer `success == "true"`
//! - `{base}Ex/CreateShipmentBoxService` for shipment-box tasks, whose
//!   `{success, msg}` verdict is handed back to the caller untouched
//!
//! Secrets are read from the [`CredentialStore`] on every call, so a settings
//! change takes effect on the next request. Nothing is retried.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::config::ClientConfig;
use crate::credentials::{ApiSettings, CredentialStore};
use crate::error::ApiError;
use crate::models::{
    BarcodeLookup, Credentials, CurrentAccount, InventoryItem, KoliDetailItem, KoliItem,
    LoginResponse, OrderReceipt, TaskOutcome,
};
use crate::services::shipment::ShipmentBoxTask;
use crate::services::transport::{HttpTransport, Transport};
use crate::services::wire;
use crate::utils::redact;

/// Shown when a lookup answers `err == 99` without a message
pub const DEFAULT_NOT_FOUND_MSG: &str = "An error occurred";

/// Barcode lookup succeeded but carried no record id
pub const KOLI_NOT_FOUND_MSG: &str = "Koli not found for this barcode";

/// Named services behind `RunJsonService`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceName {
    Accounts,
    Inventory,
    KoliListesi,
    KoliDetay,
    KoliDetayWithBarcode,
    OrderReceipts,
}

impl ServiceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::Accounts => "accounts",
            ServiceName::Inventory => "inventory",
            ServiceName::KoliListesi => "koliListesi",
            ServiceName::KoliDetay => "koliDetay",
            ServiceName::KoliDetayWithBarcode => "koliDetayWithBarcode",
            ServiceName::OrderReceipts => "orderReceipts",
        }
    }

    /// Error message used when the server fails without a `msg`
    pub fn fallback_message(&self) -> &'static str {
        match self {
            ServiceName::Accounts => "Failed to fetch accounts",
            ServiceName::Inventory => "Failed to fetch inventory",
            ServiceName::KoliListesi => "Failed to fetch koli listesi",
            ServiceName::KoliDetay => "Failed to fetch koli detail",
            ServiceName::KoliDetayWithBarcode => "Failed to look up barcode",
            ServiceName::OrderReceipts => "Failed to fetch order receipts",
        }
    }
}

/// The `data` string of a generic service call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    pub name: ServiceName,
    pub id: Option<String>,
    pub barcode: Option<String>,
}

impl ServiceRequest {
    pub fn new(name: ServiceName) -> Self {
        Self {
            name,
            id: None,
            barcode: None,
        }
    }

    pub fn with_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    /// `{"name": ..., "id": ..., "barcode": ...}` encoded as a string
    pub fn encode(&self) -> String {
        let mut data = Map::new();
        data.insert("name".into(), Value::String(self.name.as_str().into()));
        if let Some(id) = &self.id {
            data.insert("id".into(), Value::String(id.clone()));
        }
        if let Some(barcode) = &self.barcode {
            data.insert("barcode".into(), Value::String(barcode.clone()));
        }
        Value::Object(data).to_string()
    }
}

/// Client for the warehouse back-office API
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    credentials: Arc<CredentialStore>,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<CredentialStore>,
        config: ClientConfig,
    ) -> Self {
        Self {
            transport,
            credentials,
            config,
        }
    }

    /// Client over the real network
    pub fn with_http(
        credentials: Arc<CredentialStore>,
        config: ClientConfig,
    ) -> Result<Self, ApiError> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::new(transport, credentials, config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Authenticate a user. The server's verdict is returned as-is; use
    /// [`LoginResponse::is_authenticated`] to decide.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let settings = self.resolve().await?;
        let url = format!("{}/Login", base_url(&settings));

        log::info!("[api:login] Logging in as {}", credentials.user_code);
        let body = json!({
            "userName": credentials.user_code,
            "password": credentials.password,
            "licenseKey": self.config.license_key,
            "companyCode": settings.company_code,
            "companyPassword": settings.company_password,
        });

        let value = self.post(&url, &body).await?;
        let response: LoginResponse = serde_json::from_value(value).map_err(|e| {
            log::warn!("[api:login] Unexpected login response shape: {}", e);
            ApiError::InvalidResponse(e.to_string())
        })?;

        log::info!(
            "[api:login] Response success={} err={:?}",
            response.success,
            response.err
        );
        Ok(response)
    }

    // ========================================================================
    // Generic services
    // ========================================================================

    pub async fn accounts(&self, credentials: &Credentials) -> Result<Vec<CurrentAccount>, ApiError> {
        self.run_service(credentials, &ServiceRequest::new(ServiceName::Accounts))
            .await
    }

    pub async fn inventory(&self, credentials: &Credentials) -> Result<Vec<InventoryItem>, ApiError> {
        self.run_service(credentials, &ServiceRequest::new(ServiceName::Inventory))
            .await
    }

    pub async fn koli_list(&self, credentials: &Credentials) -> Result<Vec<KoliItem>, ApiError> {
        self.run_service(credentials, &ServiceRequest::new(ServiceName::KoliListesi))
            .await
    }

    pub async fn koli_detail(
        &self,
        credentials: &Credentials,
        id: i64,
    ) -> Result<Vec<KoliDetailItem>, ApiError> {
        self.run_service(
            credentials,
            &ServiceRequest::new(ServiceName::KoliDetay).with_id(id),
        )
        .await
    }

    pub async fn order_receipts(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<OrderReceipt>, ApiError> {
        self.run_service(credentials, &ServiceRequest::new(ServiceName::OrderReceipts))
            .await
    }

    /// Resolve a barcode to a koli record id.
    ///
    /// `err == 99` is returned as [`BarcodeLookup::NotFound`], not an error.
    pub async fn lookup_koli_by_barcode(
        &self,
        credentials: &Credentials,
        barcode: &str,
    ) -> Result<BarcodeLookup, ApiError> {
        let request = ServiceRequest::new(ServiceName::KoliDetayWithBarcode).with_barcode(barcode);
        let value = self.run_service_raw(credentials, &request).await?;

        if wire::err_code(&value) == Some(wire::ERR_NOT_FOUND) {
            let message =
                wire::message(&value).unwrap_or_else(|| DEFAULT_NOT_FOUND_MSG.to_string());
            log::info!("[api] Barcode {} not found: {}", barcode, message);
            return Ok(BarcodeLookup::NotFound { message });
        }

        wire::ensure_success(&value, request.name.fallback_message())?;

        match wire::extract_rec_id(&value) {
            Some(rec_id) => Ok(BarcodeLookup::Found { rec_id }),
            None => Err(ApiError::business(KOLI_NOT_FOUND_MSG)),
        }
    }

    /// Run a named service and return its `data.items`
    pub async fn run_service<T: DeserializeOwned>(
        &self,
        credentials: &Credentials,
        request: &ServiceRequest,
    ) -> Result<Vec<T>, ApiError> {
        let value = self.run_service_raw(credentials, request).await?;
        wire::ensure_success(&value, request.name.fallback_message())?;

        let items: Vec<T> = wire::extract_items(&value)?;
        log::debug!(
            "[api] {} returned {} item(s)",
            request.name.as_str(),
            items.len()
        );
        Ok(items)
    }

    async fn run_service_raw(
        &self,
        credentials: &Credentials,
        request: &ServiceRequest,
    ) -> Result<Value, ApiError> {
        let settings = self.resolve().await?;
        let url = format!("{}/RunJsonService", base_url(&settings));

        let mut body = self.auth_fields(&settings, credentials);
        body.insert("data".into(), Value::String(request.encode()));

        log::debug!("[api] Calling service {}", request.name.as_str());
        self.post(&url, &Value::Object(body)).await
    }

    // ========================================================================
    // Shipment-box tasks
    // ========================================================================

    pub async fn add_item_by_barcode(
        &self,
        credentials: &Credentials,
        box_id: i64,
        barcode: &str,
    ) -> Result<TaskOutcome, ApiError> {
        let task = ShipmentBoxTask::AddItemByBarcode {
            box_id,
            barcode: barcode.to_string(),
        };
        self.run_task(credentials, &task).await
    }

    pub async fn create_koli_from_order_receipt(
        &self,
        credentials: &Credentials,
        order_receipt_id: i64,
    ) -> Result<TaskOutcome, ApiError> {
        let task = ShipmentBoxTask::CreateFromOrderReceipt { order_receipt_id };
        self.run_task(credentials, &task).await
    }

    pub async fn create_receipt(
        &self,
        credentials: &Credentials,
        box_id: i64,
    ) -> Result<TaskOutcome, ApiError> {
        let task = ShipmentBoxTask::CreateReceipt { box_id };
        self.run_task(credentials, &task).await
    }

    async fn run_task(
        &self,
        credentials: &Credentials,
        task: &ShipmentBoxTask,
    ) -> Result<TaskOutcome, ApiError> {
        let settings = self.resolve().await?;
        // No slash: the task endpoint is a sibling service of the base path
        let url = format!("{}Ex/CreateShipmentBoxService", base_url(&settings));

        let data = serde_json::to_string(&task.payload())
            .map_err(|e| ApiError::Encode(e.to_string()))?;

        let mut body = Map::new();
        body.insert("data".into(), Value::String(data));
        body.extend(self.auth_fields(&settings, credentials));
        body.insert("logout".into(), Value::Bool(true));

        log::info!("[api] Running task {}", task.label());
        let value = self.post(&url, &Value::Object(body)).await?;

        let result_box_id = if task.returns_box_id() {
            wire::extract_result_box_id(&value)
        } else {
            None
        };

        let outcome = TaskOutcome {
            success: wire::success_flag(&value),
            msg: wire::message(&value).unwrap_or_default(),
            result_box_id,
        };
        log::info!(
            "[api] Task {} finished success={} resultBoxId={:?}",
            task.label(),
            outcome.success,
            outcome.result_box_id
        );
        Ok(outcome)
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    async fn resolve(&self) -> Result<ApiSettings, ApiError> {
        let settings = self.credentials.get().await;
        if !settings.has_base_url() {
            log::warn!("[api] No API base URL configured");
            return Err(ApiError::MissingBaseUrl);
        }
        Ok(settings)
    }

    fn auth_fields(&self, settings: &ApiSettings, credentials: &Credentials) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("userName".into(), credentials.user_code.clone().into());
        fields.insert("password".into(), credentials.password.clone().into());
        fields.insert("licenseKey".into(), self.config.license_key.clone().into());
        fields.insert("companyCode".into(), settings.company_code.clone().into());
        fields.insert(
            "companyPassword".into(),
            settings.company_password.clone().into(),
        );
        fields
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value, ApiError> {
        log::debug!("[api] POST {} {}", url, redact(body));

        let raw = self.transport.post_json(url, body).await.map_err(|e| {
            log::error!("[api] POST {} failed: {}", url, e);
            e
        })?;

        log::debug!("[api] POST {} -> {}", url, raw.status);
        if !raw.is_success() {
            log::warn!("[api] POST {} returned status {}", url, raw.status);
        }
        wire::parse_body(&raw)
    }
}

fn base_url(settings: &ApiSettings) -> &str {
    settings.api_base_url.trim().trim_end_matches('/')
}
