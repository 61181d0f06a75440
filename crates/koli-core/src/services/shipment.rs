//! CreateShipmentBoxService task payloads
//!
//! One endpoint, three operations told apart by `serviceType`. The payload is
//! serialized to a JSON string and sent as the `data` field of the request.

use serde_json::{json, Value};

const SPECIAL_CODE_FIELD: &str = "SpecialCode";
const SPECIAL_CODE_VALUE: &str = "fromExt";

/// Inventory receipt type written when a koli is turned into a receipt
const RECEIPT_TYPE_SHIPMENT: i64 = 120;
const RECEIPT_WAREHOUSE_ID: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShipmentBoxTask {
    /// Put one unit of the barcoded inventory into an existing koli
    AddItemByBarcode { box_id: i64, barcode: String },
    /// Open a new koli for an order receipt
    CreateFromOrderReceipt { order_receipt_id: i64 },
    /// Close a koli into an inventory receipt
    CreateReceipt { box_id: i64 },
}

impl ShipmentBoxTask {
    pub fn service_type(&self) -> i64 {
        match self {
            ShipmentBoxTask::AddItemByBarcode { .. } => 11,
            ShipmentBoxTask::CreateFromOrderReceipt { .. } => 1,
            ShipmentBoxTask::CreateReceipt { .. } => 100,
        }
    }

    /// Short name used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            ShipmentBoxTask::AddItemByBarcode { .. } => "add_item_by_barcode",
            ShipmentBoxTask::CreateFromOrderReceipt { .. } => "create_koli_from_order_receipt",
            ShipmentBoxTask::CreateReceipt { .. } => "create_receipt",
        }
    }

    pub fn payload(&self) -> Value {
        let box_fields = json!([{ "name": SPECIAL_CODE_FIELD, "value": SPECIAL_CODE_VALUE }]);

        match self {
            ShipmentBoxTask::AddItemByBarcode { box_id, barcode } => json!({
                "serviceType": self.service_type(),
                "boxId": box_id,
                "boxFieldsValue": box_fields,
                "inventoryBarcode": barcode,
                "quantity": 1,
                "orderConnection": 1,
                "orderShipmentControlType": 1,
            }),
            ShipmentBoxTask::CreateFromOrderReceipt { order_receipt_id } => json!({
                "serviceType": self.service_type(),
                "boxType": 2,
                "boxId": 0,
                "boxCode": "",
                "orderReceiptId": order_receipt_id,
                "boxFieldsValue": box_fields,
                "orderConnection": 1,
                "orderShipmentControlType": 2,
            }),
            ShipmentBoxTask::CreateReceipt { box_id } => json!({
                "serviceType": self.service_type(),
                "boxId": box_id,
                "inventoryReceiptType": RECEIPT_TYPE_SHIPMENT,
                "inventoryReceiptWarehouseId": RECEIPT_WAREHOUSE_ID,
                "orderConnection": 1,
                "orderShipmentControlType": 2,
            }),
        }
    }

    /// Whether the caller expects a box id back
    pub fn returns_box_id(&self) -> bool {
        !matches!(self, ShipmentBoxTask::AddItemByBarcode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_item_payload() {
        let task = ShipmentBoxTask::AddItemByBarcode {
            box_id: 42,
            barcode: "8690000000012".to_string(),
        };
        let payload = task.payload();

        assert_eq!(payload["serviceType"], 11);
        assert_eq!(payload["boxId"], 42);
        assert_eq!(payload["inventoryBarcode"], "8690000000012");
        assert_eq!(payload["quantity"], 1);
        assert_eq!(payload["orderShipmentControlType"], 1);
        assert_eq!(payload["boxFieldsValue"][0]["value"], "fromExt");
        assert!(!task.returns_box_id());
    }

    #[test]
    fn test_create_from_order_receipt_payload() {
        let payload = ShipmentBoxTask::CreateFromOrderReceipt {
            order_receipt_id: 9,
        }
        .payload();

        assert_eq!(payload["serviceType"], 1);
        assert_eq!(payload["boxType"], 2);
        assert_eq!(payload["boxId"], 0);
        assert_eq!(payload["boxCode"], "");
        assert_eq!(payload["orderReceiptId"], 9);
        assert_eq!(payload["orderShipmentControlType"], 2);
    }

    #[test]
    fn test_create_receipt_payload_has_no_box_fields() {
        let payload = ShipmentBoxTask::CreateReceipt { box_id: 5 }.payload();

        assert_eq!(payload["serviceType"], 100);
        assert_eq!(payload["inventoryReceiptType"], 120);
        assert_eq!(payload["inventoryReceiptWarehouseId"], 3);
        assert!(payload.get("boxFieldsValue").is_none());
    }
}
